use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use homeward::{
    CancelToken, Density, DeviceSignals, DriveKind, ExperienceMode, ExportOpts, FfmpegSink,
    FfmpegSinkOpts, FrameLoader, FrameSink, FrameSource, FsFrameSource, JourneyConfig,
    JourneySession, LayoutBox, PngSequenceSink, ScrollLock, Viewport, export_journey,
    select_experience,
};

#[derive(Parser, Debug)]
#[command(name = "homeward", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the frame sequence and report what loaded.
    Probe(ProbeArgs),
    /// Render the frame shown at a scroll position as a PNG.
    Still(StillArgs),
    /// Export the auto-play journey as an MP4 (requires `ffmpeg` on PATH) or a PNG directory.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory the asset base paths resolve against.
    #[arg(long)]
    assets: PathBuf,

    /// Journey configuration JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force an asset set instead of detecting one.
    #[arg(long)]
    density: Option<Density>,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1280)]
    viewport_width: u32,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 720)]
    viewport_height: u32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Client has touch input.
    #[arg(long, default_value_t = false)]
    touch: bool,

    /// Client user agent string.
    #[arg(long, default_value = "")]
    user_agent: String,

    /// Client prefers reduced motion.
    #[arg(long, default_value_t = false)]
    reduced_motion: bool,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct StillArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Scroll fraction in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output `.mp4` file, or a directory for a PNG sequence.
    #[arg(long)]
    out: PathBuf,

    /// Output frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Overwrite an existing MP4.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Still(args) => cmd_still(args),
        Command::Render(args) => cmd_render(args),
    }
}

struct Prepared {
    config: JourneyConfig,
    density: Density,
    source: Arc<dyn FrameSource>,
}

/// Load config and pick the asset set. `None` means the static experience was selected.
fn prepare(common: &CommonArgs) -> anyhow::Result<Option<Prepared>> {
    let config = match &common.config {
        Some(path) => JourneyConfig::from_path(path)?,
        None => JourneyConfig::default(),
    };
    let signals = DeviceSignals {
        viewport_width: common.viewport_width,
        touch: common.touch,
        user_agent: common.user_agent.clone(),
        reduced_motion: common.reduced_motion,
    };
    let density = match (select_experience(&signals, config.mobile_breakpoint_px), common.density) {
        (ExperienceMode::Static { reason }, _) => {
            tracing::info!(?reason, "animated journey bypassed");
            println!("static experience selected ({reason:?}); nothing to do");
            return Ok(None);
        }
        (_, Some(forced)) => forced,
        (ExperienceMode::Animated(detected), None) => detected,
    };
    if !common.assets.is_dir() {
        anyhow::bail!("assets directory '{}' does not exist", common.assets.display());
    }
    Ok(Some(Prepared {
        config,
        density,
        source: Arc::new(FsFrameSource::new(&common.assets)),
    }))
}

fn layout(common: &CommonArgs) -> LayoutBox {
    LayoutBox::new(
        f64::from(common.viewport_width),
        f64::from(common.viewport_height),
        common.dpr,
    )
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let Some(p) = prepare(&args.common)? else {
        return Ok(());
    };
    let plan = p.config.assets(p.density).load_plan();
    let loader = FrameLoader::new(plan, p.config.loader_threads)?;
    let mut ready_after = None;
    let summary = loader.run(p.source, &CancelToken::new(), |event| {
        if let homeward::LoadEvent::Ready(frames) = &event {
            ready_after = Some(frames.settled_count());
        }
    })?;

    println!(
        "density={:?} total={} loaded={} failed={} ready_after={}",
        p.density,
        summary.total,
        summary.loaded,
        summary.failed,
        ready_after.unwrap_or(0)
    );
    Ok(())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let Some(mut p) = prepare(&args.common)? else {
        return Ok(());
    };
    p.config.drive.mode = DriveKind::Scrub;

    let mut viewport = Viewport::new(layout(&args.common));
    let mut session = JourneySession::new(
        p.config,
        p.density,
        p.source,
        &mut viewport,
        ScrollLock::new(),
    )?;
    session.block_until_loaded();
    session.scrub_to(args.progress)?;

    // Converge the renderer; the exact step cadence does not matter for a still.
    let mut now = Duration::ZERO;
    loop {
        now += Duration::from_millis(16);
        if !session.step(now).animating {
            break;
        }
    }

    let surface = session.renderer().surface();
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    surface
        .as_image()
        .save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    println!(
        "wrote {} (frame {:?})",
        args.out.display(),
        session.renderer().displayed_frame()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let Some(p) = prepare(&args.common)? else {
        return Ok(());
    };
    let is_mp4 = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
    let mut sink: Box<dyn FrameSink> = if is_mp4 {
        let mut opts = FfmpegSinkOpts::new(&args.out);
        opts.overwrite = args.overwrite;
        Box::new(FfmpegSink::new(opts))
    } else {
        Box::new(PngSequenceSink::new(&args.out))
    };

    let opts = ExportOpts {
        fps: args.fps,
        width: f64::from(args.common.viewport_width),
        height: f64::from(args.common.viewport_height),
        device_pixel_ratio: args.common.dpr,
    };
    let stats = export_journey(&p.config, p.density, p.source, opts, sink.as_mut())?;
    println!(
        "wrote {} frames ({}x{}, {:.2}s) to {}",
        stats.frames,
        stats.width,
        stats.height,
        stats.duration.as_secs_f64(),
        args.out.display()
    );
    Ok(())
}
