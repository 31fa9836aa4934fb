use crate::{
    foundation::core::Rgba8,
    foundation::error::{HomewardError, HomewardResult},
    foundation::math::lerp,
    render::geometry::{FitMode, SourceCrop, compute_placement},
    render::surface::{LayoutBox, Surface},
    render::viewport::{ResizeObserver, Viewport},
    sequence::frames::FrameSequence,
};

/// Renderer settings, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererConfig {
    /// Fit policy.
    pub fit: FitMode,
    /// Letterbox crop applied to every source frame.
    pub crop: SourceCrop,
    /// Fraction of the remaining distance covered per tick, in `(0, 1)`.
    pub smoothing: f64,
    /// Distance under which the animation snaps to its target and stops.
    pub epsilon: f64,
    /// Fill color painted behind every frame.
    pub background: Rgba8,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fit: FitMode::Contain,
            crop: SourceCrop::NONE,
            smoothing: 0.05,
            epsilon: 0.01,
            background: Rgba8::opaque(248, 246, 243),
        }
    }
}

impl RendererConfig {
    /// Check ranges.
    pub fn validate(&self) -> HomewardResult<()> {
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(HomewardError::validation(format!(
                "renderer smoothing must be in (0, 1) (got {})",
                self.smoothing
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(HomewardError::validation(format!(
                "renderer epsilon must be > 0 (got {})",
                self.epsilon
            )));
        }
        self.crop.validate()
    }
}

/// The renderer's private animation state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderState {
    /// Continuously smoothed frame position.
    pub current: f64,
    /// Frame the animation is heading toward.
    pub target: usize,
}

/// Paints an image sequence onto a surface, easing toward a requested frame.
///
/// The caller drives the animation loop by calling [`SequenceRenderer::tick`] once per
/// display refresh while [`SequenceRenderer::is_animating`] is true.
pub struct SequenceRenderer {
    config: RendererConfig,
    surface: Surface,
    frames: FrameSequence,
    state: RenderState,
    // Last requested target, unclamped; re-applied when frames are adopted.
    requested: usize,
    animating: bool,
    displayed: Option<usize>,
    resize: Option<ResizeObserver>,
    torn_down: bool,
    paints: u64,
}

impl SequenceRenderer {
    /// Acquire a surface sized to `viewport` and start observing its layout.
    ///
    /// Surface acquisition failure is fatal for the renderer and reported as
    /// [`HomewardError::Surface`].
    pub fn new(config: RendererConfig, viewport: &mut Viewport) -> HomewardResult<Self> {
        config.validate()?;
        let mut surface = Surface::new(viewport.layout())?;
        surface.fill(config.background);
        Ok(Self {
            config,
            surface,
            frames: FrameSequence::default(),
            state: RenderState::default(),
            requested: 0,
            animating: false,
            displayed: None,
            resize: Some(viewport.observe()),
            torn_down: false,
            paints: 0,
        })
    }

    /// Adopt a (possibly partial) frame sequence.
    ///
    /// The first non-empty sequence paints frame 0 immediately; later snapshots repaint
    /// whatever frame is currently on screen, since it may have just arrived. A target
    /// requested earlier is re-clamped against the new length and resumes the loop.
    pub fn set_frames(&mut self, frames: FrameSequence) {
        if self.torn_down {
            return;
        }
        self.frames = frames;
        if self.frames.is_empty() {
            return;
        }
        let max = self.frames.len() - 1;
        self.state.target = self.requested.min(max);
        self.paint(self.displayed.unwrap_or(0).min(max));
        if (self.state.current - self.state.target as f64).abs() >= self.config.epsilon {
            self.animating = true;
        }
    }

    /// Request a new target frame, clamped to the sequence. Starts the loop if idle.
    pub fn set_target(&mut self, index: usize) {
        if self.torn_down {
            return;
        }
        self.requested = index;
        self.state.target = index.min(self.frames.len().saturating_sub(1));
        self.animating = true;
    }

    /// Advance one display refresh. Returns whether the loop is still running.
    pub fn tick(&mut self) -> bool {
        if self.torn_down || !self.animating {
            return false;
        }
        self.poll_resize();

        let target = self.state.target as f64;
        self.state.current = lerp(self.state.current, target, self.config.smoothing);
        self.paint(self.state.current.round().max(0.0) as usize);

        if (self.state.current - target).abs() < self.config.epsilon {
            self.state.current = target;
            self.paint(self.state.target);
            self.animating = false;
        }
        self.animating
    }

    /// Apply the latest pending viewport layout, if any, and redraw at the new geometry.
    pub fn poll_resize(&mut self) {
        let Some(layout) = self.resize.as_ref().and_then(ResizeObserver::latest) else {
            return;
        };
        if let Err(e) = self.resize_to(layout) {
            tracing::warn!(error = %e, "ignoring resize to an undrawable layout");
        }
    }

    /// Resize the backing store and repaint the displayed frame.
    ///
    /// Animation state is left untouched.
    pub fn resize_to(&mut self, layout: LayoutBox) -> HomewardResult<()> {
        if self.torn_down {
            return Ok(());
        }
        self.surface.resize(layout)?;
        match self.displayed {
            Some(index) => self.paint(index),
            None => self.surface.fill(self.config.background),
        }
        Ok(())
    }

    /// Stop the loop and release the resize subscription. Idempotent.
    pub fn teardown(&mut self) {
        self.animating = false;
        self.resize = None;
        self.torn_down = true;
    }

    /// Whether the animation loop is running.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Smoothed frame position.
    pub fn current_frame(&self) -> f64 {
        self.state.current
    }

    /// Target frame.
    pub fn target_frame(&self) -> usize {
        self.state.target
    }

    /// Animation state snapshot.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Index of the frame last painted, if any.
    pub fn displayed_frame(&self) -> Option<usize> {
        self.displayed
    }

    /// Number of paints so far.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    /// Whether [`SequenceRenderer::teardown`] has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Settings in use.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The drawing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The adopted sequence.
    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    // Background first, every time: a narrower frame must not leave remnants of a wider one.
    fn paint(&mut self, index: usize) {
        self.surface.fill(self.config.background);
        if let Some(frame) = self.frames.get(index)
            && let Some(placement) = compute_placement(
                frame.size(),
                self.surface.size(),
                self.config.fit,
                self.config.crop,
            )
        {
            self.surface.draw(frame, &placement);
        }
        self.displayed = Some(index);
        self.paints += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
