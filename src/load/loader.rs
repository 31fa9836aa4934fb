use std::{
    ops::Range,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread::JoinHandle,
};

use anyhow::Context;

use crate::{
    assets::{decode::decode_frame, source::FrameSource},
    foundation::error::{HomewardError, HomewardResult},
    load::progress::LoadProgress,
    sequence::{
        frames::{Frame, FrameSequence},
        naming::{FrameNaming, normalize_rel_path},
    },
};

/// What to fetch and how to pace it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadPlan {
    /// Directory holding the sequence, relative to the source root.
    pub base_path: String,
    /// File naming convention.
    pub naming: FrameNaming,
    /// Sequence length (N).
    pub total: usize,
    /// Frames fetched together before the sequence is considered ready (P).
    pub priority: usize,
    /// Background batch size (B).
    pub batch_size: usize,
}

impl LoadPlan {
    /// Check `0 < P <= N`, `B >= 1` and that the base path normalizes.
    pub fn validate(&self) -> HomewardResult<()> {
        if self.total == 0 {
            return Err(HomewardError::validation("load plan total must be > 0"));
        }
        if self.priority == 0 || self.priority > self.total {
            return Err(HomewardError::validation(format!(
                "load plan priority must be in 1..={} (got {})",
                self.total, self.priority
            )));
        }
        if self.batch_size == 0 {
            return Err(HomewardError::validation("load plan batch_size must be >= 1"));
        }
        normalize_rel_path(&self.base_path)?;
        Ok(())
    }

    /// Index ranges of the background batches, in request order.
    pub fn background_batches(&self) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut start = self.priority;
        while start < self.total {
            let end = (start + self.batch_size.max(1)).min(self.total);
            out.push(start..end);
            start = end;
        }
        out
    }
}

/// Clonable cancellation flag shared by a loader and its owner.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Notifications emitted by [`FrameLoader::run`], in order.
#[derive(Clone, Debug)]
pub enum LoadEvent {
    /// One fetch settled.
    Progress(LoadProgress),
    /// Every priority fetch settled. Emitted exactly once, with the sequence so far.
    Ready(FrameSequence),
    /// A background batch fully settled.
    Batch {
        /// Zero-based batch number.
        batch: usize,
        /// Sequence snapshot after the batch.
        frames: FrameSequence,
    },
    /// Every fetch settled.
    Complete(LoadSummary),
}

/// Final counters of a load session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Frames loaded.
    pub loaded: usize,
    /// Frames that failed.
    pub failed: usize,
    /// Sequence length.
    pub total: usize,
    /// `true` if the session stopped early because it was cancelled.
    pub cancelled: bool,
}

type Settlement = (usize, HomewardResult<Frame>);

/// Two-stage frame prefetcher: a priority burst, then sequential background batches.
pub struct FrameLoader {
    plan: LoadPlan,
    base: String,
    pool: rayon::ThreadPool,
}

impl FrameLoader {
    /// Build a loader for `plan` with an optional fixed worker count.
    pub fn new(plan: LoadPlan, threads: Option<usize>) -> HomewardResult<Self> {
        plan.validate()?;
        let base = normalize_rel_path(&plan.base_path)?;
        let pool = build_thread_pool(threads)?;
        Ok(Self { plan, base, pool })
    }

    /// The plan this loader executes.
    pub fn plan(&self) -> &LoadPlan {
        &self.plan
    }

    /// Run the whole session on the calling thread, reporting through `on_event`.
    ///
    /// Fetch and decode happen on the worker pool; settlements are applied here, one at a
    /// time, so the [`FrameSequence`] has a single writer. Batch `k + 1` is not issued until
    /// every fetch of batch `k` has settled. Once `cancel` is set no further results are
    /// applied or reported; fetches already in flight finish and are dropped.
    #[tracing::instrument(
        skip(self, source, cancel, on_event),
        fields(total = self.plan.total, priority = self.plan.priority, batch = self.plan.batch_size)
    )]
    pub fn run(
        &self,
        source: Arc<dyn FrameSource>,
        cancel: &CancelToken,
        mut on_event: impl FnMut(LoadEvent),
    ) -> HomewardResult<LoadSummary> {
        let mut frames = FrameSequence::new(self.plan.total);
        let mut progress = LoadProgress::new(self.plan.total);

        let priority = 0..self.plan.priority;
        if !self.run_stage(
            priority,
            &source,
            cancel,
            &mut frames,
            &mut progress,
            &mut on_event,
        )? {
            return Ok(self.summary(&progress, true));
        }
        tracing::info!(
            loaded = progress.loaded,
            failed = progress.failed,
            "priority frames settled"
        );
        on_event(LoadEvent::Ready(frames.clone()));

        for (batch, range) in self.plan.background_batches().into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Ok(self.summary(&progress, true));
            }
            let span = range.clone();
            if !self.run_stage(
                range,
                &source,
                cancel,
                &mut frames,
                &mut progress,
                &mut on_event,
            )? {
                return Ok(self.summary(&progress, true));
            }
            tracing::debug!(batch, start = span.start, end = span.end, "batch settled");
            on_event(LoadEvent::Batch {
                batch,
                frames: frames.clone(),
            });
        }

        let summary = self.summary(&progress, false);
        tracing::info!(
            loaded = summary.loaded,
            failed = summary.failed,
            "frame sequence settled"
        );
        on_event(LoadEvent::Complete(summary));
        Ok(summary)
    }

    /// Run the session on a dedicated thread and stream events through the returned handle.
    ///
    /// Dropping the handle cancels the session.
    pub fn spawn(self, source: Arc<dyn FrameSource>) -> HomewardResult<LoadHandle> {
        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let worker_cancel = cancel.clone();
        let join = std::thread::Builder::new()
            .name("homeward-loader".to_string())
            .spawn(move || {
                self.run(source, &worker_cancel, |event| {
                    if tx.send(event).is_err() {
                        worker_cancel.cancel();
                    }
                })
            })
            .context("spawn loader thread")?;
        Ok(LoadHandle {
            events: rx,
            cancel,
            join: Some(join),
        })
    }

    /// Fan out `indices`, then fan in every settlement. Returns `false` if cancelled.
    fn run_stage(
        &self,
        indices: Range<usize>,
        source: &Arc<dyn FrameSource>,
        cancel: &CancelToken,
        frames: &mut FrameSequence,
        progress: &mut LoadProgress,
        on_event: &mut impl FnMut(LoadEvent),
    ) -> HomewardResult<bool> {
        let (tx, rx) = mpsc::channel::<Settlement>();
        for index in indices.clone() {
            let rel_path = format!("{}/{}", self.base, self.plan.naming.file_name(index));
            let source = Arc::clone(source);
            let tx = tx.clone();
            self.pool.spawn(move || {
                let result = source
                    .fetch(&rel_path)
                    .and_then(|bytes| decode_frame(&bytes))
                    .map_err(|e| HomewardError::asset(format!("{rel_path}: {e}")));
                // A closed channel means the session was torn down.
                tx.send((index, result)).ok();
            });
        }
        drop(tx);

        for _ in indices {
            let (index, result) = rx.recv().map_err(|_| {
                HomewardError::asset("frame worker exited without reporting a result")
            })?;
            if cancel.is_cancelled() {
                return Ok(false);
            }
            let frame = match result {
                Ok(frame) => Some(frame),
                Err(e) => {
                    tracing::warn!(index, error = %e, "frame failed to load");
                    None
                }
            };
            progress.record(frame.is_some());
            frames.settle(index, frame)?;
            on_event(LoadEvent::Progress(*progress));
        }
        Ok(!cancel.is_cancelled())
    }

    fn summary(&self, progress: &LoadProgress, cancelled: bool) -> LoadSummary {
        LoadSummary {
            loaded: progress.loaded,
            failed: progress.failed,
            total: self.plan.total,
            cancelled,
        }
    }
}

/// Owner side of a loader running on its own thread.
pub struct LoadHandle {
    events: mpsc::Receiver<LoadEvent>,
    cancel: CancelToken,
    join: Option<JoinHandle<HomewardResult<LoadSummary>>>,
}

impl LoadHandle {
    /// Next pending event, without blocking.
    pub fn try_next(&self) -> Option<LoadEvent> {
        self.events.try_recv().ok()
    }

    /// Next event, blocking until one arrives. `None` once the loader has finished.
    pub fn next_blocking(&self) -> Option<LoadEvent> {
        self.events.recv().ok()
    }

    /// Stop applying results. In-flight fetches are not aborted.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether [`LoadHandle::cancel`] was called (or the consumer went away).
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the loader thread and return its summary.
    pub fn join(mut self) -> HomewardResult<LoadSummary> {
        let handle = self
            .join
            .take()
            .ok_or_else(|| HomewardError::validation("loader already joined"))?;
        handle
            .join()
            .map_err(|_| HomewardError::asset("loader thread panicked"))?
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn build_thread_pool(threads: Option<usize>) -> HomewardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HomewardError::validation(
            "loader 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("homeward-fetch-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HomewardError::validation(format!("failed to build loader thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/load/loader.rs"]
mod tests;
