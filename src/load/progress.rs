/// Settlement counters for one load session.
///
/// Every fetch settles exactly once, successfully or not, and each settlement counts once
/// toward [`LoadProgress::percent`]. Failures are not retried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Fetches settled so far (loaded + failed).
    pub settled: usize,
    /// Fetches that produced a frame.
    pub loaded: usize,
    /// Fetches that failed.
    pub failed: usize,
    /// Sequence length (N).
    pub total: usize,
}

impl LoadProgress {
    /// Fresh counters for a sequence of `total` frames.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Count one settlement.
    pub fn record(&mut self, loaded: bool) {
        if self.settled >= self.total {
            return;
        }
        self.settled += 1;
        if loaded {
            self.loaded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Whole percentage, rounded down so that 100 means "everything settled".
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.settled * 100) / self.total) as u8
    }

    /// `true` once every fetch has settled.
    pub fn is_complete(&self) -> bool {
        self.settled >= self.total
    }
}
