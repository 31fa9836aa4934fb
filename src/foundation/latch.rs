/// Single-assignment guard for "fire exactly once" callbacks.
///
/// Independent timers may race to complete the same thing; whichever calls
/// [`OnceLatch::fire`] first wins and every later call is a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnceLatch {
    fired: bool,
}

impl OnceLatch {
    /// New, unfired latch.
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Returns `true` only on the first call.
    pub fn fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    /// Whether the latch has fired.
    pub fn is_fired(self) -> bool {
        self.fired
    }
}
