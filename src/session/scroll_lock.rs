use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Reference-counted page scroll lock.
///
/// Any number of components may hold the lock at once; scrolling is locked while at least
/// one [`ScrollLockGuard`] is alive. Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a hold on the lock, released when the guard drops.
    pub fn acquire(&self, reason: &'static str) -> ScrollLockGuard {
        let before = self.holders.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(reason, holders = before + 1, "scroll lock acquired");
        ScrollLockGuard {
            holders: Arc::clone(&self.holders),
            reason,
        }
    }

    /// Whether any guard is alive.
    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    /// Number of live guards.
    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::SeqCst)
    }
}

/// One hold on a [`ScrollLock`].
#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Arc<AtomicUsize>,
    reason: &'static str,
}

impl ScrollLockGuard {
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let before = self.holders.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(reason = self.reason, holders = before - 1, "scroll lock released");
    }
}
