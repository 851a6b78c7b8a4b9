use std::sync::atomic::{AtomicBool, Ordering};

/// Readiness flag of a loader. Starts busy and is finished once per cycle.
#[derive(Debug)]
pub struct LoadingFlag {
    loading: AtomicBool,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self {
            loading: AtomicBool::new(true),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Returns `false` when the flag was already finished.
    pub fn finish(&self) -> bool {
        self.loading
            .compare_exchange(true, false, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    pub fn restart(&self) {
        self.loading.store(true, Ordering::Release);
    }
}

impl Default for LoadingFlag {
    fn default() -> Self {
        Self::new()
    }
}
