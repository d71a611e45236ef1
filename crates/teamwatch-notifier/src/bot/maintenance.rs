use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Maintenance flag shared between the dispatcher and whoever reports on it.
///
/// Only the admin commands flip it. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceMode {
    enabled: Arc<AtomicBool>,
}

impl MaintenanceMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Set the flag, returning the previous value
    pub fn set(&self, enabled: bool) -> bool {
        self.enabled.swap(enabled, Ordering::AcqRel)
    }
}
