//! Driven port for client-side navigation.
//!
//! Only explicit user actions navigate. Passive session events never do.

use std::sync::{Mutex, PoisonError};

/// Moves the client to another route.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `path`.
    fn navigate(&self, path: &str);
}

/// Navigator that remembers requested paths instead of acting on them.
///
/// The HTTP adapter turns the last recorded path into a redirect; the
/// terminal client prints it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Most recent navigation target, if any.
    pub fn last(&self) -> Option<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Every recorded navigation target in order.
    pub fn history(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
    }
}
