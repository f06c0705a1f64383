//! Cooperative stop token
//!
//! The exec's periodic loops have no natural exit, a shared token gives them
//! one. Each loop checks the token once per cycle and exits cleanly when a
//! stop has been requested.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A cloneable token used to request that periodic loops stop.
///
/// Cheap to clone, all clones share the same underlying flag. Once requested
/// a stop cannot be revoked.
#[derive(Clone, Default)]
pub struct StopToken {
    stop: Arc<AtomicBool>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl StopToken {
    /// Create a new token with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that all loops observing this token stop.
    pub fn request(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Check whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stop_token_shared_between_clones() {
        let token = StopToken::new();
        let clone = token.clone();

        assert!(!token.is_requested());
        assert!(!clone.is_requested());

        clone.request();

        assert!(token.is_requested());
        assert!(clone.is_requested());
    }
}
