//! Cooperative cancellation for pipeline runs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap clonable cancellation flag
///
/// The pipeline checks the token between stages (after each blocking model
/// call and before the next) and exits promptly without raising once it is
/// set. Clones share the same underlying flag.
///
/// # Examples
///
/// ```
/// use ddr_domain::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, unset token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; idempotent
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();

        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
