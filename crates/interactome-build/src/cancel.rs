//! Cooperative cancellation between pipeline phases.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::BuildError;
use crate::types::Phase;

/// Shared flag checked by the engine before each phase.
///
/// Clones observe the same flag, so a token handed to a signal handler can
/// stop a build running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with [`Interrupt::Cancelled`] if cancellation was requested
    /// before `phase` starts.
    pub(crate) fn checkpoint(&self, phase: Phase) -> Result<(), Interrupt> {
        if self.is_cancelled() {
            tracing::info!(%phase, "Build cancelled");
            return Err(Interrupt::Cancelled(phase));
        }
        Ok(())
    }
}

/// Why a build stopped early.
#[derive(Debug)]
pub(crate) enum Interrupt {
    Cancelled(Phase),
    Failed(BuildError),
}

impl From<BuildError> for Interrupt {
    fn from(e: BuildError) -> Self {
        Interrupt::Failed(e)
    }
}
