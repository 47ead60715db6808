//! Errors raised while assembling an orchestrator.

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("No tokio runtime available. Call .runtime(handle) or build from within a runtime")]
    NoRuntime,
}
