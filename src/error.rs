use thiserror::Error;

use crate::core::observer::Violation;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("schedule invariant violated: {0}")]
    Invariant(#[from] Violation),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
