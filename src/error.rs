use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::hole::HoleSourceKind;

/// Errors raised while building or reducing a quasiquotation.
///
/// Clonable so that a failed awaitable source can be shared between every
/// reduction that awaits it.
#[derive(Error, Debug, Clone)]
pub enum QqError {
    #[error("Arity error: {cooked} cooked and {raw} raw segments for {values} values")]
    Arity {
        cooked: usize,
        raw: usize,
        values: usize,
    },
    #[error("Synchronous reduction cannot resolve {0} source")]
    AsyncSourceInSyncReduction(HoleSourceKind),
    #[error("Deferred source rejected: {message}")]
    Rejected {
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
    #[error("Unquote chain exceeded {0} resolutions at one position")]
    UnquoteChainLimit(usize),
    #[error("Nesting depth exceeded {0}")]
    DepthLimit(usize),
    #[error("Deferred source timed out after {0:?}")]
    Timeout(Duration),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type QqResult<T> = Result<T, QqError>;

impl QqError {
    pub fn rejected<S: Into<String>>(message: S) -> Self {
        QqError::Rejected {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause of a rejection. Has no effect on other kinds.
    pub fn with_source(self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        match self {
            QqError::Rejected { message, .. } => QqError::Rejected {
                message,
                source: Some(Arc::new(cause)),
            },
            other => other,
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        QqError::Internal(message.into())
    }
}
