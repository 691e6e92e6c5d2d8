//! Error taxonomy for the pricing pipeline

use thiserror::Error;

/// Failure of a single validate -> predict -> adjust run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Malformed or out-of-range request fields; always caller-recoverable
    #[error("{0}")]
    InvalidInput(String),

    /// The model artifact never loaded; permanent until restart
    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    /// Anything else that went wrong while predicting
    #[error("Prediction failed: {0}")]
    UnexpectedFailure(String),
}

impl PricingError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Short machine-readable tag, used for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::UnexpectedFailure(_) => "unexpected_failure",
        }
    }

    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<anyhow::Error> for PricingError {
    fn from(err: anyhow::Error) -> Self {
        Self::UnexpectedFailure(format!("{:#}", err))
    }
}

pub type PricingResult<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PricingError::invalid("year out of range").to_string(),
            "year out of range"
        );
        assert_eq!(
            PricingError::ModelUnavailable("file missing".into()).to_string(),
            "Model not loaded: file missing"
        );
    }

    #[test]
    fn test_anyhow_becomes_unexpected_failure() {
        let err: PricingError = anyhow::anyhow!("shape mismatch").into();
        assert_eq!(err.kind(), "unexpected_failure");
        assert!(!err.is_caller_error());
    }
}
