//! Error types.

use thiserror::Error;
use tower_lsp::lsp_types::Url;

/// Failure reported by an analysis backend or one of the markup/style sub-services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("request cancelled")]
    Cancelled,
    #[error("unknown document: {0}")]
    UnknownDocument(Url),
    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by the maestro layer itself.
#[derive(Debug, Error)]
pub enum MaestroError {
    #[error("invalid uri `{0}`")]
    InvalidUri(String),
    #[error("document not open: {0}")]
    UnknownDocument(Url),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T, E = MaestroError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_converts() {
        let err: MaestroError = BackendError::Failed("boom".into()).into();
        assert_eq!(err.to_string(), "boom");
        assert!(matches!(err, MaestroError::Backend(_)));
    }

    #[test]
    fn test_config_error_message() {
        let err: MaestroError = toml::from_str::<toml::Table>("= broken")
            .map_err(MaestroError::from)
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
