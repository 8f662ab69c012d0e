use thiserror::Error;

/// Failure taxonomy surfaced to the memo view.
///
/// Transport, decode and storage errors are folded into these variants at the
/// repository/store boundary, so callers only ever match on what the user can
/// act on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    #[error("Not logged in or session expired")]
    Unauthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request failed: {detail}")]
    RequestFailed { status: Option<u16>, detail: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoError {
    pub fn request_failed(detail: impl Into<String>) -> Self {
        MemoError::RequestFailed { status: None, detail: detail.into() }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, MemoError::Unauthenticated)
    }
}

impl From<reqwest::Error> for MemoError {
    fn from(error: reqwest::Error) -> Self {
        MemoError::RequestFailed {
            status: error.status().map(|s| s.as_u16()),
            detail: error.to_string(),
        }
    }
}

impl From<std::io::Error> for MemoError {
    fn from(error: std::io::Error) -> Self {
        MemoError::StorageUnavailable(error.to_string())
    }
}

impl From<serde_json::Error> for MemoError {
    fn from(error: serde_json::Error) -> Self {
        MemoError::StorageUnavailable(format!("Invalid JSON: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_map_to_storage() {
        let err: MemoError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, MemoError::StorageUnavailable(_)));
        assert!(!err.is_unauthenticated());
    }

    #[test]
    fn test_request_failed_display() {
        let err = MemoError::RequestFailed { status: Some(500), detail: "boom".to_string() };
        assert_eq!(err.to_string(), "Request failed: boom");
    }
}
