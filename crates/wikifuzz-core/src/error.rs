use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, FuzzError>;

#[derive(Debug, Error)]
pub enum FuzzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("cache generation failed: {0}")]
    CacheBuild(String),

    #[error("invalid acl rule: {0}")]
    InvalidAcl(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Wire shape for error responses. The `error` field is the stable contract
/// consumed by clients; `code` and `trace_id` aid log correlation.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub code: String,
    pub operation: String,
    pub trace_id: String,
}

impl FuzzError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::CacheBuild(_) => "CACHE_BUILD_FAILED",
            Self::InvalidAcl(_) => "INVALID_ACL",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
            code: self.code().to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }
}
