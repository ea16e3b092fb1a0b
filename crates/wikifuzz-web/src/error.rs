use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use wikifuzz_core::FuzzError;

/// Map a core error onto the wire. The body always carries an `error`
/// field; that is the contract clients key off.
#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn fuzz_error_response(err: FuzzError, operation: &str) -> Response {
    let status = status_for_fuzz_error(&err);
    let payload = err.to_payload(operation);
    if status.is_server_error() {
        tracing::warn!(operation, code = %payload.code, "request failed: {err}");
    }
    (status, Json(payload)).into_response()
}

fn status_for_fuzz_error(err: &FuzzError) -> StatusCode {
    match err {
        FuzzError::Unauthenticated => StatusCode::UNAUTHORIZED,
        FuzzError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        FuzzError::NotFound(_) => StatusCode::NOT_FOUND,
        FuzzError::InvalidAcl(_) => StatusCode::BAD_REQUEST,
        FuzzError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND
        }
        FuzzError::CacheBuild(_) | FuzzError::Io(_) | FuzzError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
