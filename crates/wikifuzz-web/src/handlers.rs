use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use wikifuzz_core::{FuzzError, Identity, IdentityProvider};

use crate::WebState;
use crate::dto::{AjaxQuery, HookResponse};
use crate::error::fuzz_error_response;
use crate::html::SEARCH_HTML;
use crate::security::HeaderIdentity;

/// Call name the original-style ajax dispatcher recognizes.
pub const INDEX_CALL: &str = "fuzzysearch_pages";

/// `GET /api/ajax?call=fuzzysearch_pages` -- serve the caller's page index,
/// rebuilding it first when stale. Identity is resolved before any cache
/// state is touched; anonymous callers are rejected outright and never see
/// cached data.
pub async fn ajax(
    State(state): State<WebState>,
    headers: HeaderMap,
    Query(query): Query<AjaxQuery>,
) -> Response {
    if query.call != INDEX_CALL {
        return fuzz_error_response(
            FuzzError::NotFound(format!("unknown ajax call: {}", query.call)),
            "ajax.dispatch",
        );
    }

    let Some(identity) = HeaderIdentity::new(&headers).current_identity() else {
        return unauthenticated_response(&state);
    };

    match serve_index(&state, &identity) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => fuzz_error_response(err, "pages.fetch"),
    }
}

/// `POST /api/hooks/indexed` -- inbound content-indexing hook. Forces a
/// rebuild of the caller's entry, bypassing the staleness check.
pub async fn content_indexed(State(state): State<WebState>, headers: HeaderMap) -> Response {
    let Some(identity) = HeaderIdentity::new(&headers).current_identity() else {
        return unauthenticated_response(&state);
    };

    match state.cache.ensure_fresh(&identity, true) {
        Ok(()) => (
            StatusCode::OK,
            Json(HookResponse {
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Err(err) => fuzz_error_response(err, "pages.reindex"),
    }
}

/// The standalone search widget shell.
pub async fn search_page() -> Html<&'static str> {
    Html(SEARCH_HTML)
}

/// Serve the snapshot verbatim; the cache file already is the response
/// body, so no decode/re-encode round trip on the hot path.
fn serve_index(state: &WebState, identity: &Identity) -> wikifuzz_core::Result<Vec<u8>> {
    state.cache.ensure_fresh(identity, false)?;
    let path = state.cache.snapshot_path_for(identity);
    match std::fs::read(&path) {
        Ok(body) => Ok(body),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(FuzzError::CacheBuild(
            format!("snapshot missing after rebuild for {identity}"),
        )),
        Err(err) => Err(err.into()),
    }
}

fn unauthenticated_response(state: &WebState) -> Response {
    let payload = FuzzError::Unauthenticated.to_payload("identity.resolve");
    (
        StatusCode::UNAUTHORIZED,
        [(header::LOCATION, state.login_url.clone())],
        Json(payload),
    )
        .into_response()
}
