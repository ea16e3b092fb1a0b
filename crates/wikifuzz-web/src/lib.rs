use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, middleware, routing::get, routing::post};

use wikifuzz_core::{Acl, IndexCache};

mod dto;
mod error;
mod handlers;
mod html;
mod security;


#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) cache: Arc<IndexCache<Acl>>,
    pub(crate) login_url: String,
}

impl WebState {
    fn new(cache: IndexCache<Acl>, login_url: impl Into<String>) -> Self {
        Self {
            cache: Arc::new(cache),
            login_url: login_url.into(),
        }
    }
}

/// Start the fuzzy page search server and block until shutdown.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot
/// be bound, or the server exits with a runtime failure.
pub fn serve_web(cache: IndexCache<Acl>, host: &str, port: u16) -> Result<()> {
    let state = WebState::new(cache, "/login");
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        tracing::info!("fuzzy page search listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    })
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/api/ajax", get(handlers::ajax))
        .route("/api/hooks/indexed", post(handlers::content_indexed))
        .route("/search", get(handlers::search_page))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .with_state(state)
}
