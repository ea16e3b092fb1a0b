use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{self, HeaderName},
    },
    middleware::Next,
    response::Response,
};

use wikifuzz_core::{Identity, IdentityProvider};

/// Header carrying the authenticated principal, set by the fronting auth
/// proxy. Session lookup itself lives outside this service; by the time a
/// request arrives here, authentication has either happened or it hasn't.
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// Identity gate over request headers. Every serving entry point resolves
/// identity through this before touching any cache state.
pub struct HeaderIdentity<'a> {
    headers: &'a HeaderMap,
}

impl<'a> HeaderIdentity<'a> {
    #[must_use]
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }
}

impl IdentityProvider for HeaderIdentity<'_> {
    fn current_identity(&self) -> Option<Identity> {
        let user = self
            .headers
            .get(REMOTE_USER_HEADER)?
            .to_str()
            .ok()?
            .trim();
        (!user.is_empty()).then(|| Identity::new(user))
    }
}

pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut());
    response
}

fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static(
            "default-src 'self'; connect-src 'self'; style-src 'self'; script-src 'self'; object-src 'none'; base-uri 'none'; frame-ancestors 'none'",
        ),
    );
}
