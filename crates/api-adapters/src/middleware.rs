//! Access gate middleware.
//!
//! Pulls the bearer token out of the request, resolves the caller through
//! [`services::AccessGate`] and stores the [`CallerIdentity`] as a request
//! extension. Unauthenticated requests are redirected to the login path.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use domains::CallerIdentity;
use tracing::debug;

use crate::state::AppState;

pub async fn require_caller(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = extract_token(request.headers(), &state.options.cookie_names);

    match state.gate.resolve(token.as_deref()).await {
        Ok(caller) => {
            request.extensions_mut().insert::<CallerIdentity>(caller);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, path = %request.uri().path(), "redirecting to login");
            state.metrics.record_unauthenticated();
            Redirect::to(&state.options.login_path).into_response()
        }
    }
}

/// First non-empty cookie among `cookie_names` (in that order), else the
/// `Authorization: Bearer` token.
pub fn extract_token(headers: &HeaderMap, cookie_names: &[String]) -> Option<String> {
    let cookies: Vec<(&str, &str)> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
        .collect();

    let from_cookie = cookie_names.iter().find_map(|wanted| {
        cookies
            .iter()
            .find(|(name, value)| *name == wanted.as_str() && !value.is_empty())
            .map(|(_, value)| (*value).to_owned())
    });

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
    })
}
