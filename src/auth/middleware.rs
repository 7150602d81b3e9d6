use axum::{
    body::Body,
    extract::{FromRef, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::cookie::{signing_key, SESSION_COOKIE};
use crate::auth::token::TokenKeys;
use crate::error::AppError;
use crate::state::AppState;

/// Verified identity attached to request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// Extract the session token from the signed cookie jar. A cookie with a
/// bad signature comes back as absent, same as no cookie at all.
fn extract_session_token(cookies: &Cookies, cookie_secret: &str) -> Option<String> {
    let key = signing_key(cookie_secret);
    cookies
        .signed(&key)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Gate for protected routes. The session cookie must be present, carry a
/// valid signature, and wrap a token that verifies and has not expired.
/// On success the caller's identity lands in request extensions; on any
/// failure the handler never runs.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_token(&cookies, &state.config.auth.cookie_secret).ok_or_else(
        || {
            warn!("request to protected route without a session cookie");
            AppError::Unauthorized("missing session cookie")
        },
    )?;

    let keys = TokenKeys::from_ref(&state);
    let claims = keys.verify(&token).map_err(|e| {
        warn!(error = %e, "session token rejected");
        AppError::Unauthorized("invalid or expired session token")
    })?;

    debug!(user_id = %claims.sub, "session verified");

    request.extensions_mut().insert(SessionUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
