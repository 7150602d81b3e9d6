use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tower_cookies::Cookies;
use tracing::{info, instrument, warn};

use crate::auth::cookie;
use crate::auth::dto::{
    AuthResponse, LoginRequest, MessageResponse, PublicUser, SignupRequest, UserListResponse,
};
use crate::auth::middleware::SessionUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::auth::token::TokenKeys;
use crate::error::{AppError, Result};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create an account and start a session in the same round trip.
#[instrument(skip(state, cookies, payload))]
pub async fn signup(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(mut payload): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "signup with invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password too short".into()));
    }

    // Friendly pre-check; the UNIQUE constraint still decides races.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "signup with already-registered email");
        return Err(AppError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.trim(), &payload.email, &hash).await?;

    let token = TokenKeys::from_ref(&state).issue(user.id, &user.email)?;
    cookie::install_session(&cookies, &state.config.auth, state.config.env, token);

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::ok(user.name, user.email)),
    ))
}

/// Verify credentials and rotate the session cookie.
#[instrument(skip(state, cookies, payload))]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "login with invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".into()));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(AppError::InvalidPassword);
    }

    let token = TokenKeys::from_ref(&state).issue(user.id, &user.email)?;
    cookie::install_session(&cookies, &state.config.auth, state.config.env, token);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse::ok(user.name, user.email)))
}

/// Confirm the session the middleware already verified still maps to a
/// stored account.
#[instrument(skip(state))]
pub async fn auth_status(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<AuthResponse>> {
    let user = User::find_by_id(&state.db, session.id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %session.id, "session refers to a missing user");
            AppError::UserNotFound
        })?;

    // Cross-check the row against the id the token claimed.
    if user.id != session.id {
        return Err(AppError::UserNotFound);
    }

    Ok(Json(AuthResponse::ok(user.name, user.email)))
}

/// Clear the session cookie. The token inside stays valid until expiry;
/// there is no server-side revocation. Safe to call without a session.
#[instrument(skip(state, cookies))]
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<MessageResponse>> {
    cookie::clear_session(&cookies, &state.config.auth, state.config.env);
    info!("session cookie cleared");
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// List every account without credential material.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>> {
    let users = User::list_all(&state.db)
        .await?
        .into_iter()
        .map(|u| PublicUser {
            id: u.id,
            name: u.name,
            email: u.email,
        })
        .collect();
    Ok(Json(UserListResponse {
        message: "ok",
        users,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn logout_acknowledgment_serializes() {
        let body = MessageResponse {
            message: "Logged out successfully",
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert_eq!(json, r#"{"message":"Logged out successfully"}"#);
    }
}
