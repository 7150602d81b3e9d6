use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for account creation.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after signup, login or an auth-status check.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub name: String,
    pub email: String,
}

impl AuthResponse {
    pub fn ok(name: String, email: String) -> Self {
        Self {
            message: "ok",
            name,
            email,
        }
    }
}

/// Bare acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Public part of a user record. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Response for the user listing.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub message: &'static str,
    pub users: Vec<PublicUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_shape() {
        let body = AuthResponse::ok("Ada".into(), "ada@example.com".into());
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["message"], "ok");
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn user_listing_shape() {
        let body = UserListResponse {
            message: "ok",
            users: vec![PublicUser {
                id: Uuid::new_v4(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            }],
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["message"], "ok");
        assert_eq!(json["users"].as_array().map(|a| a.len()), Some(1));
        assert!(json["users"][0]["id"].is_string());
    }

    #[test]
    fn public_user_never_serializes_a_password() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        let json = serde_json::to_string(&user).expect("serialize");
        assert!(!json.contains("password"));
    }
}
