use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload carried inside the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // account email, echoed to downstream handlers
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}
