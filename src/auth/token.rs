use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::config::AuthConfig;
use crate::state::AppState;

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct TokenKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        let AuthConfig {
            token_secret,
            session_ttl_days,
            ..
        } = state.config.auth.clone();
        Self {
            encoding: EncodingKey::from_secret(token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(token_secret.as_bytes()),
            ttl: Duration::from_secs((session_ttl_days as u64) * 24 * 60 * 60),
        }
    }
}

impl TokenKeys {
    pub fn issue(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session token issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;

        // A token is live strictly before its expiry second, never at it.
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        if data.claims.exp <= now {
            anyhow::bail!("session token expired");
        }

        debug!(user_id = %data.claims.sub, "session token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    fn make_keys(secret: &str, ttl: Duration) -> TokenKeys {
        TokenKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    #[tokio::test]
    async fn issue_and_verify_roundtrip() {
        let keys = make_keys("dev-secret", WEEK);
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, "ada@example.com").expect("issue");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp, claims.iat + WEEK.as_secs() as usize);
    }

    #[tokio::test]
    async fn verify_rejects_foreign_secret() {
        let ours = make_keys("server-secret", WEEK);
        let theirs = make_keys("other-secret", WEEK);
        let token = theirs
            .issue(Uuid::new_v4(), "ada@example.com")
            .expect("issue");
        assert!(ours.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_tampered_payload() {
        let keys = make_keys("dev-secret", WEEK);
        let token = keys
            .issue(Uuid::new_v4(), "ada@example.com")
            .expect("issue");

        // Swap the first character of the claims segment; the signature no
        // longer covers what the token now says.
        let mut parts: Vec<&str> = token.split('.').collect();
        let altered = format!("x{}", &parts[1][1..]);
        parts[1] = &altered;
        let tampered = parts.join(".");

        assert!(keys.verify(&tampered).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret", WEEK);
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".into(),
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn expiry_boundary_counts_as_expired() {
        let keys = make_keys("dev-secret", WEEK);
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".into(),
            iat: now - 60,
            exp: now,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn keys_from_state_use_configured_ttl() {
        let state = crate::state::AppState::fake();
        let keys = TokenKeys::from_ref(&state);
        assert_eq!(keys.ttl, WEEK);
    }
}
