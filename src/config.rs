use anyhow::Context;
use serde::Deserialize;

const DEFAULT_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Runtime environment. Controls the session cookie attributes and the
/// default log verbosity, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    Development,
    Production,
}

impl RuntimeEnv {
    /// Read APP_ENV; anything other than "production" is development.
    pub fn detect() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") => RuntimeEnv::Production,
            _ => RuntimeEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_secret: String,
    pub cookie_secret: String,
    pub session_ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Which of the policy-gated routes stay reachable without a session.
/// Both default to public; flip the env flags to gate them.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutePolicy {
    pub public_chat: bool,
    pub public_user_listing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub env: RuntimeEnv,
    pub cors_allowed_origins: Vec<String>,
    pub auth: AuthConfig,
    pub gemini: GeminiConfig,
    pub routes: RoutePolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let env = RuntimeEnv::detect();

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.into()),
        );

        let auth = AuthConfig {
            token_secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            cookie_secret: std::env::var("COOKIE_SECRET").context("COOKIE_SECRET must be set")?,
            session_ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
        };

        let routes = RoutePolicy {
            public_chat: env_flag("CHAT_PUBLIC", true),
            public_user_listing: env_flag("USER_LISTING_PUBLIC", true),
        };

        Ok(Self {
            database_url,
            env,
            cors_allowed_origins,
            auth,
            gemini,
            routes,
        })
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
