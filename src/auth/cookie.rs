use sha2::{Digest, Sha512};
use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies, Key};

use crate::config::{AuthConfig, RuntimeEnv};

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "auth_token";

/// Derive the cookie-signing key from the configured secret. The jar wants
/// 64 bytes of key material; SHA-512 stretches a secret of any length to
/// exactly that.
pub fn signing_key(cookie_secret: &str) -> Key {
    let digest = Sha512::digest(cookie_secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Build the session cookie. Browsers only accept SameSite=None together
/// with Secure, so production gets that pair for cross-site frontends and
/// every other environment stays on Lax over plain HTTP.
pub fn session_cookie(token: String, env: RuntimeEnv, ttl_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(env.is_production());
    cookie.set_same_site(if env.is_production() {
        SameSite::None
    } else {
        SameSite::Lax
    });
    cookie.set_max_age(Duration::days(ttl_days));
    cookie
}

/// Cookie that tells the browser to drop the session cookie. Attributes
/// must match the ones the session cookie was set with.
pub fn removal_cookie(env: RuntimeEnv) -> Cookie<'static> {
    session_cookie(String::new(), env, 0)
}

/// Replace whatever session cookie the client held with one carrying
/// `token`. The old cookie is cleared first, then the new one is added to
/// the signed jar.
pub fn install_session(cookies: &Cookies, auth: &AuthConfig, env: RuntimeEnv, token: String) {
    let key = signing_key(&auth.cookie_secret);
    let signed = cookies.signed(&key);
    signed.remove(removal_cookie(env));
    signed.add(session_cookie(token, env, auth.session_ttl_days));
}

/// Clear the session cookie regardless of whether the client sent one.
pub fn clear_session(cookies: &Cookies, auth: &AuthConfig, env: RuntimeEnv) {
    let key = signing_key(&auth.cookie_secret);
    cookies.signed(&key).remove(removal_cookie(env));
}
