//! Session middleware configuration.
//!
//! Sessions live in whichever tower-sessions store the binary selects
//! (`PostgresStore` with a database, `MemoryStore` without). The cookie only
//! carries the session ID and is signed with a key derived from
//! `RECIPE_BOOK_SESSION_SECRET`.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::{Key, SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "rb_session";

/// Session inactivity timeout in seconds (5 minutes).
const SESSION_EXPIRY_SECONDS: i64 = 5 * 60;

/// Create the session layer over the given store.
///
/// # Arguments
///
/// * `store` - tower-sessions backend
/// * `config` - Web configuration (for session secret and cookie security)
#[must_use]
pub fn create_session_layer<S>(
    store: S,
    config: &WebConfig,
) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_signed(signing_key(config.session_secret.expose_secret()))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Stretch the configured secret to the 64 bytes a cookie `Key` needs.
fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_deterministic() {
        let a = signing_key("k3y-Material-With-Enough-Entropy!");
        let b = signing_key("k3y-Material-With-Enough-Entropy!");
        let c = signing_key("different-Material-With-Entropy!!");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
