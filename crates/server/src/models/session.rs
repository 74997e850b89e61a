//! Cookie-stored identity and configuration.
//!
//! The signed session cookie is the only persistence this server has: it
//! carries the serialized [`UserIdentity`] and [`SessionConfig`] directly,
//! with no server-side session store. A missing, tampered, or malformed
//! cookie simply reads as "new visitor", never as an error. Every resolve
//! rewrites the cookie, refreshing its expiry.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use paywall_core::{ConfigureInput, SessionConfig, UserIdentity};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "paywall_session";

/// Session cookie lifetime (24 hours).
const SESSION_TTL: time::Duration = time::Duration::hours(24);

/// Error encoding session state into the cookie.
#[derive(Debug, Error)]
#[error("session cookie encoding: {0}")]
pub struct SessionError(#[from] serde_json::Error);

/// Everything the session cookie holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub identity: UserIdentity,
    pub config: SessionConfig,
}

impl SessionState {
    /// A brand-new visitor: fresh anonymous identity, default options.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            identity: UserIdentity::anonymous(),
            config: SessionConfig::default(),
        }
    }
}

/// Read the session state out of the cookie jar.
///
/// A cookie that fails signature verification never reaches us (the signed
/// jar drops it), and one whose payload does not parse is treated the same
/// way: as absent.
#[must_use]
pub fn load(jar: &SignedCookieJar) -> Option<SessionState> {
    let cookie = jar.get(SESSION_COOKIE_NAME)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Get the session state, synthesizing a fresh one on first visit.
///
/// Always writes the cookie back, so the expiry window slides on every
/// request. Idempotent across requests: the same cookie yields the same
/// identity until [`apply_configuration`] replaces it.
///
/// # Errors
///
/// Returns error if the state cannot be serialized.
pub fn resolve(
    jar: SignedCookieJar,
    secure: bool,
) -> Result<(SignedCookieJar, SessionState), SessionError> {
    let state = load(&jar).unwrap_or_else(SessionState::fresh);
    let jar = store(jar, &state, secure)?;
    Ok((jar, state))
}

/// Replace the session state from the configure form.
///
/// This is the only path that can flip an identity back to anonymous.
///
/// # Errors
///
/// Returns error if the state cannot be serialized.
pub fn apply_configuration(
    jar: SignedCookieJar,
    input: ConfigureInput,
    secure: bool,
) -> Result<(SignedCookieJar, SessionState), SessionError> {
    let (identity, config) = input.apply();
    let state = SessionState { identity, config };
    let jar = store(jar, &state, secure)?;
    Ok((jar, state))
}

/// Serialize the state into the signed session cookie.
///
/// # Errors
///
/// Returns error if the state cannot be serialized.
pub fn store(
    jar: SignedCookieJar,
    state: &SessionState,
    secure: bool,
) -> Result<SignedCookieJar, SessionError> {
    let value = serde_json::to_string(state)?;

    let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(SESSION_TTL)
        .build();

    Ok(jar.add(cookie))
}
