//! End-user identity and per-session checkout configuration.
//!
//! An identity is either anonymous (synthesized on first request) or bound to
//! a known customer id selected on the configure page. Both the identity and
//! the configuration live only inside the signed session cookie; nothing is
//! persisted server-side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace prefix for anonymous app user ids.
const ANONYMOUS_ID_PREFIX: &str = "$RCAnonymousID:";

/// Email shown for users that never identified themselves.
pub const ANONYMOUS_EMAIL: &str = "Anonymous";

/// The end-user identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// App user id: either a namespaced random token or a known customer id.
    pub id: String,
    /// Display email, [`ANONYMOUS_EMAIL`] when anonymous.
    pub email: String,
    /// Whether this identity was synthesized rather than selected.
    pub anonymous: bool,
}

impl UserIdentity {
    /// Synthesize a fresh anonymous identity with a globally-unique id.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: format!("{ANONYMOUS_ID_PREFIX}{}", Uuid::new_v4().simple()),
            email: ANONYMOUS_EMAIL.to_string(),
            anonymous: true,
        }
    }

    /// Bind the identity to a known app user id.
    ///
    /// A missing email falls back to the anonymous placeholder so templates
    /// always have something to render.
    #[must_use]
    pub fn known(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email: email.unwrap_or_else(|| ANONYMOUS_EMAIL.to_string()),
            anonymous: false,
        }
    }
}

/// Checkout options attached to exactly one identity at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Filter the price list through the current offering.
    pub use_offerings: bool,
    /// Known payment-provider customer to attach to checkout sessions.
    pub stripe_customer: Option<String>,
    /// Skip the entitlement receipt exchange and render an empty
    /// entitlement view on success.
    pub no_code_mode: bool,
}

/// User-supplied fields from the configure form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigureInput {
    /// Explicit identity override; absent means "make me anonymous again".
    pub app_user_id: Option<String>,
    /// Email accompanying an explicit identity.
    pub email: Option<String>,
    pub use_offerings: bool,
    pub stripe_customer: Option<String>,
    pub no_code_mode: bool,
}

impl ConfigureInput {
    /// Compute the identity and configuration this input selects.
    ///
    /// Supplying an explicit id replaces the current identity with a known
    /// one; omitting it synthesizes a fresh anonymous identity. This is the
    /// only path that flips `anonymous` back on.
    #[must_use]
    pub fn apply(self) -> (UserIdentity, SessionConfig) {
        let identity = match self.app_user_id.filter(|id| !id.is_empty()) {
            Some(id) => UserIdentity::known(id, self.email),
            None => UserIdentity::anonymous(),
        };

        let config = SessionConfig {
            use_offerings: self.use_offerings,
            stripe_customer: self.stripe_customer.filter(|c| !c.is_empty()),
            no_code_mode: self.no_code_mode,
        };

        (identity, config)
    }
}
