//! Configure page route handlers.
//!
//! Lets the tester pick an identity (anonymous or a known payment-provider
//! customer) and toggle the checkout options stored in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::instrument;

use paywall_core::{ConfigureInput, SessionConfig, UserIdentity};

use crate::error::Result;
use crate::models::session;
use crate::state::AppState;

/// How many customers to offer on the configure page.
const CUSTOMER_LIMIT: u8 = 10;

/// Customer display data for templates.
#[derive(Clone)]
pub struct CustomerView {
    pub id: String,
    pub email: String,
    pub label: String,
}

impl From<&crate::stripe::Customer> for CustomerView {
    fn from(customer: &crate::stripe::Customer) -> Self {
        let email = customer.email.clone().unwrap_or_default();
        let label = match (&customer.name, &customer.email) {
            (Some(name), Some(email)) => format!("{name} <{email}>"),
            (Some(name), None) => name.clone(),
            (None, Some(email)) => email.clone(),
            (None, None) => customer.id.clone(),
        };

        Self {
            id: customer.id.clone(),
            email,
            label,
        }
    }
}

/// Configure page template.
#[derive(Template, WebTemplate)]
#[template(path = "configure.html")]
pub struct ConfigureTemplate {
    pub customers: Vec<CustomerView>,
    pub identity: UserIdentity,
    pub config: SessionConfig,
}

/// Display the configure page.
#[instrument(skip(state, jar))]
pub async fn configure_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, ConfigureTemplate)> {
    let (jar, session) = session::resolve(jar, state.config().secure_cookies())?;

    let customers = state
        .stripe()
        .list_customers(CUSTOMER_LIMIT)
        .await?
        .iter()
        .map(CustomerView::from)
        .collect();

    Ok((
        jar,
        ConfigureTemplate {
            customers,
            identity: session.identity,
            config: session.config,
        },
    ))
}

/// Configure form data.
///
/// Checkboxes arrive as `"on"` when checked and are absent otherwise.
#[derive(Debug, Deserialize)]
pub struct ConfigureForm {
    pub app_user_id: Option<String>,
    pub email: Option<String>,
    pub use_offerings: Option<String>,
    pub stripe_customer: Option<String>,
    pub no_code_mode: Option<String>,
}

impl From<ConfigureForm> for ConfigureInput {
    fn from(form: ConfigureForm) -> Self {
        Self {
            app_user_id: form.app_user_id,
            email: form.email.filter(|e| !e.is_empty()),
            use_offerings: form.use_offerings.is_some(),
            stripe_customer: form.stripe_customer,
            no_code_mode: form.no_code_mode.is_some(),
        }
    }
}

/// Apply the submitted configuration to the session cookie.
#[instrument(skip(state, jar, form))]
pub async fn configure(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ConfigureForm>,
) -> Result<(SignedCookieJar, Redirect)> {
    let (jar, session) =
        session::apply_configuration(jar, form.into(), state.config().secure_cookies())?;

    tracing::info!(
        app_user_id = %session.identity.id,
        anonymous = session.identity.anonymous,
        use_offerings = session.config.use_offerings,
        no_code_mode = session.config.no_code_mode,
        "Session reconfigured"
    );

    Ok((jar, Redirect::to("/")))
}
