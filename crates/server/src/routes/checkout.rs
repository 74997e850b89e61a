//! Hosted checkout flow route handlers.
//!
//! Creating a checkout session is delegated entirely to the payment
//! provider; this server only builds the request and follows the redirect
//! contract. On return, the success route exchanges the session's
//! subscription for an entitlement receipt unless no-code mode is active.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::instrument;

use paywall_core::UserIdentity;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::models::session;
use crate::revenuecat::{ReceiptAttributes, ReceiptBody, Subscriber};
use crate::state::AppState;
use crate::stripe::CheckoutSessionParams;

/// Create-checkout-session form data.
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutForm {
    pub price_id: Option<String>,
}

/// Create a hosted checkout session and redirect the browser to it.
///
/// A missing price id silently redirects home rather than erroring.
#[instrument(skip(state, jar, headers, form))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    Form(form): Form<CreateCheckoutForm>,
) -> Result<Response> {
    let Some(price_id) = form.price_id.filter(|p| !p.is_empty()) else {
        return Ok(Redirect::to("/").into_response());
    };

    let (jar, session) = session::resolve(jar, state.config().secure_cookies())?;
    let base_url = request_base_url(&headers, state.config());

    let params =
        CheckoutSessionParams::build(price_id, &base_url, &session.identity, &session.config);
    let checkout = state.stripe().create_checkout_session(&params).await?;

    let url = checkout
        .url
        .ok_or_else(|| AppError::Internal("checkout session has no redirect url".to_string()))?;

    Ok((jar, Redirect::to(&url)).into_response())
}

/// Redirect targets come back to whatever host the request hit, falling
/// back to the configured base URL when the Host header is absent.
fn request_base_url(headers: &HeaderMap, config: &ServerConfig) -> String {
    let scheme = if config.base_url.starts_with("https://") {
        "https"
    } else {
        "http"
    };

    headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .map_or_else(
            || config.base_url.trim_end_matches('/').to_string(),
            |host| format!("{scheme}://{host}"),
        )
}

/// Success query parameters.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

/// Entitlement display data for templates.
#[derive(Clone)]
pub struct EntitlementView {
    pub name: String,
    pub product_identifier: String,
    pub expires: String,
}

/// Success page template.
#[derive(Template, WebTemplate)]
#[template(path = "success.html")]
pub struct SuccessTemplate {
    pub email: String,
    pub entitlements: Vec<EntitlementView>,
    pub subscription_id: String,
    pub checkout_session_id: String,
    pub no_code: bool,
}

impl SuccessTemplate {
    fn from_subscriber(
        identity: &UserIdentity,
        subscriber: &Subscriber,
        subscription_id: String,
        checkout_session_id: String,
        no_code: bool,
    ) -> Self {
        let entitlements = subscriber
            .entitlements
            .iter()
            .map(|(name, entitlement)| EntitlementView {
                name: name.clone(),
                product_identifier: entitlement.product_identifier.clone(),
                expires: entitlement
                    .expires_date
                    .clone()
                    .unwrap_or_else(|| "never".to_string()),
            })
            .collect();

        Self {
            email: identity.email.clone(),
            entitlements,
            subscription_id,
            checkout_session_id,
            no_code,
        }
    }
}

/// Handle the return from hosted checkout.
///
/// Looks the checkout session back up, then exchanges its subscription for
/// an entitlement receipt. In no-code mode the exchange is skipped and an
/// empty entitlement view is rendered with the raw session references. A
/// failed exchange is returned as a structured error body carrying the
/// attempted receipt, never as a success render.
#[instrument(skip(state, jar))]
pub async fn success(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<SuccessQuery>,
) -> Result<Response> {
    let Some(session_id) = query.session_id.filter(|s| !s.is_empty()) else {
        return Ok(Redirect::to("/").into_response());
    };

    let (jar, session) = session::resolve(jar, state.config().secure_cookies())?;
    let identity = session.identity;
    let checkout = state.stripe().retrieve_checkout_session(&session_id).await?;

    if session.config.no_code_mode {
        // The entitlement provider picks the purchase up from subscription
        // metadata on its own; render the bare session references.
        let subscriber = Subscriber::empty(&identity.id);
        return Ok((
            jar,
            SuccessTemplate::from_subscriber(
                &identity,
                &subscriber,
                checkout.subscription.unwrap_or_default(),
                checkout.id,
                true,
            ),
        )
            .into_response());
    }

    let fetch_token = checkout.subscription.clone().ok_or_else(|| {
        AppError::BadRequest("checkout session has no subscription".to_string())
    })?;

    let receipt = ReceiptBody {
        app_user_id: identity.id.clone(),
        fetch_token: fetch_token.clone(),
        attributes: ReceiptAttributes::new(
            checkout
                .customer_details
                .as_ref()
                .and_then(|d| d.name.clone()),
            checkout
                .customer_details
                .as_ref()
                .and_then(|d| d.email.clone()),
            checkout.customer.clone(),
        ),
    };

    match state.revenuecat().post_receipt(&receipt).await {
        Ok(subscriber) => Ok((
            jar,
            SuccessTemplate::from_subscriber(&identity, &subscriber, fetch_token, checkout.id, false),
        )
            .into_response()),
        Err(e) => {
            tracing::error!(error = %e, app_user_id = %identity.id, "Receipt exchange failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "receipt": receipt,
                })),
            )
                .into_response())
        }
    }
}

/// Cancel page template.
#[derive(Template, WebTemplate)]
#[template(path = "cancel.html")]
pub struct CancelTemplate;

/// Display the cancel page after an abandoned checkout.
pub async fn cancel() -> CancelTemplate {
    CancelTemplate
}
