//! End-to-end route tests against mocked vendor APIs.
//!
//! Both vendor clients take their base URL from configuration, so these
//! tests stand up wiremock servers and drive the real router with
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paywall_server::config::{RevenueCatConfig, ServerConfig, StripeConfig};
use paywall_server::{AppState, app};

fn test_app(stripe_base: &str, revenuecat_base: &str) -> Router {
    let config = ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 4242,
        base_url: "http://localhost:4242".to_string(),
        session_secret: SecretString::from("test-session-secret-0123456789abcdef"),
        stripe: StripeConfig {
            secret_key: SecretString::from("sk_test_4eC39HqLyjWDarjtT1zdp7dc"),
            api_base: stripe_base.to_string(),
        },
        revenuecat: RevenueCatConfig {
            public_key: SecretString::from("strp_kQzNMvFjqzqEB7XmRSrWuVyJ"),
            api_base: revenuecat_base.to_string(),
        },
        catalog_limit: 10,
        sentry_dsn: None,
    };

    app(AppState::new(config).unwrap())
}

async fn mount_catalog(stripe: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                { "id": "prod_A", "name": "Gold Plan" },
                { "id": "prod_B", "name": "Silver Plan" }
            ],
            "has_more": false
        })))
        .mount(stripe)
        .await;

    Mock::given(method("GET"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                {
                    "id": "price_gold_m",
                    "product": "prod_A",
                    "currency": "usd",
                    "unit_amount": 999,
                    "recurring": { "interval": "month", "interval_count": 1 }
                },
                {
                    "id": "price_silver_y",
                    "product": "prod_B",
                    "currency": "usd",
                    "unit_amount": 4999,
                    "recurring": { "interval": "year", "interval_count": 1 }
                }
            ],
            "has_more": false
        })))
        .mount(stripe)
        .await;
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Extract the session cookie pair from a response.
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
        .unwrap()
}

#[tokio::test]
async fn checkout_page_lists_catalog_prices() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;
    mount_catalog(&stripe).await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("s-max-age=1, stale-while-revalidate")
    );

    let body = body_string(response).await;
    assert!(body.contains("Gold Plan"));
    assert!(body.contains("Silver Plan"));
    assert!(body.contains("$9.99"));
    assert!(body.contains("price_gold_m"));
}

#[tokio::test]
async fn checkout_page_filters_through_current_offering() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;
    mount_catalog(&stripe).await;

    // Only the gold monthly price is in the current offering. The anonymous
    // app user id is generated per session, so match the path by shape.
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(
            r"^/subscribers/[^/]+/offerings$",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_offering_id": "default",
            "offerings": [
                {
                    "identifier": "default",
                    "packages": [
                        { "identifier": "$rc_monthly", "platform_product_identifier": "prod_A" }
                    ]
                }
            ]
        })))
        .mount(&revenuecat)
        .await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());

    let configured = app
        .clone()
        .oneshot(
            Request::post("/configure")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("use_offerings=on"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(configured.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&configured);

    let response = app
        .oneshot(
            Request::get("/")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Gold Plan"));
    assert!(!body.contains("Silver Plan"));
}

#[tokio::test]
async fn create_checkout_session_redirects_to_hosted_checkout() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_1",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1"
        })))
        .mount(&stripe)
        .await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(
            Request::post("/create-checkout-session")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("price_id=price_gold_m"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("https://checkout.stripe.com/c/pay/cs_test_1")
    );
}

#[tokio::test]
async fn create_checkout_session_without_price_redirects_home() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(
            Request::post("/create-checkout-session")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("price_id="))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

#[tokio::test]
async fn success_without_session_id_redirects_home() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(Request::get("/success").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

#[tokio::test]
async fn success_exchanges_receipt_and_renders_entitlements() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_1",
            "customer": "cus_9",
            "customer_details": { "name": "Jane Doe", "email": "jane@example.com" },
            "subscription": "sub_42",
            "url": null
        })))
        .mount(&stripe)
        .await;

    Mock::given(method("POST"))
        .and(path("/receipts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "subscriber": {
                "original_app_user_id": "user_1",
                "entitlements": {
                    "premium": {
                        "product_identifier": "prod_A",
                        "expires_date": "2026-09-26T00:00:00Z"
                    }
                }
            }
        })))
        .mount(&revenuecat)
        .await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(
            Request::get("/success?session_id=cs_test_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("premium"));
    assert!(body.contains("prod_A"));
    assert!(body.contains("sub_42"));
    assert!(body.contains("cs_test_1"));
}

#[tokio::test]
async fn success_in_no_code_mode_skips_the_receipt_exchange() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_1",
            "subscription": "sub_42",
            "url": null
        })))
        .mount(&stripe)
        .await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());

    let configured = app
        .clone()
        .oneshot(
            Request::post("/configure")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("no_code_mode=on"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(configured.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&configured);

    let response = app
        .oneshot(
            Request::get("/success?session_id=cs_test_1")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("sub_42"));
    assert!(body.contains("cs_test_1"));
    assert!(body.contains("No-code mode"));
    // No receipt was posted.
    assert!(revenuecat.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_receipt_exchange_returns_structured_error() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout/sessions/cs_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_1",
            "subscription": "sub_42",
            "url": null
        })))
        .mount(&stripe)
        .await;

    Mock::given(method("POST"))
        .and(path("/receipts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"code": 7226, "message": "Invalid fetch token."}),
        ))
        .mount(&revenuecat)
        .await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(
            Request::get("/success?session_id=cs_test_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Invalid fetch token")
    );
    assert_eq!(body["receipt"]["fetch_token"], "sub_42");
}

#[tokio::test]
async fn vendor_failure_renders_a_generic_bad_gateway() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&stripe)
        .await;
    Mock::given(method("GET"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&stripe)
        .await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_string(response).await;
    // Vendor details never leak to the client.
    assert!(!body.contains("500"));
}

#[tokio::test]
async fn session_cookie_survives_process_restart() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;
    mount_catalog(&stripe).await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let configured = app
        .oneshot(
            Request::post("/configure")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("app_user_id=cus_42&email=walter%40example.com"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(configured.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&configured);

    // A router built from scratch, as after a restart: only the cookie and
    // the signing secret carry the session.
    let restarted = test_app(&stripe.uri(), &revenuecat.uri());
    let response = restarted
        .oneshot(
            Request::get("/")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("cus_42"));
    assert!(body.contains("walter@example.com"));
}

#[tokio::test]
async fn health_endpoint_is_unauthenticated() {
    let stripe = MockServer::start().await;
    let revenuecat = MockServer::start().await;

    let app = test_app(&stripe.uri(), &revenuecat.uri());
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}
