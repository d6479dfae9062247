use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use razorpay_gateway::{
    config::{Config, RazorpayConfig, RetentionConfig, ServerConfig},
    services::razorpay::{RazorpayClient, SignatureVerifier},
    store::InMemoryPaymentStore,
    AppState,
};

const KEY_SECRET: &str = "test_key_secret";
const WEBHOOK_SECRET: &str = "test_webhook_secret";

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        razorpay: RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: KEY_SECRET.to_string(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
        },
        retention: RetentionConfig {
            status_ttl_secs: 3600,
            sweep_interval_secs: 60,
        },
    }
}

fn test_app() -> Router {
    let config = test_config();
    let razorpay = RazorpayClient::new(&config.razorpay).unwrap();
    let payments = Arc::new(InMemoryPaymentStore::new(Duration::from_secs(3600)));
    razorpay_gateway::api::create_router(AppState::new(config, razorpay, payments))
}

fn captured_webhook_body(payment_id: &str) -> String {
    json!({
        "entity": "event",
        "event": "payment.captured",
        "contains": ["payment"],
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "order_id": "order_MkWvZT8n0p",
                    "amount": 50000,
                    "currency": "INR",
                    "status": "captured",
                    "method": "upi"
                }
            }
        },
        "created_at": 1700000000
    })
    .to_string()
}

fn signed_webhook_request(body: &str, secret: &str) -> Request<Body> {
    let signature = SignatureVerifier::sign_hex(body.as_bytes(), secret).unwrap();
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-razorpay-signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_status(app: &Router, payment_id: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/payment-status/{}", payment_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn captured_webhook_marks_payment_success() {
    let app = test_app();
    let body = captured_webhook_body("pay_123");

    let response = app
        .clone()
        .oneshot(signed_webhook_request(&body, WEBHOOK_SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let status = get_status(&app, "pay_123").await;
    assert_eq!(status["status"], "success");
    assert_eq!(status["details"]["order_id"], "order_MkWvZT8n0p");
}

#[tokio::test]
async fn replayed_webhook_is_idempotent() {
    let app = test_app();
    let body = captured_webhook_body("pay_replay");

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(signed_webhook_request(&body, WEBHOOK_SECRET))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let status = get_status(&app, "pay_replay").await;
    assert_eq!(status["status"], "success");
}

#[tokio::test]
async fn failed_webhook_marks_payment_failed() {
    let app = test_app();
    let body = json!({
        "event": "payment.failed",
        "payload": {
            "payment": {
                "entity": {
                    "id": "pay_bad",
                    "status": "failed",
                    "error_code": "BAD_REQUEST_ERROR",
                    "error_description": "Payment failed"
                }
            }
        }
    })
    .to_string();

    let response = app
        .clone()
        .oneshot(signed_webhook_request(&body, WEBHOOK_SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let status = get_status(&app, "pay_bad").await;
    assert_eq!(status["status"], "failed");
}

#[tokio::test]
async fn bad_webhook_signature_is_rejected_without_mutation() {
    let app = test_app();
    let body = captured_webhook_body("pay_forged");

    let response = app
        .clone()
        .oneshot(signed_webhook_request(&body, "wrong_secret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = body_json(response).await;
    assert_eq!(error["error"]["code"], "WEBHOOK_VERIFICATION_FAILED");
    // The expected signature must never leak into the response.
    assert!(!error.to_string().contains(
        &SignatureVerifier::sign_hex(
            captured_webhook_body("pay_forged").as_bytes(),
            WEBHOOK_SECRET
        )
        .unwrap()
    ));

    let status = get_status(&app, "pay_forged").await;
    assert_eq!(status["status"], "pending");
}

#[tokio::test]
async fn webhook_without_signature_header_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(captured_webhook_body("pay_123")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_webhook_event_is_accepted_and_ignored() {
    let app = test_app();
    let body = json!({
        "event": "invoice.paid",
        "payload": {}
    })
    .to_string();

    let response = app
        .clone()
        .oneshot(signed_webhook_request(&body, WEBHOOK_SECRET))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn unknown_payment_id_reads_as_pending() {
    let app = test_app();
    let status = get_status(&app, "pay_never_seen").await;
    assert_eq!(status["status"], "pending");
    assert!(status.get("details").is_none());
}

#[tokio::test]
async fn verify_payment_accepts_valid_signature() {
    let app = test_app();
    let message = "order_abc|pay_xyz";
    let signature = SignatureVerifier::sign_hex(message.as_bytes(), KEY_SECRET).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify-payment")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "razorpay_order_id": "order_abc",
                        "razorpay_payment_id": "pay_xyz",
                        "razorpay_signature": signature
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "success");

    // The synchronous verify path is advisory and never writes status.
    let status = get_status(&app, "pay_xyz").await;
    assert_eq!(status["status"], "pending");
}

#[tokio::test]
async fn verify_payment_rejects_tampered_signature() {
    let app = test_app();
    let message = "order_abc|pay_xyz";
    let mut signature = SignatureVerifier::sign_hex(message.as_bytes(), KEY_SECRET).unwrap();
    // Flip the last hex character.
    let flipped = if signature.ends_with('0') { "1" } else { "0" };
    signature.truncate(signature.len() - 1);
    signature.push_str(flipped);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify-payment")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "razorpay_order_id": "order_abc",
                        "razorpay_payment_id": "pay_xyz",
                        "razorpay_signature": signature
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "failure");
}

#[tokio::test]
async fn verify_payment_with_missing_fields_never_reaches_hmac() {
    let app = test_app();

    // Missing razorpay_signature entirely.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify-payment")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "razorpay_order_id": "order_abc",
                        "razorpay_payment_id": "pay_xyz"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    // Present but empty signature is a validation error, not a failed verify.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify-payment")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "razorpay_order_id": "order_abc",
                        "razorpay_payment_id": "pay_xyz",
                        "razorpay_signature": ""
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn health_reports_secret_presence_without_echoing() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["razorpay"]["key_configured"], true);
    assert_eq!(health["razorpay"]["webhook_secret_configured"], true);
    assert!(!health.to_string().contains(KEY_SECRET));
}
