//! Gateway integration tests
//!
//! Exercise the verb operations end to end against a mock storefront:
//! envelope shape, credential injection and 401 teardown.

use crate::helpers::*;
use crate::mock_storefront::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use storefront_sdk::{EndpointCall, Error, RequestOptions, Verb, REQUEST_ID_HEADER};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_get_success_envelope() {
    let mock = MockStorefront::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [{"id": "p1"}, {"id": "p2"}]})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let test = TestClient::new(&mock.url());
    let envelope = test
        .client
        .get("/products", RequestOptions::new().param("page", 1))
        .await;

    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "success": true,
            "data": {"items": [{"id": "p1"}, {"id": "p2"}]},
            "message": "Success",
            "error": null
        })
    );
}

#[tokio::test]
async fn test_post_unauthorized_tears_down_session() {
    let mock = MockStorefront::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/items"))
        .and(header("authorization", "Bearer stale-token"))
        .and(body_json(json!({"productId": "p1", "quantity": 2})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let test = TestClient::with_token(&mock.url(), "stale-token");
    let envelope = test
        .client
        .post(
            "/cart/items",
            &json!({"productId": "p1", "quantity": 2}),
            RequestOptions::default(),
        )
        .await;

    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "success": false,
            "data": null,
            "message": "Token expired",
            "error": {"message": "Token expired"},
            "statusCode": 401
        })
    );
    assert!(!test.session.is_authenticated());
    assert_eq!(test.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_bearer_header_only_with_credential() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/auth/profile", 200, json!({"name": "Ada"}))
        .await;

    let anonymous = TestClient::new(&mock.url());
    let envelope = anonymous
        .client
        .get("/auth/profile", RequestOptions::default())
        .await;
    assert!(envelope.is_success());
    let request = mock.only_request().await;
    assert_eq!(header_value(&request, "authorization"), None);

    mock.server.reset().await;
    mock.mock_json("GET", "/auth/profile", 200, json!({"name": "Ada"}))
        .await;

    let signed_in = TestClient::with_token(&mock.url(), "abc123");
    let envelope = signed_in
        .client
        .get("/auth/profile", RequestOptions::default())
        .await;
    assert!(envelope.is_success());
    let request = mock.only_request().await;
    assert_eq!(
        header_value(&request, "authorization"),
        Some("Bearer abc123".to_string())
    );
}

#[tokio::test]
async fn test_credential_is_read_per_request() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/cart", 200, json!({"items": []})).await;

    let test = TestClient::new(&mock.url());
    test.client.get("/cart", RequestOptions::default()).await;
    test.session.sign_in("fresh");
    test.client.get("/cart", RequestOptions::default()).await;

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(header_value(&requests[0], "authorization"), None);
    assert_eq!(
        header_value(&requests[1], "authorization"),
        Some("Bearer fresh".to_string())
    );
}

#[tokio::test]
async fn test_invalid_credential_is_sent_unauthenticated() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/cart", 200, json!({})).await;

    let test = TestClient::with_token(&mock.url(), "bad\ntoken");
    let envelope = test.client.get("/cart", RequestOptions::default()).await;

    assert!(envelope.is_success());
    let request = mock.only_request().await;
    assert_eq!(header_value(&request, "authorization"), None);
}

#[tokio::test]
async fn test_error_without_server_message_uses_transport_text() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/orders/9", 404, json!({"error": "not_found"}))
        .await;

    let test = TestClient::with_token(&mock.url(), "t");
    let envelope = test.client.get("/orders/9", RequestOptions::default()).await;

    assert!(!envelope.is_success());
    assert!(envelope.data().is_none());
    assert_eq!(envelope.message(), "Request failed with status code 404");
    assert_eq!(envelope.error(), Some(&json!({"error": "not_found"})));
    assert_eq!(envelope.status_code(), Some(404));
    assert!(test.session.is_authenticated());
    assert!(test.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_error_with_empty_body_describes_failure() {
    let mock = MockStorefront::start().await;
    mock.mock_empty("DELETE", "/cart", 500).await;

    let test = TestClient::new(&mock.url());
    let envelope = test.client.delete("/cart", RequestOptions::default()).await;

    assert_eq!(envelope.status_code(), Some(500));
    assert_eq!(envelope.message(), "Request failed with status code 500");
    let error = envelope.error().unwrap();
    assert_eq!(error["kind"], "http");
    assert_eq!(error["status"], 500);
}

#[tokio::test]
async fn test_timeout_is_failure_without_status() {
    let mock = MockStorefront::start().await;
    mock.mock_delayed("GET", "/products", Duration::from_millis(500))
        .await;

    let test = TestClient::with_timeout(&mock.url(), Duration::from_millis(100));
    let envelope = test.client.get("/products", RequestOptions::default()).await;

    assert!(!envelope.is_success());
    assert!(envelope.data().is_none());
    assert_eq!(envelope.status_code(), None);
    assert_eq!(envelope.message(), "Request timed out after 100ms");
    assert_eq!(envelope.error().unwrap()["kind"], "timeout");
}

#[tokio::test]
async fn test_connection_refused_is_failure_without_status() {
    let test = TestClient::with_token(&unreachable_url(), "t");
    let envelope = test.client.get("/products", RequestOptions::default()).await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.status_code(), None);
    assert!(envelope.message().starts_with("Connection error"));
    assert!(test.session.is_authenticated());
}

#[tokio::test]
async fn test_verbs_send_method_and_body() {
    let mock = MockStorefront::start().await;
    Mock::given(method("PUT"))
        .and(path("/products/p1"))
        .and(body_json(json!({"name": "Lamp"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p1"})))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/cart/items/i1"))
        .and(body_json(json!({"quantity": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quantity": 4})))
        .expect(1)
        .mount(&mock.server)
        .await;
    mock.mock_empty("DELETE", "/products/p1", 204).await;

    let test = TestClient::new(&mock.url());
    let put = test
        .client
        .put("/products/p1", &json!({"name": "Lamp"}), RequestOptions::default())
        .await;
    let patch = test
        .client
        .patch("/cart/items/i1", &json!({"quantity": 4}), RequestOptions::default())
        .await;
    let delete = test.client.delete("/products/p1", RequestOptions::default()).await;

    assert_eq!(put.data(), Some(&json!({"id": "p1"})));
    assert_eq!(patch.data(), Some(&json!({"quantity": 4})));
    assert!(delete.is_success());
    assert_eq!(delete.data(), Some(&serde_json::Value::Null));

    let requests = mock.requests().await;
    assert!(requests[2].body.is_empty());
}

#[tokio::test]
async fn test_plain_text_body_is_kept_as_string() {
    let mock = MockStorefront::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock.server)
        .await;

    let test = TestClient::new(&mock.url());
    let envelope = test.client.get("/health", RequestOptions::default()).await;
    assert_eq!(envelope.data(), Some(&json!("OK")));
}

#[tokio::test]
async fn test_session_bearer_replaces_per_call_authorization() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/cart", 200, json!({"items": []})).await;

    let test = TestClient::with_token(&mock.url(), "session-token");
    let options = RequestOptions::new().header("authorization", "Bearer other");
    assert!(test.client.get("/cart", options).await.is_success());

    let request = mock.only_request().await;
    let values: Vec<_> = request
        .headers
        .get_all("authorization")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(values, vec!["Bearer session-token"]);
}

#[tokio::test]
async fn test_per_call_authorization_kept_without_session() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/cart", 200, json!({"items": []})).await;

    let test = TestClient::new(&mock.url());
    let options = RequestOptions::new().header("authorization", "Bearer other");
    test.client.get("/cart", options).await;

    let request = mock.only_request().await;
    assert_eq!(
        header_value(&request, "authorization"),
        Some("Bearer other".to_string())
    );
}

#[tokio::test]
async fn test_per_call_headers_and_request_id() {
    let mock = MockStorefront::start().await;
    mock.mock_json("GET", "/orders", 200, json!([])).await;

    let test = TestClient::new(&mock.url());
    let options = RequestOptions::new()
        .param("status", "open")
        .header("x-currency", "EUR");
    test.client.get("/orders", options).await;

    let request = mock.only_request().await;
    assert_eq!(header_value(&request, "x-currency"), Some("EUR".to_string()));
    assert_eq!(
        header_value(&request, "content-type"),
        Some("application/json".to_string())
    );
    assert_eq!(header_value(&request, REQUEST_ID_HEADER).map(|id| id.len()), Some(36));
    assert_eq!(request.url.query(), Some("status=open"));
}

#[tokio::test]
async fn test_api_error_carries_request_id() {
    let mock = MockStorefront::start().await;
    mock.mock_json("DELETE", "/orders/o9", 409, json!({"message": "Already shipped"}))
        .await;

    let test = TestClient::new(&mock.url());
    let err = test
        .client
        .execute(&EndpointCall::new(Verb::Delete, "/orders/o9"))
        .await
        .unwrap_err();

    let request = mock.only_request().await;
    assert_eq!(err.status_code(), Some(409));
    assert_eq!(
        err.request_id().map(String::from),
        header_value(&request, REQUEST_ID_HEADER)
    );
    assert!(test.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_execute_raises_after_teardown() {
    let mock = MockStorefront::start().await;
    mock.mock_unauthorized("GET", "/auth/profile", "Session revoked")
        .await;

    let test = TestClient::with_token(&mock.url(), "t");
    let result = test
        .client
        .execute(&EndpointCall::new(Verb::Get, "/auth/profile"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(err.body(), Some(&json!({"message": "Session revoked"})));
    let request = mock.only_request().await;
    assert_eq!(
        err.request_id().map(String::from),
        header_value(&request, REQUEST_ID_HEADER)
    );
    assert!(!test.session.is_authenticated());
    assert_eq!(test.navigator.visits().len(), 1);
}

#[tokio::test]
async fn test_teardown_once_per_failure() {
    let mock = MockStorefront::start().await;
    mock.mock_unauthorized("GET", "/cart", "Token expired").await;

    let test = TestClient::with_token(&mock.url(), "t");
    for _ in 0..2 {
        let envelope = test.client.get("/cart", RequestOptions::default()).await;
        assert_eq!(envelope.status_code(), Some(401));
    }

    assert_eq!(test.navigator.visits().len(), 2);
    // The second call already went out without a credential.
    let requests = mock.requests().await;
    assert_eq!(header_value(&requests[1], "authorization"), None);
}

#[tokio::test]
async fn test_concurrent_unauthorized_calls() {
    let mock = MockStorefront::start().await;
    mock.mock_unauthorized("GET", "/orders", "Token expired").await;

    let test = TestClient::with_token(&mock.url(), "t");
    let calls = (0..8).map(|_| {
        let client = test.client.clone();
        tokio::spawn(async move { client.get("/orders", RequestOptions::default()).await })
    });

    let envelopes = futures::future::join_all(calls).await;
    for envelope in envelopes {
        let envelope = envelope.unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.status_code(), Some(401));
        assert_eq!(envelope.message(), "Token expired");
    }

    assert!(!test.session.is_authenticated());
    assert_eq!(test.navigator.visits().len(), 8);
}
