//! Request engine behaviour against a scripted transport


use std::time::Duration;

use outline_core::{
    ClientConfig, CreateDocumentData, Error, Method, RequestEngine, RequestOptions, TransportError,
    TransportErrorKind,
};
use serde_json::{json, Value};
use test_support::*;

#[tokio::test]
async fn test_auth_info_single_call() {
    let transport = MockTransport::new([ok(json!({ "user": { "id": "u1" } }))]);
    let engine = engine(transport.clone());

    let response = engine
        .request::<Value>("/auth.info", RequestOptions::new())
        .await
        .unwrap();

    assert!(response.ok);
    assert_eq!(response.status, 200);
    assert_eq!(response.data, Some(json!({ "user": { "id": "u1" } })));
    assert_eq!(transport.call_count(), 1);

    let request = &transport.requests()[0];
    assert_eq!(request.url, "https://x/api/auth.info");
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header("Authorization"), Some("Bearer k"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("Accept"), Some("application/json"));
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_retried_with_backoff() {
    let transport = MockTransport::new([
        respond(500, json!({ "ok": false, "error": "internal_error" })),
        respond(500, json!({ "ok": false, "error": "internal_error" })),
        ok(json!({ "success": true })),
    ]);
    let engine = engine(transport.clone());

    let response = engine
        .request::<Value>("/documents.info", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.data, Some(json!({ "success": true })));
    assert_eq!(transport.call_count(), 3);
    assert_eq!(
        transport.gaps(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[tokio::test]
async fn test_validation_error_is_not_retried() {
    let transport = MockTransport::new([respond(
        400,
        json!({ "error": "validation_error", "message": "Name is required" }),
    )]);
    let engine = engine(transport.clone());

    let err = engine
        .request::<Value>("/collections.create", RequestOptions::new())
        .await
        .unwrap_err();

    let api = err.api_error().expect("classified error");
    assert_eq!(api.message, "Name is required");
    assert_eq!(api.status, 400);
    assert_eq!(api.code.as_deref(), Some("validation_error"));
    assert!(api.is_validation_error());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ok_false_on_success_status_is_not_retried() {
    let transport = MockTransport::new([
        respond(200, json!({ "ok": false, "error": "not_allowed", "message": "" })),
        ok(json!({})),
    ]);
    let engine = engine(transport.clone());

    let err = engine
        .request::<Value>("/documents.update", RequestOptions::new())
        .await
        .unwrap_err();

    let api = err.api_error().expect("classified error");
    assert_eq!(api.status, 200);
    assert_eq!(api.message, "not_allowed");
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_with_unexpected_shape_is_sent_once() {
    let partial = json!({ "id": "d1", "title": "T" });
    let transport = MockTransport::new([ok(partial.clone()), ok(partial.clone()), ok(partial)]);
    let client = client(transport.clone());

    let started = tokio::time::Instant::now();
    let err = client
        .documents
        .create(&CreateDocumentData {
            title: "T".to_string(),
            text: "body".to_string(),
            collection_id: "col-123".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match &err {
        Error::Transport(t) => assert_eq!(t.kind, TransportErrorKind::MalformedPayload),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_retryable());
    assert_eq!(transport.call_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_info_with_null_list_field_is_sent_once() {
    let mut doc = document("d1");
    doc["collaboratorIds"] = Value::Null;
    let transport = MockTransport::new([ok(doc.clone()), ok(doc)]);
    let client = client(transport.clone());

    let err = client.documents.info("d1").await.unwrap_err();

    assert!(err.is_transport_error());
    assert!(err.status().is_none());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_client_errors_make_exactly_one_attempt() {
    for status in [400u16, 401, 403, 404] {
        let transport = MockTransport::new([
            respond(status, json!({ "ok": false, "error": "nope" })),
            ok(json!({})),
        ]);
        let engine = engine(transport.clone());

        let started = tokio::time::Instant::now();
        let err = engine
            .request::<Value>("/documents.info", RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(status));
        assert_eq!(transport.call_count(), 1, "status {}", status);
        assert_eq!(started.elapsed(), Duration::ZERO, "status {}", status);
    }
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_is_retried() {
    let transport = MockTransport::new([
        respond(429, json!({ "ok": false, "error": "rate_limit_exceeded" })),
        ok(json!([])),
    ]);
    let engine = engine(transport.clone());

    let response = engine
        .request::<Vec<Value>>("/documents.list", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.data, Some(vec![]));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_returns_last_error() {
    let transport = MockTransport::new([
        respond(500, json!({ "message": "first" })),
        respond(502, json!({ "message": "second" })),
        respond(503, json!({ "message": "third" })),
        ok(json!({})),
    ]);
    let engine = engine(transport.clone());

    let err = engine
        .request::<Value>("/auth.info", RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "third");
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_attempts_from_config() {
    let transport = MockTransport::new(
        std::iter::repeat_with(|| respond(500, json!({}))).take(6),
    );
    let engine = RequestEngine::new(test_config().with_retry_attempts(5), transport.clone()).unwrap();

    let err = engine
        .request::<Value>("/auth.info", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(transport.call_count(), 5);
    assert_eq!(
        transport.gaps(),
        [100, 200, 400, 800].map(Duration::from_millis).to_vec()
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_a_retryable_transport_failure() {
    let transport = MockTransport::new([Step::Hang, ok(json!({ "id": "d1" }))]);
    let config = test_config().with_timeout(Duration::from_secs(2));
    let engine = RequestEngine::new(config, transport.clone()).unwrap();

    let response = engine
        .request::<Value>("/documents.info", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.data, Some(json!({ "id": "d1" })));
    // two seconds of timeout, then the first backoff
    assert_eq!(transport.gaps(), vec![Duration::from_millis(2100)]);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failures_surface_without_status() {
    let transport = MockTransport::new([
        Step::Fail(TransportError::new(TransportErrorKind::Connect, "refused")),
        respond_raw(200, ""),
        respond_raw(502, "<html>bad gateway</html>"),
    ]);
    let engine = engine(transport.clone());

    let err = engine
        .request::<Value>("/auth.info", RequestOptions::new())
        .await
        .unwrap_err();

    match &err {
        Error::Transport(t) => assert_eq!(t.kind, TransportErrorKind::InvalidJson),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status(), None);
    assert!(err.api_error().is_none());
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn test_same_config_same_wire_request() {
    let body = json!({ "id": "doc-1", "text": "hello" });
    let mut wire = Vec::new();

    for _ in 0..2 {
        let transport = MockTransport::new([ok(json!({}))]);
        let engine = RequestEngine::new(test_config(), transport.clone()).unwrap();
        engine
            .request::<Value>("/documents.update", RequestOptions::new().with_body(body.clone()))
            .await
            .unwrap();
        wire.push(transport.requests().remove(0));
    }

    assert_eq!(wire[0], wire[1]);
    assert_eq!(
        serde_json::from_str::<Value>(wire[0].body.as_deref().unwrap()).unwrap(),
        body
    );
}

#[tokio::test]
async fn test_method_override() {
    let transport = MockTransport::new([ok(json!({}))]);
    let engine = engine(transport.clone());

    engine
        .request::<Value>("/documents.info", RequestOptions::new().with_method(Method::Get))
        .await
        .unwrap();

    assert_eq!(transport.requests()[0].method, Method::Get);
}

#[tokio::test]
async fn test_struct_literal_config_url_is_normalized() {
    let transport = MockTransport::new([ok(json!({}))]);
    let config = ClientConfig {
        api_url: "https://x/api/".into(),
        ..ClientConfig::new("k")
    };
    let engine = RequestEngine::new(config, transport.clone()).unwrap();

    engine
        .request::<Value>("/auth.info", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(engine.config().api_url, "https://x/api");
    assert_eq!(transport.requests()[0].url, "https://x/api/auth.info");
}

#[test]
fn test_engine_construction_fails_on_empty_key() {
    let transport = MockTransport::new([]);
    let err = RequestEngine::new(ClientConfig::new(""), transport.clone()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(transport.call_count(), 0);
}
