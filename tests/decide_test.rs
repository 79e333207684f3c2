//! HTTP-layer coverage for `/api/v1/decide` and `/api/v1/simulate`. The
//! decision algorithm itself is exercised exhaustively in
//! `pdp-engine/tests/scenarios.rs`; this file only checks that the wiring
//! (tenant lookup, context merge, status codes, JSON shape) is correct.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use hodei_pdp_api::build_app_for_tests;
use pdp_policy::PolicySource;
use serde_json::{Value, json};
use tower::ServiceExt;

const DOC: &str = r#"
roles:
  - name: "editor"
    policies: ["can-edit"]
users:
  - username: "alice"
    roles: ["editor"]
  - username: "bob"
    roles: []
policies:
  - id: "can-edit"
    subjects:
      - role: "editor"
    resource: ["doc1"]
    action: ["edit"]
    effect: "allow"
"#;

async fn decode(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn allowed_request_returns_allow_true_with_policy_id() {
    let (app, state) = build_app_for_tests().await.unwrap();
    state.registry.create("docs", PolicySource::Inline(DOC.to_string())).unwrap();

    let body = json!({"tenantID": "docs", "subject": "alice", "resource": "doc1", "action": "edit"});
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/decide")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let decision = decode(resp).await;
    assert_eq!(decision["allow"], true);
    assert_eq!(decision["policyID"], "can-edit");
    assert_eq!(decision["reason"], "allowed by policy");
}

#[tokio::test]
async fn subject_without_matching_role_falls_through_to_no_matching_policy() {
    let (app, state) = build_app_for_tests().await.unwrap();
    state.registry.create("docs", PolicySource::Inline(DOC.to_string())).unwrap();

    let body = json!({"tenantID": "docs", "subject": "bob", "resource": "doc1", "action": "edit"});
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/decide")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let decision = decode(resp).await;
    assert_eq!(decision["allow"], false);
    assert_eq!(decision["reason"], "no matching policy");
}

#[tokio::test]
async fn unknown_tenant_returns_404() {
    let (app, _state) = build_app_for_tests().await.unwrap();

    let body = json!({"tenantID": "nonexistent", "subject": "alice", "resource": "doc1", "action": "edit"});
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/decide")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn extra_conditions_field_is_merged_into_the_evaluation_context() {
    let (app, state) = build_app_for_tests().await.unwrap();
    state.registry.create("docs", PolicySource::Inline(DOC.to_string())).unwrap();

    let body = json!({
        "tenantID": "docs",
        "subject": "alice",
        "resource": "doc1",
        "action": "edit",
        "conditions": {"department": "engineering"}
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/decide")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let decision = decode(resp).await;
    assert_eq!(decision["context"]["department"], "engineering");
}

#[tokio::test]
async fn simulate_runs_the_same_algorithm_as_decide() {
    let (app, state) = build_app_for_tests().await.unwrap();
    state.registry.create("docs", PolicySource::Inline(DOC.to_string())).unwrap();

    let body = json!({"tenantID": "docs", "subject": "alice", "resource": "doc1", "action": "edit"});
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/simulate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let decision = decode(resp).await;
    assert_eq!(decision["allow"], true);
}
