//! HTTP-layer coverage for tenant administration: create, list, delete,
//! reload.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use hodei_pdp_api::build_app_for_tests;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn decode(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_list_and_delete_round_trip() {
    let (app, _state) = build_app_for_tests().await.unwrap();

    let create_body = json!({"tenantID": "acme", "name": "Acme Corp"});
    let create_req = Request::builder()
        .method("POST")
        .uri("/api/v1/tenants")
        .header("content-type", "application/json")
        .body(Body::from(create_body.to_string()))
        .unwrap();
    let create_resp = app.clone().oneshot(create_req).await.unwrap();
    assert_eq!(create_resp.status(), StatusCode::CREATED);
    let tenant = decode(create_resp).await;
    assert_eq!(tenant["id"], "acme");
    assert_eq!(tenant["name"], "Acme Corp");

    let list_req = Request::builder().method("GET").uri("/api/v1/tenants").body(Body::empty()).unwrap();
    let list_resp = app.clone().oneshot(list_req).await.unwrap();
    assert_eq!(list_resp.status(), StatusCode::OK);
    let tenants = decode(list_resp).await;
    let ids: Vec<&str> = tenants.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&"acme"));
    assert!(ids.contains(&pdp_tenant::DEFAULT_TENANT_ID));

    let delete_req =
        Request::builder().method("DELETE").uri("/api/v1/tenants/acme").body(Body::empty()).unwrap();
    let delete_resp = app.clone().oneshot(delete_req).await.unwrap();
    assert_eq!(delete_resp.status(), StatusCode::NO_CONTENT);

    let list_req = Request::builder().method("GET").uri("/api/v1/tenants").body(Body::empty()).unwrap();
    let list_resp = app.oneshot(list_req).await.unwrap();
    let tenants = decode(list_resp).await;
    let ids: Vec<&str> = tenants.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert!(!ids.contains(&"acme"));
}

#[tokio::test]
async fn creating_a_duplicate_tenant_id_returns_409() {
    let (app, _state) = build_app_for_tests().await.unwrap();

    let body = json!({"tenantID": "dup", "name": "First"});
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/tenants")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = json!({"tenantID": "dup", "name": "Second"});
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/tenants")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleting_an_unknown_tenant_returns_404() {
    let (app, _state) = build_app_for_tests().await.unwrap();

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/v1/tenants/ghost")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reloading_an_unknown_tenant_returns_404() {
    let (app, _state) = build_app_for_tests().await.unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/tenants/ghost/reload")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reloading_the_default_tenant_succeeds() {
    let (app, _state) = build_app_for_tests().await.unwrap();

    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/tenants/{}/reload", pdp_tenant::DEFAULT_TENANT_ID))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
