use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::config::WelfarePolicy;
use crate::welfare::lifecycle::Role;
use crate::welfare::router::{review_handler, welfare_router, WelfareState};
use crate::welfare::service::{ReviewRequest, WelfareService};

fn request(method: Method, uri: &str, role: Option<Role>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header(header::AUTHORIZATION, bearer(role));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn eligibility_body(resident_id: &str, scheme_id: &str) -> Value {
    json!({ "residentId": resident_id, "schemeId": scheme_id })
}

fn application_body(resident_id: &str, scheme_id: &str) -> Value {
    json!({
        "residentId": resident_id,
        "schemeId": scheme_id,
        "aadhaar": "123456789012",
        "rdNumber": "RD-2024-0042",
        "rationCardNumber": "KA-RC-778812",
    })
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(request(Method::GET, "/api/applications", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "no token, authorization denied");
}

#[tokio::test]
async fn tokens_signed_elsewhere_are_unauthorized() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let mut forged = request(Method::GET, "/api/schemes", None, None);
    forged.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl".parse().unwrap(),
    );

    let response = router.oneshot(forged).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn eligibility_route_reports_verdict() {
    let (service, _) = build_service();
    let (resident_id, scheme_id) = seed(&service);
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/eligibility",
            Some(Role::Resident),
            Some(eligibility_body(&resident_id.0, &scheme_id.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["eligible"], true);
    assert_eq!(payload["residentName"], "Ramesh Kumar");
    assert_eq!(payload["schemeName"], "Pradhan Mantri Awas Yojana (PMAY)");
    assert_eq!(payload["criteria"]["maxIncome"], 300_000);
    assert_eq!(payload["criteria"]["mustNotHaveHouse"], true);
}

#[tokio::test]
async fn eligibility_route_returns_not_found_for_unknown_records() {
    let (service, _) = build_service();
    let (_, scheme_id) = seed(&service);
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/eligibility",
            Some(Role::Officer),
            Some(eligibility_body("res-ghost", &scheme_id.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Resident res-ghost not found");
}

#[tokio::test]
async fn eligibility_route_requires_both_ids() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/eligibility",
            Some(Role::Officer),
            Some(json!({ "residentId": "res-1" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "schemeId is required");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/api/applications")
        .header(header::AUTHORIZATION, bearer(Role::Resident))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"residentId\":"))
        .unwrap();

    let response = router.oneshot(malformed).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_route_creates_then_rejects_duplicates() {
    let (service, _) = build_service();
    let (resident_id, scheme_id) = seed(&service);
    let router = router_with_service(service);

    let created = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/applications",
            Some(Role::Resident),
            Some(application_body(&resident_id.0, &scheme_id.0)),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload["status"], "Pending");
    assert_eq!(payload["rdNumber"], "RD-2024-0042");

    let duplicate = router
        .oneshot(request(
            Method::POST,
            "/api/applications",
            Some(Role::Resident),
            Some(application_body(&resident_id.0, &scheme_id.0)),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(duplicate).await;
    assert_eq!(payload["error"], "Already applied for this scheme.");
}

#[tokio::test]
async fn submit_route_is_unprocessable_when_policy_blocks() {
    let (service, _) = build_service_with_policy(WelfarePolicy {
        enforce_eligibility_on_apply: true,
    });
    let (_, scheme_id) = seed(&service);
    let wealthy = service
        .register_resident({
            let mut submission = resident_submission("555566667777");
            submission.income = 900_000;
            submission
        })
        .expect("registers");
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/applications",
            Some(Role::Resident),
            Some(application_body(&wealthy.id.0, &scheme_id.0)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn review_route_enforces_role_and_status() {
    let (service, _) = build_service();
    let (resident_id, scheme_id) = seed(&service);
    let record = service
        .apply(application_request(&resident_id, &scheme_id))
        .expect("application accepted");
    let router = router_with_service(service);
    let uri = format!("/api/applications/{}/review", record.id);

    let forbidden = router
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(Role::Resident),
            Some(json!({ "status": "Approved" })),
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let invalid = router
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(Role::Officer),
            Some(json!({ "status": "Cancelled" })),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let approved = router
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(Role::Officer),
            Some(json!({ "status": "Approved", "reviewComment": "All documents verified" })),
        ))
        .await
        .unwrap();
    assert_eq!(approved.status(), StatusCode::OK);
    let payload = read_json_body(approved).await;
    assert_eq!(payload["status"], "Approved");
    assert_eq!(payload["reviewer"], "officer-1");
    assert_eq!(payload["reviewComment"], "All documents verified");

    let fetched = router
        .oneshot(request(
            Method::GET,
            &format!("/api/applications/{}", record.id),
            Some(Role::Resident),
            None,
        ))
        .await
        .unwrap();
    let payload = read_json_body(fetched).await;
    assert_eq!(payload["status"], "Approved");
}

#[tokio::test]
async fn review_route_checks_role_before_body() {
    let (service, _) = build_service();
    let (resident_id, scheme_id) = seed(&service);
    let record = service
        .apply(application_request(&resident_id, &scheme_id))
        .expect("application accepted");
    let router = router_with_service(service);
    let uri = format!("/api/applications/{}/review", record.id);

    let empty = router
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(Role::Resident),
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::FORBIDDEN);

    let malformed = router
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(Role::Resident),
            Some(json!({ "status": 7 })),
        ))
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn review_handler_returns_not_found_for_unknown_application() {
    let (service, _) = build_service();
    let state = WelfareState {
        service: Arc::new(service),
        identity: verifier(),
    };

    let response = review_handler(
        State(state),
        caller(Role::Admin),
        Path("app-missing".to_string()),
        Ok(Json(ReviewRequest {
            status: "Approved".to_string(),
            review_comment: None,
        })),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resident_routes_cover_registry_lifecycle() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let submission = serde_json::to_value(resident_submission("246813579024")).unwrap();

    let created = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/residents",
            Some(Role::Officer),
            Some(submission.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let resident = read_json_body(created).await;
    let id = resident["id"].as_str().unwrap().to_string();
    assert_eq!(resident["status"], "Active");

    let duplicate = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/residents",
            Some(Role::Officer),
            Some(submission.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let mut changes = submission;
    changes["income"] = json!(175_000);
    let updated = router
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/residents/{id}"),
            Some(Role::Officer),
            Some(changes),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(read_json_body(updated).await["income"], 175_000);

    let listed = router
        .clone()
        .oneshot(request(Method::GET, "/api/residents", Some(Role::Admin), None))
        .await
        .unwrap();
    assert_eq!(read_json_body(listed).await.as_array().map(Vec::len), Some(1));

    let deleted = router
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/residents/{id}"),
            Some(Role::Admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(deleted).await["message"],
        "Resident deleted successfully"
    );

    let missing = router
        .oneshot(request(
            Method::GET,
            &format!("/api/residents/{id}"),
            Some(Role::Admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scheme_routes_create_and_list() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let created = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/schemes",
            Some(Role::Admin),
            Some(serde_json::to_value(scheme_submission()).unwrap()),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let scheme = read_json_body(created).await;
    assert_eq!(scheme["eligibilityCriteria"]["ageMin"], 18);
    assert_eq!(scheme["status"], "Active");

    let listed = router
        .oneshot(request(Method::GET, "/api/schemes", Some(Role::Resident), None))
        .await
        .unwrap();
    let schemes = read_json_body(listed).await;
    assert_eq!(schemes[0]["id"], scheme["id"]);
}

#[tokio::test]
async fn store_outage_returns_internal_error() {
    let service = WelfareService::new(Arc::new(UnavailableStore), WelfarePolicy::default());
    let router = welfare_router(Arc::new(service), verifier());

    let response = router
        .oneshot(request(Method::GET, "/api/schemes", Some(Role::Admin), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "store unavailable: database offline");
}
