use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::matching::domain::ProductionType;
use crate::matching::ranking::BatchRanker;
use crate::matching::router::{match_handler, matching_router};
use crate::matching::service::{MatchingRequest, MatchingService};

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serializes")))
        .expect("request")
}

#[tokio::test]
async fn matching_route_ranks_the_catalog() {
    let mut inactive = aid("closed");
    inactive.status = crate::matching::domain::AidStatus::Expired;
    let service = service_with(vec![
        aid_with("dairy-only", |criteria| {
            criteria.production_types = BTreeSet::from([ProductionType::Dairy]);
        }),
        aid("open"),
        inactive,
    ]);

    let response = matching_router(service)
        .oneshot(post_json(
            "/api/v1/matching",
            &json!({ "profile": profile() }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["profile_id"], json!("farm-001"));
    assert!(payload.get("generated_at").is_some());
    assert_eq!(payload["report"]["total_aids"], json!(2));
    assert_eq!(payload["report"]["eligible"], json!(1));
    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results[0]["aid_id"], json!("open"));
    assert_eq!(
        results[1]["blocking_failures"],
        json!(["Production type"])
    );
}

#[tokio::test]
async fn matching_route_prefers_supplied_aids_and_top_n() {
    let service = service_with(vec![aid("catalog-aid")]);

    let response = matching_router(service)
        .oneshot(post_json(
            "/api/v1/matching",
            &json!({
                "profile": profile(),
                "aids": [aid("supplied-1"), aid("supplied-2")],
                "top_n": 1
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["aid_id"], json!("supplied-1"));
    assert_eq!(payload["report"]["total_aids"], json!(2));
}

#[tokio::test]
async fn match_handler_returns_unavailable_when_catalog_fails() {
    let service = Arc::new(MatchingService::new(
        Arc::new(UnavailableCatalog),
        BatchRanker::new(false),
        10,
    ));

    let response = match_handler::<UnavailableCatalog>(
        State(service),
        axum::Json(MatchingRequest {
            profile: profile(),
            aids: None,
            top_n: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("store offline"));
}

#[tokio::test]
async fn evaluate_route_scores_one_pair() {
    let service = service_with(Vec::new());

    let response = matching_router(service)
        .oneshot(post_json(
            "/api/v1/matching/evaluate",
            &json!({ "aid": aid("single"), "profile": profile() }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(100.0));
    assert_eq!(payload["eligible"], json!(true));
    assert_eq!(payload["criteria"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn evaluate_route_rejects_malformed_aid_numbers() {
    let service = service_with(Vec::new());
    let mut profile = profile();
    profile.total_surface = -1.0;

    let response = matching_router(service)
        .oneshot(post_json(
            "/api/v1/matching/evaluate",
            &json!({ "aid": aid("single"), "profile": profile }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn eligibility_route_lists_legacy_aids() {
    let service = service_with(Vec::new());

    let response = matching_router(service)
        .oneshot(post_json(
            "/api/v1/eligibility",
            &json!({
                "profile": profile(),
                "aids": [
                    {
                        "aid_id": "legacy-1",
                        "title": "Installation aid",
                        "hard_criteria": {"<=": ["$age", 40]},
                        "soft_tags": ["MODERNISATION"]
                    },
                    {
                        "aid_id": "legacy-2",
                        "title": "Unknown operator",
                        "hard_criteria": {"between": ["$age", 18, 40]}
                    }
                ],
                "permissive": true
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_eligible"], json!(2));
    assert_eq!(payload["results"][0]["aid_id"], json!("legacy-1"));
    assert_eq!(payload["results"][0]["relevance"], json!(100.0));
    assert_eq!(payload["results"][0]["reasons"], json!(["✔ Age: 35 <= 40"]));
}
