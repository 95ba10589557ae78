use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::dashboard::ApplicationStatus;
use crate::workflows::scoring::{ScoreResultRepository, ScoringConfigRepository};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Owner-Id", OWNER)
        .body(Body::empty())
        .expect("request")
}

fn json_request(method: Method, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Owner-Id", OWNER)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn missing_owner_header_is_unauthorized() {
    let fixture = Fixture::new();
    let request = Request::builder()
        .uri(format!("/dashboard/jobs/{JOB}/candidates"))
        .body(Body::empty())
        .expect("request");

    let response = fixture.router().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("message").contains("X-Owner-Id"));
}

#[tokio::test]
async fn candidates_route_applies_repeated_skill_filters() {
    let fixture = Fixture::new();
    fixture.seed(1, ApplicationStatus::New, &["Rust"], Some(60.0));
    fixture.seed(2, ApplicationStatus::New, &["Go"], Some(80.0));
    fixture.seed(3, ApplicationStatus::New, &["Java"], Some(90.0));

    let response = fixture
        .router()
        .oneshot(get(&format!(
            "/dashboard/jobs/{JOB}/candidates?skill=rust&skill=GO&min_score=50"
        )))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["owner_id"], OWNER);
    let ids: Vec<&str> = body["candidates"]
        .as_array()
        .expect("candidates")
        .iter()
        .map(|entry| entry["candidate_id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["cand-02", "cand-01"]);
    assert!(body["candidates"][0]["breakdown"]["github_code_quality"].is_object());
}

#[tokio::test]
async fn bad_filters_are_bad_requests() {
    let fixture = Fixture::new();

    for query in ["status=hired", "min_score=abc", "min_score=101"] {
        let response = fixture
            .router()
            .oneshot(get(&format!("/dashboard/jobs/{JOB}/candidates?{query}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {query}");
    }
}

#[tokio::test]
async fn insights_route_wraps_job_insights() {
    let fixture = Fixture::new();
    fixture.seed(1, ApplicationStatus::New, &["Rust"], Some(42.0));
    fixture.seed(2, ApplicationStatus::New, &["Rust"], None);

    let response = fixture
        .router()
        .oneshot(get(&format!("/dashboard/jobs/{JOB}/insights")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let insights = &body["insights"];
    assert_eq!(insights["total_applications"], 2);
    assert_eq!(insights["unscored_applications"], 1);
    assert_eq!(insights["score_distribution"][2]["label"], "40-60");
    assert_eq!(insights["score_distribution"][2]["count"], 1);
    assert_eq!(insights["top_skill_matches"][0]["skill"], "Rust");
}

#[tokio::test]
async fn preview_route_returns_limited_rows() {
    let fixture = Fixture::new();
    let csv = "name,email\nAda,ada@example.com\nGrace,grace@example.com\n";

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::POST,
            &format!("/dashboard/jobs/{JOB}/imports/preview"),
            json!({ "csv": csv, "preview_rows": 1 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["headers"], json!(["name", "email"]));
    assert_eq!(body["rows"].as_array().expect("rows").len(), 1);

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::POST,
            &format!("/dashboard/jobs/{JOB}/imports/preview"),
            json!({ "csv": csv, "preview_rows": 0 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn import_route_queues_and_processes_in_background() {
    let fixture = Fixture::new();
    let csv = "Name,Email,Skills\nAda,ada@example.com,Rust\nBad,nope,Go\n";

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::POST,
            &format!("/dashboard/jobs/{JOB}/imports"),
            json!({ "csv": csv, "mapping": "{\"name\": \"Name\", \"email\": \"Email\", \"skills\": \"Skills\"}" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let queued = read_json_body(response).await;
    assert_eq!(queued["status"], "queued");
    assert_eq!(queued["total_rows"], 2);
    let import_id = queued["import_id"].as_str().expect("import id").to_string();

    let mut finished = Value::Null;
    for _ in 0..50 {
        let response = fixture
            .router()
            .oneshot(get(&format!("/dashboard/jobs/{JOB}/imports/{import_id}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        if body["status"] == "completed" {
            finished = body;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(finished["success_count"], 1);
    assert_eq!(finished["failure_count"], 1);
    assert_eq!(finished["results"][1]["errors"][0], "Invalid email address.");
    let scores = fixture
        .scores
        .list_by_job(Some(&owner()), &job())
        .expect("lists");
    assert_eq!(scores.len(), 1);
}

#[tokio::test]
async fn import_route_rejects_invalid_mapping() {
    let fixture = Fixture::new();

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::POST,
            &format!("/dashboard/jobs/{JOB}/imports"),
            json!({ "csv": "Name\nAda\n", "mapping": { "name": "Name" } }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "Missing required mapping for field: email");
}

#[tokio::test]
async fn unknown_import_is_not_found() {
    let fixture = Fixture::new();

    let response = fixture
        .router()
        .oneshot(get(&format!("/dashboard/jobs/{JOB}/imports/missing")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scoring_config_round_trips_as_percentages() {
    let fixture = Fixture::new();

    let response = fixture
        .router()
        .oneshot(get(&format!("/dashboard/jobs/{JOB}/scoring-config")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let defaults = read_json_body(response).await;
    assert_eq!(defaults["category_weights"]["github_code_quality"], 30.0);
    assert_eq!(defaults["github_required"], false);

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::PUT,
            &format!("/dashboard/jobs/{JOB}/scoring-config"),
            json!({
                "category_weights": {
                    "resume_skills": 50.0,
                    "github_code_quality": 50.0,
                    "project_originality": 0.0,
                    "documentation_quality": 0.0,
                    "engineering_practices": 0.0
                },
                "github_required": true
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let saved = read_json_body(response).await;
    assert_eq!(saved["category_weights"]["resume_skills"], 50.0);

    let stored = fixture.configs.get(&job()).expect("config");
    assert!(stored.github_required);
    assert!((stored.category_weights.resume_skills - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn scoring_config_rejects_zero_weights() {
    let fixture = Fixture::new();

    let response = fixture
        .router()
        .oneshot(json_request(
            Method::PUT,
            &format!("/dashboard/jobs/{JOB}/scoring-config"),
            json!({
                "category_weights": {
                    "resume_skills": 0.0,
                    "github_code_quality": 0.0,
                    "project_originality": 0.0,
                    "documentation_quality": 0.0,
                    "engineering_practices": 0.0
                }
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("message")
        .contains("invalid configuration"));
}
