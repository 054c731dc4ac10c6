use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::hiring::applications::{
    Actor, ApplicationServiceError, ApplicationStatus, InvalidTransition,
};
use crate::workflows::hiring::screening::DocumentError;

#[tokio::test]
async fn submit_route_creates_application() {
    let harness = build_service();
    let job = post_job(&harness);
    let router = router_for(harness);

    let response = router
        .oneshot(multipart_submission(
            "cand-1",
            &job.id.0,
            "cv.txt",
            "text/plain",
            b"Rust and SQL engineer, 5 years",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"]["outcome"], "admitted");
    assert_eq!(payload["skill_match"], 100);
    assert_eq!(payload["application"]["status"], "applied");
    assert_eq!(payload["application"]["job_id"], json!(job.id.0));
}

#[tokio::test]
async fn submit_route_reports_rejection_with_scores() {
    let harness = build_service();
    let job = post_job(&harness);
    let router = router_for(harness);

    let response = router
        .oneshot(multipart_submission(
            "cand-1",
            &job.id.0,
            "cv.txt",
            "text/plain",
            b"Go developer, 5 years",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["skill_match"], 0);
    assert_eq!(payload["experience_match"], true);
    assert_eq!(payload["decision"]["outcome"], "rejected");
    assert!(payload.get("application").is_none());
}

#[tokio::test]
async fn submit_route_requires_every_field() {
    let harness = build_service();
    let router = router_for(harness);

    let response = router
        .oneshot(multipart_submission(
            "cand-1",
            "",
            "cv.txt",
            "text/plain",
            b"Rust",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "job_id field is required");
}

#[tokio::test]
async fn submit_route_maps_workflow_errors() {
    let harness = build_service();
    let job = post_job(&harness);
    let router = router_for(harness);

    let unknown_job = router
        .clone()
        .oneshot(multipart_submission(
            "cand-1",
            "no-such-job",
            "cv.txt",
            "text/plain",
            b"Rust and SQL, 5 years",
        ))
        .await
        .expect("route executes");
    assert_eq!(unknown_job.status(), StatusCode::NOT_FOUND);

    let unsupported = router
        .clone()
        .oneshot(multipart_submission(
            "cand-1",
            &job.id.0,
            "cv.png",
            "image/png",
            b"\x89PNG",
        ))
        .await
        .expect("route executes");
    assert_eq!(unsupported.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let first = router
        .clone()
        .oneshot(multipart_submission(
            "cand-1",
            &job.id.0,
            "cv.txt",
            "text/plain",
            b"Rust and SQL, 5 years",
        ))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::CREATED);

    let duplicate = router
        .oneshot(multipart_submission(
            "cand-1",
            &job.id.0,
            "cv.txt",
            "text/plain",
            b"Rust and SQL, 5 years",
        ))
        .await
        .expect("route executes");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn status_route_enforces_table_and_actor() {
    let harness = build_service();
    let job = post_job(&harness);
    let application = admit(&harness, &job, "cand-1");
    let router = router_for(harness);
    let uri = format!("/api/v1/applications/{}/status", application.id);

    let skipped = router
        .clone()
        .oneshot(acting_as(
            json_request("PATCH", &uri, &json!({ "status": "selected" })),
            Actor::administrator("admin-1"),
        ))
        .await
        .expect("route executes");
    assert_eq!(skipped.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(skipped).await;
    assert_eq!(payload["current"], "applied");
    assert_eq!(payload["requested"], "selected");

    let stranger = router
        .clone()
        .oneshot(acting_as(
            json_request("PATCH", &uri, &json!({ "status": "interviewing" })),
            Actor::employer("employer-other"),
        ))
        .await
        .expect("route executes");
    assert_eq!(stranger.status(), StatusCode::FORBIDDEN);

    let owner = router
        .oneshot(acting_as(
            json_request("PATCH", &uri, &json!({ "status": "interviewing" })),
            Actor::employer(EMPLOYER),
        ))
        .await
        .expect("route executes");
    assert_eq!(owner.status(), StatusCode::OK);
    let payload = read_json_body(owner).await;
    assert_eq!(payload["application"]["status"], "interviewing");
}

#[tokio::test]
async fn status_route_ignores_identity_claimed_in_the_body() {
    let harness = build_service();
    let job = post_job(&harness);
    let application = admit(&harness, &job, "cand-1");
    let router = router_for(harness);
    let uri = format!("/api/v1/applications/{}/status", application.id);
    let claim = json!({
        "status": "interviewing",
        "actor": { "id": "cand-1", "role": "administrator" },
    });

    let anonymous = router
        .clone()
        .oneshot(json_request("PATCH", &uri, &claim))
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let candidate = router
        .clone()
        .oneshot(acting_as(
            json_request("PATCH", &uri, &claim),
            Actor::candidate("cand-1"),
        ))
        .await
        .expect("route executes");
    assert_eq!(candidate.status(), StatusCode::FORBIDDEN);

    let unchanged = router
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/applications/{}", application.id),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(unchanged).await;
    assert_eq!(payload["status"], "applied");
}

#[tokio::test]
async fn job_routes_register_list_and_cascade() {
    let harness = build_service();
    let job = post_job(&harness);
    admit(&harness, &job, "cand-1");
    admit(&harness, &job, "cand-2");
    let router = router_for(harness);

    let created = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/jobs",
            &json!({
                "title": "Platform Engineer",
                "job_type": "internship",
                "required_skills": ["go", " ", "linux"],
                "required_experience_months": 6,
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload["status"], "open");
    assert_eq!(payload["required_skills"], json!(["go", "linux"]));

    let listed = router
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/applications?job_id={}", job.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(listed)
            .await
            .as_array()
            .map(Vec::len),
        Some(2)
    );

    let stats = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/jobs/stats"))
        .await
        .expect("route executes");
    let payload = read_json_body(stats).await;
    assert_eq!(payload[0]["job_id"], json!(job.id.0));
    assert_eq!(payload[0]["application_count"], 2);

    let deleted = router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/jobs/{}", job.id)))
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::OK);
    let payload = read_json_body(deleted).await;
    assert_eq!(payload["deleted_applications"], 2);

    let counts = router
        .oneshot(empty_request("GET", "/api/v1/applications/stats"))
        .await
        .expect("route executes");
    let payload = read_json_body(counts).await;
    assert_eq!(payload["total"], 0);
}

#[tokio::test]
async fn candidate_route_lists_own_applications() {
    let harness = build_service();
    let job = post_job(&harness);
    admit(&harness, &job, "cand-1");
    admit(&harness, &job, "cand-2");
    let router = router_for(harness);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/candidates/cand-2/applications"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
    assert_eq!(payload[0]["candidate_id"], "cand-2");
}

#[test]
fn error_status_codes_cover_document_and_transition_failures() {
    let too_large = ApplicationServiceError::Document(DocumentError::TooLarge {
        size: 10,
        limit: 5,
    });
    assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    let invalid = ApplicationServiceError::InvalidTransition(InvalidTransition {
        current: ApplicationStatus::Rejected,
        requested: ApplicationStatus::Interviewing,
    });
    assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
