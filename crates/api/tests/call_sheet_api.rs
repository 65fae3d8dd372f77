//! HTTP-level integration tests for call sheet assembly and the list of
//! shoot days still waiting for a call sheet.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, build_test_app, post_json};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_project(app: &Router) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/projects",
        json!({
            "name": "Night Harbour",
            "script_breakdown": { "scenes": [
                { "scene_number": "1", "int_ext": "EXT", "characters": ["MAYA"], "estimated_shooting_time": 1.0 },
                { "scene_number": "2", "int_ext": "INT", "characters": ["JONAS"] }
            ] }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_day(app: &Router, project_id: i64, body: Value) -> i64 {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shoot-days"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn crew() -> Value {
    json!([
        { "id": 1, "full_name": "Ana Ruiz", "primary_role": "Gaffer", "dietary_restrictions": ["Vegan"] },
        { "id": 2, "full_name": "Ben Okafor", "primary_role": "Grip", "phone": "555-0102", "dietary_restrictions": ["Vegan", "Halal"] },
        { "id": 3, "full_name": "Cleo Park", "primary_role": "Focus Puller" }
    ])
}

// ---------------------------------------------------------------------------
// Test: Call sheet groups the day's crew and summarises catering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_assemble_call_sheet() {
    let app = build_test_app();
    let project_id = create_project(&app).await;
    let day_id = create_day(
        &app,
        project_id,
        json!({
            "shoot_date": "2024-05-01",
            "general_call_time": "06:00",
            "location_name": "Harbour",
            "scenes_scheduled": ["2", "1"]
        }),
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/shoot-days/{day_id}/call-sheet"),
        json!({
            "crew": crew(),
            "assignments": [
                { "crew_member_id": 1, "department": "Lighting", "call_time": "05:30", "assigned_dates": ["2024-05-01"] },
                { "crew_member_id": 2, "status": "confirmed" },
                { "crew_member_id": 3, "department": "Camera", "assigned_dates": ["2024-05-02"] }
            ],
            "existing_call_sheet_dates": ["2024-04-30"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["shoot_day_id"], day_id);
    assert_eq!(data["day_number"], 2);
    assert_eq!(data["location_name"], "Harbour");

    let order: Vec<&str> = data["schedule"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["scene_number"].as_str().unwrap())
        .collect();
    assert_eq!(order, ["1", "2"]);
    assert_eq!(data["schedule"]["entries"][1]["start_time"], "07:00");

    let departments = data["departments"].as_array().unwrap();
    assert_eq!(departments.len(), 2);
    assert_eq!(departments[0]["department"], "Lighting");
    assert_eq!(departments[0]["members"][0]["call_time"], "05:30");
    assert_eq!(departments[1]["department"], "Other");
    assert_eq!(departments[1]["members"][0]["call_time"], "06:00");
    assert_eq!(departments[1]["members"][0]["role"], "Grip");

    assert_eq!(data["catering"]["dietary_notes"], "2x Vegan, 1x Halal");
    assert_eq!(data["catering"]["breakfast_time"], "06:30");
    assert_eq!(
        data["admin_warnings"],
        json!(["2 crew need Vegan meals", "1 crew need Halal meals"])
    );
}

// ---------------------------------------------------------------------------
// Test: Call sheet input is validated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_call_sheet_rejects_bad_input() {
    let app = build_test_app();
    let project_id = create_project(&app).await;
    let day_id = create_day(&app, project_id, json!({ "shoot_date": "2024-05-01" })).await;
    let uri = format!("/api/v1/shoot-days/{day_id}/call-sheet");

    let response = post_json(
        app.clone(),
        &uri,
        json!({ "crew": crew(), "existing_call_sheet_dates": ["2024-05-01"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        app.clone(),
        &uri,
        json!({ "crew": crew(), "assignments": [{ "crew_member_id": 1, "call_time": "dawn" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(app, "/api/v1/shoot-days/404/call-sheet", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Pending list skips days that already have a call sheet
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_days_pending_call_sheet() {
    let app = build_test_app();
    let project_id = create_project(&app).await;
    create_day(&app, project_id, json!({ "shoot_date": "2024-05-01" })).await;
    let second = create_day(&app, project_id, json!({ "shoot_date": "2024-05-02" })).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/call-sheets/pending"),
        json!({ "existing_call_sheet_dates": ["2024-05-01"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    let ids: Vec<i64> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [second]);

    let response = post_json(app, "/api/v1/projects/404/call-sheets/pending", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
