use axum::body::Body;
use axum::http::{Request, StatusCode};
use hoops_tracker::api::{self, AppState};
use hoops_tracker::db::init_db;
use hoops_tracker::Repository;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    (api::create_router(AppState::new(repo)), temp_dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_player(app: &axum::Router, email: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/Player",
            json!({ "email": email, "firstName": "Rin", "lastName": "Ota", "position": "F" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_exercise(app: &axum::Router, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/Exercise",
            json!({ "name": name, "category": "Legs" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

fn workout_body(player_id: i64, exercise_id: i64, date: &str) -> Value {
    json!({
        "playerId": player_id,
        "date": date,
        "notes": "heavy day",
        "sets": [
            { "exerciseId": exercise_id, "setNumber": 2, "reps": 5, "weight": 235.5 },
            { "exerciseId": exercise_id, "setNumber": 1, "reps": 5, "weight": 225 }
        ]
    })
}

#[tokio::test]
async fn test_create_workout_orders_sets_and_embeds_exercise() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "rin@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/Workout",
            workout_body(player_id, exercise_id, "2025-03-01T15:00:00Z"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(location, format!("/api/Workout/{}", json["id"]));
    assert_eq!(json["sets"][0]["setNumber"], 1);
    assert_eq!(json["sets"][1]["weight"].as_f64(), Some(235.5));
    assert_eq!(json["sets"][0]["exercise"]["name"], "Squat");

    let response = app
        .oneshot(empty_request("GET", &location))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["notes"], "heavy day");
}

#[tokio::test]
async fn test_zero_set_workout_is_rejected() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "rin@tide.edu").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/Workout",
            json!({ "playerId": player_id, "date": "2025-03-01T15:00:00Z", "sets": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["errors"],
        json!(["Sets must contain at least one set"])
    );
}

#[tokio::test]
async fn test_workout_missing_date_is_400_json() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "nodate@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    let mut body = workout_body(player_id, exercise_id, "2025-03-01T15:00:00Z");
    body.as_object_mut().unwrap().remove("date");
    let response = app
        .oneshot(json_request("POST", "/api/Workout", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Validation failed");
    assert!(json["errors"][0].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_oversized_set_weight_is_rejected() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "heavy@tide.edu").await;
    let exercise_id = create_exercise(&app, "Deadlift").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/Workout",
            json!({
                "playerId": player_id,
                "date": "2025-03-01T15:00:00Z",
                "sets": [{ "exerciseId": exercise_id, "setNumber": 1, "reps": 5, "weight": 1e12 }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["errors"],
        json!(["Sets[0].Weight must be at most 99999999.99"])
    );
}

#[tokio::test]
async fn test_invalid_sets_list_every_violation() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "rin@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/Workout",
            json!({
                "playerId": player_id,
                "date": "2025-03-01T15:00:00Z",
                "sets": [{ "exerciseId": exercise_id, "setNumber": 0, "reps": 0, "weight": -1 }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let errors = body_json(response).await["errors"].clone();
    assert_eq!(errors.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_player_or_exercise_is_400() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "rin@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/Workout",
            workout_body(player_id + 100, exercise_id, "2025-03-01T15:00:00Z"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/Workout",
            workout_body(player_id, exercise_id + 100, "2025-03-01T15:00:00Z"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filter_by_player_and_date_range() {
    let (app, _temp) = setup_test_app().await;
    let a = create_player(&app, "a@tide.edu").await;
    let b = create_player(&app, "b@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    for (player, date) in [
        (a, "2025-03-01T08:00:00Z"),
        (a, "2025-03-05T23:30:00Z"),
        (a, "2025-03-09T10:00:00Z"),
        (b, "2025-03-05T12:00:00Z"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/Workout", workout_body(player, exercise_id, date)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/Workout"))
        .await
        .unwrap();
    let all = body_json(response).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
    assert_eq!(all[0]["date"], "2025-03-09T10:00:00Z");

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/api/Workout?playerId={}&startDate=2025-03-02&endDate=2025-03-05", a),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let filtered = body_json(response).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["playerId"], a);

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/Workout?startDate=2025-03-09&endDate=2025-03-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_player_cascades_to_workouts() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "rin@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    let created = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/Workout",
                workout_body(player_id, exercise_id, "2025-03-01T15:00:00Z"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let workout_id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/Player/{}", player_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/Workout/{}", workout_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // With its sets gone the exercise is free to delete.
    let response = app
        .oneshot(empty_request("DELETE", &format!("/api/Exercise/{}", exercise_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_workout() {
    let (app, _temp) = setup_test_app().await;
    let player_id = create_player(&app, "rin@tide.edu").await;
    let exercise_id = create_exercise(&app, "Squat").await;

    let created = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/Workout",
                workout_body(player_id, exercise_id, "2025-03-01T15:00:00Z"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let uri = format!("/api/Workout/{}", created["id"]);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
