use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use cyclesense_backend::routes::{router, AppState};
use cyclesense_backend::session::SessionGate;
use cyclesense_backend::store::RecordStore;

const PASSWORD: &str = "sesame";

fn app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path()).unwrap();
    let state = AppState::new(store, SessionGate::new(PASSWORD));
    (router(state), dir)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let response = request(app, method, uri, body).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router) {
    let (status, _) = send(app, "POST", "/login", Some(json!({ "password": PASSWORD }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

fn entry_body(date: &str, slot: Option<&str>, mood: u8) -> Value {
    let mut body = json!({
        "date": date,
        "sleep": 7,
        "tiredness": 4,
        "mood": mood,
        "self_worth": 6,
        "energy": 5,
        "stress": 3,
        "anxiety": 2,
        "pain": 1,
        "water": 10,
        "coffee": 2,
        "medication": true,
        "exercised": true,
        "exercise_type": "Walking",
        "exercise_duration": 30,
        "exercise_intensity": 2,
        "weather": "Sunny",
        "temp_feel": "Comfortable",
        "sleep_env": "Dark,Quiet",
        "notes": "steady day"
    });
    if let Some(slot) = slot {
        body["entry_slot"] = json!(slot);
    }
    body
}

#[tokio::test]
async fn everything_is_gated_until_login() {
    let (app, _dir) = app();

    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    for (method, uri) in [
        ("GET", "/cycle"),
        ("GET", "/entries"),
        ("GET", "/period"),
        ("GET", "/export/daily"),
    ] {
        let (status, _) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let (status, bytes) = send(
        &app,
        "POST",
        "/login",
        Some(json!({ "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(String::from_utf8(bytes).unwrap(), "Incorrect password");

    let (status, _) = send(&app, "GET", "/cycle", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app).await;
    let (status, summary) = send_json(&app, "GET", "/cycle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["days_since"], 0);
    assert_eq!(summary["cycle_length"], 28);
    assert_eq!(summary["phase"], "Menstruation");
    assert_eq!(
        summary["suggested_activity"],
        "Restorative yoga, light stretching, or rest."
    );
}

#[tokio::test]
async fn period_log_is_deduplicated_and_served_newest_first() {
    let (app, _dir) = app();
    login(&app).await;

    let (status, _) = send(&app, "POST", "/period", Some(json!({ "date": "2024-01-01" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, bytes) = send(&app, "POST", "/period", Some(json!({ "date": "2024-01-01" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(String::from_utf8(bytes).unwrap().contains("already logged"));

    let (status, _) = send(&app, "POST", "/period", Some(json!({ "date": "2024-01-29" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, history) = send_json(&app, "GET", "/period", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["date"], "2024-01-29");
    assert_eq!(history[1]["date"], "2024-01-01");

    let (status, summary) = send_json(&app, "GET", "/cycle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["cycle_length"], 28);
    assert_eq!(summary["last_period"], "2024-01-29");
}

#[tokio::test]
async fn period_can_be_deleted_once() {
    let (app, _dir) = app();
    login(&app).await;

    send(&app, "POST", "/period", Some(json!({ "date": "2024-01-01" }))).await;

    let (status, _) = send(&app, "DELETE", "/period", Some(json!({ "date": "2024-01-01" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", "/period", Some(json!({ "date": "2024-01-01" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cycle_length_override_applies_from_the_latest_record() {
    let (app, _dir) = app();
    login(&app).await;

    send(&app, "POST", "/period", Some(json!({ "date": "2024-01-01" }))).await;
    send(
        &app,
        "POST",
        "/period",
        Some(json!({ "date": "2024-01-29", "avg_cycle_length": 30 })),
    )
    .await;

    let (status, summary) = send_json(&app, "GET", "/cycle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["cycle_length"], 30);

    let (status, bytes) = send(
        &app,
        "POST",
        "/period",
        Some(json!({ "date": "2024-02-26", "avg_cycle_length": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8(bytes).unwrap().contains("between 20 and 40"));
}

#[tokio::test]
async fn saving_an_entry_stamps_the_phase_and_replaces_on_resave() {
    let (app, _dir) = app();
    login(&app).await;

    // No period history: day zero, Menstruation.
    let (status, saved) = send_json(
        &app,
        "POST",
        "/entry",
        Some(entry_body("2024-03-01", Some("Morning"), 3)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["replaced"], false);
    assert_eq!(saved["cycle_phase"], "Menstruation");

    let (status, saved) = send_json(
        &app,
        "POST",
        "/entry",
        Some(entry_body("2024-03-01", Some("Morning"), 9)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["replaced"], true);

    let (status, entries) = send_json(&app, "GET", "/entries", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["mood"], 9);
    assert_eq!(entries[0]["entry_slot"], "Morning");
    assert_eq!(entries[0]["cycle_phase"], "Menstruation");

    // A different slot on the same date is its own record.
    let (status, _) = send_json(
        &app,
        "POST",
        "/entry",
        Some(entry_body("2024-03-01", Some("Evening"), 5)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, entries) = send_json(&app, "GET", "/entries", None).await;
    assert_eq!(entries.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn entry_can_be_deleted_by_identity() {
    let (app, _dir) = app();
    login(&app).await;

    send(
        &app,
        "POST",
        "/entry",
        Some(entry_body("2024-03-01", Some("Morning"), 3)),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        "/entry",
        Some(json!({ "date": "2024-03-01", "entry_slot": "Evening" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        "/entry",
        Some(json!({ "date": "2024-03-01", "entry_slot": "Morning" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn out_of_range_fields_are_rejected() {
    let (app, _dir) = app();
    login(&app).await;

    let mut body = entry_body("2024-03-01", None, 5);
    body["sleep"] = json!(13);
    let (status, bytes) = send(&app, "POST", "/entry", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8(bytes).unwrap().contains("Sleep"));

    let (_, entries) = send_json(&app, "GET", "/entries", None).await;
    assert_eq!(entries.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn exports_serve_the_backing_files() {
    let (app, _dir) = app();
    login(&app).await;

    for uri in ["/export/daily", "/export/period", "/export/merged"] {
        let (status, _) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    send(&app, "POST", "/period", Some(json!({ "date": "2024-01-01" }))).await;
    send(
        &app,
        "POST",
        "/entry",
        Some(entry_body("2024-03-01", Some("Morning"), 5)),
    )
    .await;

    let response = request(&app, "GET", "/export/daily", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("daily_log.csv"));
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("Date,EntrySlot,Sleep"));
    assert!(text.lines().nth(1).unwrap().starts_with("2024-03-01,Morning"));

    let (status, bytes) = send(&app, "GET", "/export/merged", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().ends_with(",CyclePhase,AvgCycleLength"));
    assert!(lines.next().unwrap().ends_with(",28"));

    let (status, bytes) = send(&app, "GET", "/export/period", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Date,AvgCycleLength"));
    assert!(text.contains("2024-01-01"));
}
