//! Download paths: the raw backing files unmodified, plus a merged
//! projection of the daily table with the effective cycle length appended.

use std::io::ErrorKind;
use std::path::PathBuf;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use super::AppState;
use crate::cycle;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/export/daily", get(export_daily))
        .route("/export/period", get(export_period))
        .route("/export/merged", get(export_merged))
        .with_state(state)
}

async fn export_daily(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let path = state.store.lock().await.daily_path();
    csv_attachment(path, "daily_log.csv", "No daily entries recorded yet.").await
}

async fn export_period(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let path = state.store.lock().await.period_path();
    csv_attachment(path, "period_log.csv", "No period data available yet.").await
}

/// Daily table with an `AvgCycleLength` column appended to every row: the
/// latest override when present, otherwise the computed estimate. Rows are
/// re-encoded record by record so quoted multi-line notes stay intact.
async fn export_merged(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let store = state.store.lock().await;
    let cycle_length = cycle::effective_cycle_length(&store.load_periods());
    let path = store.daily_path();
    drop(store);

    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
    {
        Ok(r) => r,
        Err(_) => {
            return Err((
                StatusCode::NOT_FOUND,
                "No daily entries recorded yet.".into(),
            ))
        }
    };

    let length_cell = cycle_length.to_string();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for (i, record) in reader.records().enumerate() {
        let mut record =
            record.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        record.push_field(if i == 0 { "AvgCycleLength" } else { &length_cell });
        writer
            .write_record(&record)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }
    let buf = writer
        .into_inner()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(attachment_response("daily_log_merged.csv", buf))
}

async fn csv_attachment(
    path: PathBuf,
    filename: &str,
    empty_msg: &str,
) -> Result<Response, (StatusCode, String)> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(attachment_response(filename, bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err((StatusCode::NOT_FOUND, empty_msg.into()))
        }
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

fn attachment_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
