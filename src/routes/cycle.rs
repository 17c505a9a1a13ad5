use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{store_error, today, AppState};
use crate::cycle;
use crate::models::{CycleState, PeriodStart};

#[derive(Deserialize)]
pub struct NewPeriod {
    /// Defaults to today: "log that period started today" and a manual
    /// backdate are the same operation.
    pub date: Option<NaiveDate>,
    pub avg_cycle_length: Option<u32>,
}

#[derive(Deserialize)]
pub struct DeletePeriodRequest {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct CycleSummary {
    #[serde(flatten)]
    pub state: CycleState,
    pub suggested_activity: &'static str,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/period",
            get(period_history).post(log_period).delete(delete_period),
        )
        .route("/cycle", get(cycle_summary))
        .with_state(state)
}

async fn log_period(
    State(state): State<AppState>,
    Json(body): Json<NewPeriod>,
) -> Result<StatusCode, (StatusCode, String)> {
    if let Some(len) = body.avg_cycle_length {
        if !(cycle::MIN_CYCLE_LENGTH..=cycle::MAX_CYCLE_LENGTH).contains(&len) {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "avg_cycle_length must be between {} and {} days",
                    cycle::MIN_CYCLE_LENGTH,
                    cycle::MAX_CYCLE_LENGTH
                ),
            ));
        }
    }
    let date = body.date.unwrap_or_else(today);

    let store = state.store.lock().await;
    store
        .insert_period(PeriodStart {
            date,
            avg_cycle_length: body.avg_cycle_length,
        })
        .map_err(store_error)?;
    tracing::info!("📍 logged period start on {date}");
    Ok(StatusCode::CREATED)
}

/// Period history, newest first, the way the log is rendered for per-row
/// deletion.
async fn period_history(State(state): State<AppState>) -> Json<Vec<PeriodStart>> {
    let store = state.store.lock().await;
    let mut periods = store.load_periods();
    periods.sort_by_key(|p| std::cmp::Reverse(p.date));
    Json(periods)
}

async fn delete_period(
    State(state): State<AppState>,
    Json(body): Json<DeletePeriodRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let store = state.store.lock().await;
    if store.delete_period(body.date).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("No period logged for {}", body.date),
        ))
    }
}

async fn cycle_summary(State(state): State<AppState>) -> Json<CycleSummary> {
    let store = state.store.lock().await;
    let periods = store.load_periods();
    drop(store);

    let cycle_state = cycle::current_state(today(), &periods);
    Json(CycleSummary {
        suggested_activity: cycle::suggest_activity(cycle_state.phase),
        state: cycle_state,
    })
}
