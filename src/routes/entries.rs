use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{store_error, today, AppState};
use crate::cycle;
use crate::entry::{self, EntryDraft};
use crate::models::{CyclePhase, DailyEntry, EntrySlot};
use crate::store::UpsertOutcome;

#[derive(Deserialize)]
pub struct DeleteEntryRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub entry_slot: Option<EntrySlot>,
}

#[derive(Serialize)]
pub struct SavedEntry {
    pub cycle_phase: CyclePhase,
    pub replaced: bool,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/entry", post(save_entry).delete(delete_entry))
        .route("/entries", get(list_entries))
        .with_state(state)
}

async fn save_entry(
    State(state): State<AppState>,
    Json(draft): Json<EntryDraft>,
) -> Result<(StatusCode, Json<SavedEntry>), (StatusCode, String)> {
    let store = state.store.lock().await;

    // Stamp the phase the cycle is in right now; the stored value is an
    // audit of save time, never recomputed.
    let periods = store.load_periods();
    let phase = cycle::current_state(today(), &periods).phase;

    let entry = entry::assemble(draft, phase)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let date = entry.date;
    let outcome = store.upsert_entry(entry).map_err(store_error)?;

    let replaced = outcome == UpsertOutcome::Replaced;
    if replaced {
        tracing::info!("✏️ overwrote the existing entry for {date}");
    } else {
        tracing::info!("📝 saved entry for {date}");
    }
    let status = if replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(SavedEntry {
            cycle_phase: phase,
            replaced,
        }),
    ))
}

async fn list_entries(State(state): State<AppState>) -> Json<Vec<DailyEntry>> {
    let store = state.store.lock().await;
    Json(store.load_entries())
}

async fn delete_entry(
    State(state): State<AppState>,
    Json(body): Json<DeleteEntryRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let store = state.store.lock().await;
    if store
        .delete_entry(body.date, body.entry_slot)
        .map_err(store_error)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("No entry found for {}", body.date),
        ))
    }
}
