use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Router};
use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use crate::session::SessionGate;
use crate::store::{RecordStore, StoreError};

pub mod auth;
pub mod cycle;
pub mod entries;
pub mod export;

#[derive(Clone)]
pub struct AppState {
    /// The store behind a mutex: one writer at a time, as the backing files
    /// assume. Multi-process writers race at the file level and are an
    /// accepted limitation for a single-user journal.
    pub store: Arc<Mutex<RecordStore>>,
    pub session: Arc<SessionGate>,
}

impl AppState {
    pub fn new(store: RecordStore, session: SessionGate) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            session: Arc::new(session),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(entries::routes(state.clone()))
        .merge(cycle::routes(state.clone()))
        .merge(export::routes(state.clone()))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_login,
        ));

    Router::new()
        .merge(protected)
        .merge(auth::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::AlreadyLogged(_) | StoreError::SchemaDrift { .. } => {
            (StatusCode::CONFLICT, e.to_string())
        }
        _ => {
            tracing::error!("❌ store error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
