use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new().route("/login", post(login)).with_state(state)
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.session.login(&body.password) {
        tracing::info!("🔓 session unlocked");
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("🔐 failed login attempt");
        Err((StatusCode::UNAUTHORIZED, "Incorrect password".into()))
    }
}

pub async fn require_login(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    if state.session.is_authenticated() {
        Ok(next.run(req).await)
    } else {
        Err((StatusCode::UNAUTHORIZED, "Enter the password first".into()))
    }
}
