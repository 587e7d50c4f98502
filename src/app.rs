use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/report", get(handlers::get_report))
        .route("/api/report/export", get(handlers::export_report))
        .route("/api/quick-period/:kind", get(handlers::get_quick_period))
        .route("/api/overview", get(handlers::get_overview))
        .route("/api/trainers/deactivate", post(handlers::deactivate))
        .with_state(state)
}
