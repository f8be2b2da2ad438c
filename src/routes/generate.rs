use axum::{Json, extract::State};

use crate::controller::run_generation;
use crate::models::AppState;
use crate::routes::session::SessionView;

/// Run one generation cycle and report the resulting session view.
///
/// Always responds 200: every generation-time failure is folded into the
/// `error` status with a fixed message, never surfaced as a 5xx or in raw
/// form. A trigger while a cycle is in flight is a no-op and reports
/// `loading`.
pub async fn generate(State(state): State<AppState>) -> Json<SessionView> {
    let snapshot = run_generation(state.controller.clone(), state.source.clone()).await;
    let image_selected = state.controller.read().await.image_selected();
    Json(SessionView::from_parts(image_selected, &snapshot))
}
