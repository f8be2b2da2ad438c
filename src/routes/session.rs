use axum::{Json, extract::State};
use serde::Serialize;

use crate::controller::{Controller, GenerationState};
use crate::models::{AppState, Recipe};

/// What the page sees: the current state tag, its payload if any, and
/// whether an image is selected (drives the Generate button).
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes: Option<Vec<Recipe>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub image_selected: bool,
}

impl SessionView {
    #[must_use]
    pub fn from_parts(image_selected: bool, state: &GenerationState) -> Self {
        let (status, recipes, error) = match state {
            GenerationState::Idle => ("idle", None, None),
            GenerationState::Loading => ("loading", None, None),
            GenerationState::Success(recipes) => ("success", Some(recipes.clone()), None),
            GenerationState::Error(msg) => ("error", None, Some(msg.clone())),
        };
        Self {
            status,
            recipes,
            error,
            image_selected,
        }
    }

    #[must_use]
    pub fn of(controller: &Controller) -> Self {
        Self::from_parts(controller.image_selected(), controller.state())
    }
}

pub async fn get(State(state): State<AppState>) -> Json<SessionView> {
    let ctrl = state.controller.read().await;
    Json(SessionView::of(&ctrl))
}
