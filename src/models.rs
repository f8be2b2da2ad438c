use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{config::Config, controller::Controller, gemini::RecipeSource};

/* ---------- App state ---------- */

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RwLock<Controller>>,
    pub source: Arc<dyn RecipeSource>,
    pub config: Config,
}

/* ---------- API models ---------- */

/// One generated recipe, exactly as the model returned it.
/// Immutable once parsed; replaced wholesale on the next generation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipe_name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// The currently selected image: raw bytes plus the declared MIME type.
#[derive(Clone, Debug)]
pub struct SelectedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Response body for a successful image upload.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub preview: String,
    pub mime_type: String,
    pub size: usize,
}
