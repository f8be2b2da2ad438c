use std::sync::Arc;
use tokio::sync::RwLock;

use crate::encoding;
use crate::gemini::RecipeSource;
use crate::models::{Recipe, SelectedImage};

/// Shown when generation is triggered with no image selected.
pub const MISSING_IMAGE_MSG: &str = "Please select an image first.";

/// Shown for every generation-time failure; the underlying error is logged,
/// never surfaced verbatim.
pub const GENERATION_FAILED_MSG: &str = "Failed to generate recipes. \
    The model may be unavailable or the image could not be processed. \
    Please try again.";

/// Exactly one of these holds at a time. `Loading` carries no prior
/// results or error, so a stale mix is unrepresentable.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GenerationState {
    #[default]
    Idle,
    Loading,
    Success(Vec<Recipe>),
    Error(String),
}

/// Owns the selected image and the generation state for the single
/// page-session this server backs.
#[derive(Default)]
pub struct Controller {
    selected: Option<SelectedImage>,
    state: GenerationState,
}

enum Begin {
    AlreadyLoading,
    MissingImage,
    Started(SelectedImage),
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new image, replacing any previous one. Deliberately leaves
    /// the generation state untouched: a prior success or error stays
    /// visible until the user regenerates.
    pub fn select_image(&mut self, image: SelectedImage) {
        self.selected = Some(image);
    }

    /// Clears the selection. A following generation attempt behaves as the
    /// missing-input case.
    pub fn clear_image(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub const fn image_selected(&self) -> bool {
        self.selected.is_some()
    }

    #[must_use]
    pub const fn state(&self) -> &GenerationState {
        &self.state
    }

    fn begin_generation(&mut self) -> Begin {
        if self.state == GenerationState::Loading {
            return Begin::AlreadyLoading;
        }
        let Some(image) = self.selected.clone() else {
            self.state = GenerationState::Error(MISSING_IMAGE_MSG.to_string());
            return Begin::MissingImage;
        };
        // Entering Loading drops any prior results or error.
        self.state = GenerationState::Loading;
        Begin::Started(image)
    }
}

/// Runs one full generation cycle: encode, call the model, fold the outcome
/// back into the controller. Returns a snapshot of the resulting state.
///
/// Re-entrant calls while a cycle is in flight are a no-op (the state stays
/// `Loading`); no queue, no cancellation.
pub async fn run_generation(
    controller: Arc<RwLock<Controller>>,
    source: Arc<dyn RecipeSource>,
) -> GenerationState {
    let begin = controller.write().await.begin_generation();
    let image = match begin {
        Begin::AlreadyLoading | Begin::MissingImage => {
            return controller.read().await.state.clone();
        }
        Begin::Started(image) => image,
    };

    // Stage one: encode. Stage two: the single model call. Sequential by
    // construction; the second consumes the first's output.
    let payload = encoding::to_base64(&image.bytes);
    let result = source.generate(&payload, &image.mime).await;

    let mut ctrl = controller.write().await;
    match result {
        Ok(recipes) => {
            tracing::info!(count = recipes.len(), "recipes generated");
            ctrl.state = GenerationState::Success(recipes);
        }
        Err(err) => {
            tracing::error!("recipe generation failed: {err:#}");
            ctrl.state = GenerationState::Error(GENERATION_FAILED_MSG.to_string());
        }
    }
    ctrl.state.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn image() -> SelectedImage {
        SelectedImage {
            bytes: vec![1, 2, 3],
            mime: "image/png".into(),
        }
    }

    fn recipes() -> Vec<Recipe> {
        ["Carrot Soup", "Fried Rice", "Green Curry"]
            .into_iter()
            .map(|name| Recipe {
                recipe_name: name.to_string(),
                description: format!("{name}, quickly"),
                ingredients: vec!["carrot".into(), "rice".into()],
                instructions: vec!["chop".into(), "cook".into()],
            })
            .collect()
    }

    struct FixedSource {
        calls: AtomicUsize,
        result: Result<Vec<Recipe>, String>,
    }

    #[async_trait]
    impl RecipeSource for FixedSource {
        async fn generate(&self, _image_base64: &str, _mime: &str) -> anyhow::Result<Vec<Recipe>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(|msg| anyhow::anyhow!("{msg}"))
        }
    }

    /// Blocks inside `generate` until released, so tests can observe the
    /// `Loading` state from outside.
    struct GatedSource {
        started: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecipeSource for GatedSource {
        async fn generate(&self, _image_base64: &str, _mime: &str) -> anyhow::Result<Vec<Recipe>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(recipes())
        }
    }

    fn controller_with_image() -> Arc<RwLock<Controller>> {
        let mut ctrl = Controller::new();
        ctrl.select_image(image());
        Arc::new(RwLock::new(ctrl))
    }

    #[tokio::test]
    async fn generate_without_image_sets_validation_error_and_skips_call() {
        let ctrl = Arc::new(RwLock::new(Controller::new()));
        let source = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            result: Ok(recipes()),
        });

        let state = run_generation(ctrl, source.clone() as Arc<dyn RecipeSource>).await;
        assert_eq!(state, GenerationState::Error(MISSING_IMAGE_MSG.to_string()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_generation_holds_records_in_received_order() {
        let ctrl = controller_with_image();
        let source: Arc<dyn RecipeSource> = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            result: Ok(recipes()),
        });

        let state = run_generation(ctrl.clone(), source).await;
        let GenerationState::Success(got) = state else {
            panic!("expected success, got {:?}", ctrl.read().await.state());
        };
        assert_eq!(got, recipes());
    }

    #[tokio::test]
    async fn failed_generation_yields_fixed_message() {
        let ctrl = controller_with_image();
        let source: Arc<dyn RecipeSource> = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            result: Err("HTTP 503 from upstream".into()),
        });

        let state = run_generation(ctrl, source).await;
        assert_eq!(
            state,
            GenerationState::Error(GENERATION_FAILED_MSG.to_string())
        );
    }

    #[tokio::test]
    async fn generate_while_loading_is_a_noop() {
        let ctrl = controller_with_image();
        let source = Arc::new(GatedSource {
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });

        let first = tokio::spawn(run_generation(
            ctrl.clone(),
            source.clone() as Arc<dyn RecipeSource>,
        ));
        source.started.notified().await;
        assert_eq!(*ctrl.read().await.state(), GenerationState::Loading);

        // Second trigger while in flight: state stays Loading, no extra call.
        let state = run_generation(ctrl.clone(), source.clone() as Arc<dyn RecipeSource>).await;
        assert_eq!(state, GenerationState::Loading);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        source.release.notify_one();
        let finished = first.await.unwrap();
        assert!(matches!(finished, GenerationState::Success(_)));
    }

    #[tokio::test]
    async fn selecting_a_new_image_leaves_stale_state_visible() {
        let ctrl = controller_with_image();
        let source: Arc<dyn RecipeSource> = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            result: Ok(recipes()),
        });
        run_generation(ctrl.clone(), source).await;

        let mut guard = ctrl.write().await;
        guard.select_image(image());
        assert!(matches!(guard.state(), GenerationState::Success(_)));
    }

    #[tokio::test]
    async fn cleared_image_behaves_as_missing_input() {
        let ctrl = controller_with_image();
        ctrl.write().await.clear_image();
        assert!(!ctrl.read().await.image_selected());

        let source: Arc<dyn RecipeSource> = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            result: Ok(recipes()),
        });
        let state = run_generation(ctrl, source).await;
        assert_eq!(state, GenerationState::Error(MISSING_IMAGE_MSG.to_string()));
    }
}
