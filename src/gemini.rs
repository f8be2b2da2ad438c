use anyhow::Context as _;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use crate::models::Recipe;

/// The one seam between the controller and the hosted model, so the state
/// machine can be exercised without network access.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Turns one base64-encoded image into a list of recipes.
    /// Exactly one outbound call per invocation; every failure propagates
    /// unchanged to the caller.
    async fn generate(&self, image_base64: &str, mime: &str) -> anyhow::Result<Vec<Recipe>>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base: String,
    key: String,
    model: String,
    prompt: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(base: String, key: String, model: String, prompt: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            key,
            model,
            prompt,
        }
    }
}

#[async_trait]
impl RecipeSource for GeminiClient {
    async fn generate(&self, image_base64: &str, mime: &str) -> anyhow::Result<Vec<Recipe>> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base.trim_end_matches('/'),
            self.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime.to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                    Part::Text {
                        text: self.prompt.clone(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: recipe_schema(),
            },
        };

        // No timeout on purpose: the call runs to completion or to whatever
        // failure the transport reports.
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Gemini HTTP {status}: {text}");
        }

        recipes_from_envelope(&text)
    }
}

/// Structured-output schema sent with every request: an array of recipe
/// objects, all four fields required per item.
fn recipe_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "recipeName": {
                    "type": "STRING",
                    "description": "The name of the recipe."
                },
                "description": {
                    "type": "STRING",
                    "description": "A brief, appealing description of the dish."
                },
                "ingredients": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "A list of ingredients required for the recipe."
                },
                "instructions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Step-by-step cooking instructions."
                }
            },
            "required": ["recipeName", "description", "ingredients", "instructions"]
        }
    })
}

/// Pulls the text part out of a `generateContent` envelope and parses it
/// strictly as the declared recipe array.
fn recipes_from_envelope(envelope: &str) -> anyhow::Result<Vec<Recipe>> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(envelope).context("malformed generateContent envelope")?;

    if let Some(feedback) = parsed.prompt_feedback
        && let Some(reason) = feedback.block_reason
    {
        anyhow::bail!("prompt blocked by Gemini: {reason}");
    }

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .ok_or_else(|| anyhow::anyhow!("model response missing text part"))?;

    serde_json::from_str(text.trim()).context("model output does not match the recipe schema")
}

/* ---- wire types ---- */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: JsonValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
