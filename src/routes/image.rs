use axum::{Json, extract::Multipart, extract::State, http::StatusCode};

use crate::encoding;
use crate::error::AppResult;
use crate::models::{AppState, SelectedImage, UploadedImage};
use crate::routes::session::SessionView;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024; // 10 MB

/// Record the uploaded photo as the session's selected image, replacing any
/// previous one. Prior results or errors stay on display until the user
/// regenerates.
///
/// Accepts either a binary `image` field or a `dataUrl` field carrying a
/// `data:<mime>;base64,` string. MIME comes from the declared content type
/// (or the data-URL prefix); validation of the actual content is deferred
/// to the model. The drop-target filter for non-image files lives in the
/// page.
///
/// # Errors
///
/// Returns an error if the multipart payload cannot be parsed, carries
/// neither field, or exceeds the size cap.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadedImage>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("multipart error: {e}")))?
    {
        let (mime, bytes) = match field.name() {
            Some("image") => {
                let mime = field
                    .content_type()
                    .map_or_else(|| "image/jpeg".to_string(), ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("read error: {e}")))?;
                (mime, bytes.to_vec())
            }
            Some("dataUrl") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("read error: {e}")))?;
                encoding::from_data_url(&text)
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("bad data URL: {e}")))?
            }
            _ => continue,
        };

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("image exceeds {} MB limit", MAX_IMAGE_BYTES / 1024 / 1024),
            )
                .into());
        }

        let image = SelectedImage {
            bytes,
            mime: mime.clone(),
        };
        let preview = encoding::to_data_url(&image.mime, &image.bytes);
        let size = image.bytes.len();

        state.controller.write().await.select_image(image);
        tracing::info!(%mime, size, "image selected");

        return Ok(Json(UploadedImage {
            preview,
            mime_type: mime,
            size,
        }));
    }

    Err((StatusCode::BAD_REQUEST, "no image provided".into()).into())
}

/// "Change Image": drop the selection. The generation state is left as-is.
pub async fn clear(State(state): State<AppState>) -> Json<SessionView> {
    let mut ctrl = state.controller.write().await;
    ctrl.clear_image();
    tracing::info!("image cleared");
    Json(SessionView::of(&ctrl))
}
