use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, Uri, header},
    response::IntoResponse,
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "web/"]
struct WebAssets;

pub async fn serve_embedded_web(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if let Some(content) = WebAssets::get(path) {
        return serve_asset(path, content.data.into_owned());
    }

    // Everything else gets the single page.
    if let Some(content) = WebAssets::get("index.html") {
        return serve_asset("index.html", content.data.into_owned());
    }

    (StatusCode::NOT_FOUND, "Not found").into_response()
}

fn serve_asset(path: &str, content: Vec<u8>) -> Response<Body> {
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let mut res = Response::new(Body::from(content));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&mime)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    res
}
