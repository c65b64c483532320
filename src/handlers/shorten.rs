use crate::{
    models::{Record, ShortenRequest, ShortenResponse},
    shortcode,
    storage::StorageError,
    AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// POST /
///
/// The raw request body is the URL. Replies `201` with the short URL as
/// plain text.
pub async fn shorten_text(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "Empty request body").into_response();
    }

    let original_url = String::from_utf8_lossy(&body).into_owned();
    match shorten(&state, &body, original_url).await {
        Ok(short_url) => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "text/plain")],
            short_url,
        )
            .into_response(),
        Err(e) => store_failed(e),
    }
}

/// POST /api/shorten
///
/// Accepts `{"url": "..."}` and replies `201` with `{"result": "<short url>"}`.
/// The body is parsed as JSON whatever its declared content type.
pub async fn shorten_json(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ShortenRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    if request.url.is_empty() {
        return (StatusCode::BAD_REQUEST, "url must not be empty").into_response();
    }

    let input = request.url.clone();
    match shorten(&state, input.as_bytes(), request.url).await {
        Ok(result) => (StatusCode::CREATED, Json(ShortenResponse { result })).into_response(),
        Err(e) => store_failed(e),
    }
}

/// Encode `input`, store the record and return the public short URL.
async fn shorten(
    state: &AppState,
    input: &[u8],
    original_url: String,
) -> Result<String, StorageError> {
    let code = shortcode::encode(input);
    state
        .storage
        .store(Record::new(code.clone(), original_url))
        .await?;
    Ok(format!("{}/{}", state.config.base_url, code))
}

fn store_failed(e: StorageError) -> Response {
    tracing::error!("Failed to store shortened URL: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store URL").into_response()
}
