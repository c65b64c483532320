use crate::{storage::StorageError, AppState};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// GET /*code
///
/// Replies `307` pointing at the stored URL. Unknown codes get `400`, the
/// same answer as for a code that was overwritten by a colliding URL.
pub async fn redirect(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    let record = match state.storage.get(&code).await {
        Ok(record) => record,
        Err(StorageError::NotFound(_)) => return bad_request(),
        Err(e) => {
            tracing::error!("Storage error looking up short code '{}': {}", code, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
        }
    };

    // Stored URLs are arbitrary text; not all of it is a legal header value.
    let Ok(location) = HeaderValue::from_str(&record.original_url) else {
        tracing::warn!("Short code '{}' maps to an unusable redirect target", code);
        return bad_request();
    };

    (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response()
}

/// GET /
///
/// A lookup without a code.
pub async fn missing_code() -> Response {
    bad_request()
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Bad request").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        models::Record,
        router,
        storage::{FileStorage, MemoryStorage, Storage},
    };
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use tower::ServiceExt; // for `oneshot`

    fn state_with(storage: Arc<dyn Storage>) -> Arc<AppState> {
        Arc::new(AppState {
            config: AppConfig::for_tests(),
            storage,
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn redirects_to_original_url() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .store(Record::new("yXwbNnH", "test.com"))
            .await
            .unwrap();

        let response = router(state_with(storage))
            .oneshot(get("/yXwbNnH"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "test.com");
    }

    #[tokio::test]
    async fn unknown_and_empty_codes_are_bad_requests() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        for uri in ["/", "/123456", "/nonexistent"] {
            let response = router(state_with(storage.clone()))
                .oneshot(get(uri))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
            assert!(response.headers().get(header::LOCATION).is_none());
            assert_eq!(body_string(response).await, "Bad request");
        }
    }

    #[tokio::test]
    async fn file_storage_behaves_the_same() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::open(dir.path().join("db.json")).await.unwrap());
        storage
            .store(Record::new("yXwbNnH", "test.com"))
            .await
            .unwrap();
        let state = state_with(storage);

        let hit = router(state.clone()).oneshot(get("/yXwbNnH")).await.unwrap();
        assert_eq!(hit.status(), StatusCode::TEMPORARY_REDIRECT);

        let miss = router(state).oneshot(get("/nonexistent")).await.unwrap();
        assert_eq!(miss.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unusable_target_is_rejected() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .store(Record::new("abcdefg", "line\nbreak"))
            .await
            .unwrap();

        let response = router(state_with(storage))
            .oneshot(get("/abcdefg"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn code_containing_slash_is_reachable() {
        let state = state_with(Arc::new(MemoryStorage::new()));
        let created = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("https://example.com/51"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let short_url = body_string(created).await;
        assert_eq!(short_url, "http://localhost:8080//GcyDG+");

        let path = short_url.trim_start_matches("http://localhost:8080");
        let response = router(state).oneshot(get(path)).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/51"
        );
    }

    #[tokio::test]
    async fn shorten_then_follow() {
        let state = state_with(Arc::new(MemoryStorage::new()));
        let created = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("https://example.com/a/long/path"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let short_url = body_string(created).await;
        let path = short_url.trim_start_matches("http://localhost:8080");

        let response = router(state).oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/a/long/path"
        );
    }
}
