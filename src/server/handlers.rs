//! HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::{ApiError, AppState, HealthResponse, PredictRequest, PredictResponse};

/// Classify a batch of texts
///
/// Returns one predicted class id per input text, in input order. A body that
/// is not valid JSON or is missing the `texts` field is an explicit 400.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedRequest(e.body_text()))?;

    // An empty batch has a defined result and skips the worker round-trip
    if request.texts.is_empty() {
        return Ok(Json(PredictResponse {
            predictions: Vec::new(),
        }));
    }

    let predictions = state.predictor.predict(request.texts).await?;

    Ok(Json(PredictResponse { predictions }))
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
    };

    (StatusCode::OK, Json(health))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use crate::server::{router, ErrorResponse, Predictor};

    use super::*;

    /// Flags texts containing "hopeless", in input order
    struct KeywordPredictor;

    #[async_trait]
    impl Predictor for KeywordPredictor {
        async fn predict(&self, texts: Vec<String>) -> Result<Vec<usize>, ApiError> {
            Ok(texts
                .iter()
                .map(|text| usize::from(text.contains("hopeless")))
                .collect())
        }
    }

    /// Simulates a dead inference worker
    struct UnavailablePredictor;

    #[async_trait]
    impl Predictor for UnavailablePredictor {
        async fn predict(&self, _texts: Vec<String>) -> Result<Vec<usize>, ApiError> {
            Err(ApiError::Unavailable)
        }
    }

    fn test_state() -> AppState {
        AppState::new(Arc::new(KeywordPredictor))
    }

    fn request(texts: &[&str]) -> PredictRequest {
        PredictRequest {
            texts: texts.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_predict_preserves_order_and_count() {
        let req = request(&[
            "I feel hopeless and want to give up",
            "The weather is nice today",
            "everything is hopeless",
        ]);

        let Json(response) = predict(State(test_state()), Ok(Json(req)))
            .await
            .expect("prediction should succeed");

        assert_eq!(response.predictions, vec![1, 0, 1]);
    }

    #[tokio::test]
    async fn test_predict_is_idempotent() {
        let state = test_state();
        let texts = &["I feel hopeless and want to give up", "lunch was great"];

        let Json(first) = predict(State(state.clone()), Ok(Json(request(texts))))
            .await
            .expect("prediction should succeed");
        let Json(second) = predict(State(state), Ok(Json(request(texts))))
            .await
            .expect("prediction should succeed");

        assert_eq!(first.predictions, second.predictions);
    }

    #[tokio::test]
    async fn test_predict_empty_texts() {
        let Json(response) = predict(State(test_state()), Ok(Json(request(&[]))))
            .await
            .expect("prediction should succeed");

        assert_eq!(response.predictions, Vec::<usize>::new());
    }

    #[tokio::test]
    async fn test_predict_worker_unavailable() {
        let state = AppState::new(Arc::new(UnavailablePredictor));

        let error = predict(State(state), Ok(Json(request(&["anything"]))))
            .await
            .expect_err("prediction should fail");

        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, Json(body)) = health_check(State(test_state())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
    }

    async fn post_predict(body: &str) -> axum::response::Response {
        let app = router(test_state());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build");

        app.oneshot(request).await.expect("request should succeed")
    }

    #[tokio::test]
    async fn test_predict_route_round_trip() {
        let response = post_predict(r#"{"texts": ["I feel hopeless and want to give up"]}"#).await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let parsed: PredictResponse = serde_json::from_slice(&body).expect("body should parse");

        assert_eq!(parsed.predictions, vec![1]);
    }

    #[tokio::test]
    async fn test_predict_route_rejects_missing_texts() {
        let response = post_predict(r#"{"posts": ["mislabeled field"]}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let parsed: ErrorResponse = serde_json::from_slice(&body).expect("body should parse");

        assert!(parsed.error.starts_with("malformed request"));
    }

    #[tokio::test]
    async fn test_predict_route_rejects_invalid_json() {
        let response = post_predict("not json at all").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
