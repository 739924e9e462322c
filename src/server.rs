//! HTTP boundary: `POST /qa` and `GET /health`.

use crate::error::QaError;
use crate::qa::QaEngine;
use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const MISSING_FIELDS: &str = "pdfUrl and questions array are required";
const PROCESSING_FAILED: &str = "Failed to process request";

/// Validated body of a `POST /qa` request
#[derive(Debug, PartialEq, Eq)]
pub struct QaRequest {
    pub pdf_url: String,
    pub questions: Vec<String>,
}

impl QaRequest {
    /// Validate a raw JSON body
    pub fn from_json(body: &Value) -> Result<Self, QaError> {
        let pdf_url = match body.get("pdfUrl") {
            Some(Value::String(url)) if !url.is_empty() => url.clone(),
            _ => return Err(invalid("pdfUrl must be a non-empty string")),
        };

        let questions = match body.get("questions") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(question) => Ok(question.clone()),
                    _ => Err(invalid("questions must be strings")),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(invalid("questions must be an array")),
        };

        Ok(QaRequest { pdf_url, questions })
    }
}

fn invalid(reason: &str) -> QaError {
    QaError::Validation(reason.to_string())
}

#[derive(Serialize)]
struct AnswersResponse {
    answers: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl IntoResponse for QaError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            QaError::Validation(reason) => {
                debug!("Rejected request: {}", reason);
                (StatusCode::BAD_REQUEST, MISSING_FIELDS)
            }
            _ => {
                error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Build the application router
pub fn build_router(engine: Arc<QaEngine>) -> Router {
    Router::new()
        .route("/qa", post(answer_questions))
        .route("/health", get(health))
        .with_state(engine)
}

/// Bind `port` on all interfaces and serve until Ctrl-C
pub async fn serve(engine: Arc<QaEngine>, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Server listening on http://localhost:{}", port);

    axum::serve(listener, build_router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn answer_questions(
    State(engine): State<Arc<QaEngine>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnswersResponse>, QaError> {
    let Json(body) = payload.map_err(|e| QaError::Validation(e.body_text()))?;
    let request = QaRequest::from_json(&body)?;

    info!(
        "Answering {} question(s) about {}",
        request.questions.len(),
        request.pdf_url
    );
    let answers = engine.run(&request.pdf_url, &request.questions).await?;

    Ok(Json(AnswersResponse { answers }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentLoader;
    use crate::model::LanguageModel;
    use crate::qa::tests::{echo_model, settings, StaticLoader};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn app(loader: StaticLoader) -> Router {
        let loader: Arc<dyn DocumentLoader> = Arc::new(loader);
        let model: Arc<dyn LanguageModel> = Arc::new(echo_model());
        let engine = QaEngine::new(loader, model, settings(2)).unwrap();
        build_router(Arc::new(engine))
    }

    async fn post_qa(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/qa")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_request_validation() {
        let ok = QaRequest::from_json(&json!({
            "pdfUrl": "https://x/a.pdf",
            "questions": ["a", "b"]
        }));
        assert_eq!(
            ok.unwrap(),
            QaRequest {
                pdf_url: "https://x/a.pdf".to_string(),
                questions: vec!["a".to_string(), "b".to_string()],
            }
        );

        let rejected = [
            json!({"pdfUrl": "", "questions": []}),
            json!({"questions": ["a"]}),
            json!({"pdfUrl": null, "questions": ["a"]}),
            json!({"pdfUrl": false, "questions": ["a"]}),
            json!({"pdfUrl": "https://x/a.pdf"}),
            json!({"pdfUrl": "https://x/a.pdf", "questions": "a"}),
            json!({"pdfUrl": "https://x/a.pdf", "questions": [1, 2]}),
            json!([1, 2, 3]),
        ];
        for body in rejected {
            assert!(
                matches!(QaRequest::from_json(&body), Err(QaError::Validation(_))),
                "accepted {}",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_missing_fields_is_bad_request() {
        let app = app(StaticLoader::Text("unused".to_string()));
        let (status, body) = post_qa(app, r#"{"pdfUrl": "", "questions": []}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "pdfUrl and questions array are required"}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app(StaticLoader::Text("unused".to_string()));
        let (status, body) = post_qa(app, "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_FIELDS);
    }

    #[tokio::test]
    async fn test_answers_in_question_order() {
        let app = app(StaticLoader::Text("ant bee cat dog".to_string()));
        let body = json!({
            "pdfUrl": "https://example.com/policy.pdf",
            "questions": ["one?", "two?"]
        });
        let (status, body) = post_qa(app, &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answers": ["one? -> ant bee", "two? -> ant bee"]}));
    }

    #[tokio::test]
    async fn test_empty_question_list_is_ok() {
        let app = app(StaticLoader::Text("ant bee".to_string()));
        let (status, body) = post_qa(
            app,
            r#"{"pdfUrl": "https://example.com/policy.pdf", "questions": []}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answers": []}));
    }

    #[tokio::test]
    async fn test_retrieval_failure_is_internal_error() {
        for loader in [StaticLoader::FetchFails, StaticLoader::ExtractFails] {
            let (status, body) = post_qa(
                app(loader),
                r#"{"pdfUrl": "https://example.com/missing.pdf", "questions": ["q"]}"#,
            )
            .await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({"error": "Failed to process request"}));
            assert!(body.get("answers").is_none());
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(StaticLoader::Text(String::new()));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
