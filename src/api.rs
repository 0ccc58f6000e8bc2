// Sankey Flow - REST API with Axum
// Stateless: every request gets its own classifier/registry/builder set

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::locale::Language;
use crate::parser::{write_template, DelimitedReader, StatementReader};
use crate::report::{generate, generate_from_import, FlowReport, ImportedReport};
use crate::statement::LineItem;

/// Shared application state (read-only)
#[derive(Clone)]
pub struct AppState {
    /// Optional locale override; when set, it wins over the request language
    pub custom: Option<Arc<EngineConfig>>,
}

impl AppState {
    pub fn new(custom: Option<EngineConfig>) -> Self {
        AppState {
            custom: custom.map(Arc::new),
        }
    }

    fn config_for(&self, language: Option<Language>) -> EngineConfig {
        match (&self.custom, language) {
            (Some(custom), _) => custom.as_ref().clone(),
            (None, lang) => EngineConfig::for_language(lang.unwrap_or_default()),
        }
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FlowRequest {
    #[serde(default)]
    pub language: Option<Language>,
    pub rows: Vec<LineItem>,
}

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/flow - Build a flow report from JSON rows
async fn post_flow(
    State(state): State<AppState>,
    payload: Result<Json<FlowRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Rejected flow request: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(ApiResponse::<FlowReport>::err(rejection.body_text())),
            )
                .into_response();
        }
    };

    let config = state.config_for(request.language);
    let report = generate(request.rows, &config.locale, &config.table);
    (StatusCode::OK, Json(ApiResponse::ok(report))).into_response()
}

/// POST /api/flow/csv?lang=tr - Build a flow report from a CSV body
async fn post_flow_csv(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    body: String,
) -> Response {
    let language = match query.lang.as_deref().map(str::parse::<Language>).transpose() {
        Ok(language) => language,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ImportedReport>::err(e.to_string())),
            )
                .into_response()
        }
    };

    let config = state.config_for(language);

    match DelimitedReader::csv().read(&mut Cursor::new(body.as_bytes())) {
        Ok(import) => {
            info!(rows = import.total_rows(), "csv statement received");
            let imported = generate_from_import(import, &config.locale, &config.table);
            (StatusCode::OK, Json(ApiResponse::ok(imported))).into_response()
        }
        Err(e) => {
            error!("Error reading CSV body: {:#}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ImportedReport>::err(format!("{:#}", e))),
            )
                .into_response()
        }
    }
}

/// GET /api/template - Example statement CSV
async fn get_template() -> Response {
    let mut buf = Vec::new();
    match write_template(&mut buf) {
        Ok(()) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"template.csv\""),
            ],
            buf,
        )
            .into_response(),
        Err(e) => {
            error!("Error writing template: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Build the router (API routes nested under /api)
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/flow", post(post_flow))
        .route("/flow/csv", post(post_flow_csv))
        .route("/template", get(get_template))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router(AppState::new(None)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_post_flow_json() {
        let body = serde_json::json!({
            "language": "tr",
            "rows": [
                { "name": "A", "value": 100.0, "type": "Gelir" },
                { "name": "Maliyet", "value": 60.0, "type": "Maliyet" },
                { "name": "Kira", "value": 20.0, "type": "Gider" },
                { "name": "?", "value": 5.0, "type": "bilinmiyor" }
            ]
        });
        let request = Request::post("/api/flow")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["graph"]["nodes"][0]["label"], "Toplam Gelir");
        assert_eq!(json["data"]["aggregates"]["net_income"], 20.0);
        assert_eq!(json["data"]["unclassified"][0]["name"], "?");
    }

    #[tokio::test]
    async fn test_post_flow_accepts_every_language_spelling() {
        for language in ["en", "english", "tr", "turkish", "türkçe"] {
            let body = serde_json::json!({
                "language": language,
                "rows": [{ "name": "A", "value": 10.0, "type": "Revenue" }]
            });
            let request = Request::post("/api/flow")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();

            let (status, json) = send(request).await;
            assert_eq!(status, StatusCode::OK, "language {}", language);
            assert_eq!(json["success"], true);
        }
    }

    #[tokio::test]
    async fn test_post_flow_rejects_unknown_language_with_envelope() {
        let body = serde_json::json!({ "language": "xx", "rows": [] });
        let request = Request::post("/api/flow")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("Unsupported language"));
    }

    #[tokio::test]
    async fn test_post_flow_csv_reports_row_issues() {
        let request = Request::post("/api/flow/csv?lang=en")
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from("Name,Value,Type\nA,100,Revenue\nB,oops,Revenue\n"))
            .unwrap();

        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["row_issues"][0]["line"], 3);
        assert_eq!(json["data"]["graph"]["edges"][0]["value"], 100.0);
    }

    #[tokio::test]
    async fn test_post_flow_csv_rejects_unknown_language() {
        let request = Request::post("/api/flow/csv?lang=xx")
            .body(Body::from("Name,Value,Type\n"))
            .unwrap();

        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_template_download() {
        let response = router(AppState::new(None))
            .oneshot(Request::get("/api/template").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"Name,Value,Type"));
    }
}
