//! HTTP API: form page, JSON prediction, health, readiness and metrics

use crate::page::{self, PageView};
use axum::{
    body::Bytes,
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use pricing_lib::{
    ErrorResponse, HealthReport, PredictResponse, PricingError, PricingService, ReadinessResponse,
};
use prometheus::{Encoder, TextEncoder};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: PricingService,
    pub cors_available: bool,
}

impl AppState {
    pub fn new(service: PricingService, cors_available: bool) -> Self {
        Self {
            service,
            cors_available,
        }
    }
}

/// JSON error response: 400 for invalid input, 500 for everything else
pub struct ApiError(PricingError);

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_caller_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Empty input form
async fn index() -> Html<String> {
    Html(page::render(&PageView::default()))
}

/// Form submission; failures are rendered inline with status 200
async fn submit_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Html<String> {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            let reason = rejection.body_text();
            warn!(error = %reason, "Unreadable form submission");
            return Html(page::render(&PageView {
                error: Some(&reason),
                ..Default::default()
            }));
        }
    };

    let outcome = state.service.predict_form(&fields);
    let (result, error) = match &outcome {
        Ok(result) => (Some(result), None),
        Err(err) => (None, Some(err.to_string())),
    };

    Html(page::render(&PageView {
        fields: Some(&fields),
        result,
        error: error.as_deref(),
    }))
}

/// JSON prediction endpoint; the body is parsed as JSON whatever its content type
async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            PricingError::invalid(format!("Invalid JSON payload: {}", e))
        })?
    };

    let result = state.service.predict_json(&payload)?;
    Ok(Json(result.into()))
}

/// Model status snapshot; always 200
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(HealthReport::from_provider(
        state.service.provider(),
        state.cors_available,
    ))
}

/// Readiness check response - returns 200 if the model is loaded, 503 otherwise
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = ReadinessResponse::from_provider(state.service.provider());

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_available = state.cors_available;
    let router = Router::new()
        .route("/", get(index).post(submit_form))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_available {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Start the API server
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
