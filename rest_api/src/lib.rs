// rest_api/src/lib.rs

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use models::{RawRecord, Record, ValidationError};
use serde::Serialize;
use serde_json::{json, Value};
use sheets::{PersistenceError, RowStore};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use anyhow::Context;
use anyhow::Error as AnyhowError;

pub mod config;
pub mod export;
mod form;

pub use crate::config::{load_intake_config, IntakeConfig, SheetBackend};

// Define the REST API error enum
#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] AnyhowError),
}

// Implement IntoResponse for RestApiError to convert it into an HTTP response.
// Validation failures carry the full offending-field list; persistence
// failures surface as a failed-save notice. Neither leaves partial effects.
impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        match self {
            RestApiError::Validation(e) => {
                let body = Json(json!({
                    "status": "error",
                    "message": e.to_string(),
                    "fields": e.fields,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            RestApiError::Persistence(e) => {
                let body = Json(json!({
                    "status": "error",
                    "message": format!("Failed to save or load data: {}. If you just submitted, check the dataset below before resubmitting.", e),
                }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            other => {
                let body = Json(json!({
                    "status": "error",
                    "message": other.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

// Shared state for the Axum application
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RowStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        AppState { store }
    }
}

/// Aggregate figures over the collected dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub cpe_positive: usize,
    pub cpe_positive_pct: f64,
    pub mean_age: f64,
}

pub fn dataset_summary(records: &[Record]) -> DatasetSummary {
    let total = records.len();
    let cpe_positive = records.iter().filter(|r| r.rectal_cpe_positive).count();
    let (cpe_positive_pct, mean_age) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            cpe_positive as f64 * 100.0 / total as f64,
            records.iter().map(|r| r.age as f64).sum::<f64>() / total as f64,
        )
    };
    DatasetSummary {
        total,
        cpe_positive,
        cpe_positive_pct,
        mean_age,
    }
}

// Handler for GET /
async fn intake_form_handler() -> Html<String> {
    Html(form::render_form())
}

// Handler for POST /api/v1/records
async fn submit_record_handler(
    State(state): State<AppState>,
    Json(payload): Json<RawRecord>,
) -> Result<Json<Value>, RestApiError> {
    let record = Record::validate(&payload).map_err(|e| {
        warn!(fields = ?e.field_names(), "rejected submission");
        e
    })?;
    state.store.append(&record).await?;
    info!("patient record saved");
    Ok(Json(json!({
        "status": "success",
        "message": "Patient data successfully saved."
    })))
}

// Handler for GET /api/v1/records
async fn list_records_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, RestApiError> {
    let records = state.store.fetch_all().await?;
    Ok(Json(json!({
        "status": "success",
        "count": records.len(),
        "records": records,
    })))
}

// Handler for GET /api/v1/records/summary
async fn summary_handler(State(state): State<AppState>) -> Result<Json<Value>, RestApiError> {
    let records = state.store.fetch_all().await?;
    let summary = dataset_summary(&records);
    Ok(Json(json!({
        "status": "success",
        "summary": summary,
    })))
}

// Handler for GET /api/v1/records/export
async fn export_csv_handler(State(state): State<AppState>) -> Result<Response, RestApiError> {
    let records = state.store.fetch_all().await?;
    let bytes = export::records_to_csv(&records)?;
    let filename = format!("clinical_data_{}.csv", Utc::now().format("%Y%m%d"));
    info!(records = records.len(), %filename, "exporting dataset");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

// Handler for the /api/v1/health endpoint
async fn health_check_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "message": "Intake API is healthy" })))
}

// Handler for the /api/v1/version endpoint
async fn version_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "version": "0.1.0", "api_level": 1 })))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/", get(intake_form_handler))
        .route(
            "/api/v1/records",
            get(list_records_handler).post(submit_record_handler),
        )
        .route("/api/v1/records/summary", get(summary_handler))
        .route("/api/v1/records/export", get(export_csv_handler))
        .route("/api/v1/health", get(health_check_handler))
        .route("/api/v1/version", get(version_handler))
        .with_state(state)
        .layer(cors)
}

// Main function to start the intake API server
pub async fn start_server(
    config: &IntakeConfig,
    store: Arc<dyn RowStore>,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), AnyhowError> {
    let app = router(AppState::new(store));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid listen address in intake configuration")?;
    info!("Intake API server listening on {}", addr);

    let shutdown_signal = async {
        let _ = shutdown_rx.await;
        info!("Received shutdown signal.");
    };

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Intake API server failed to start or run")?;

    info!("Intake API server stopped.");
    Ok(())
}
