//! HTTP endpoint: `POST /api/convert`.
//!
//! One route, one responsibility: accept a PDF in any of the four request
//! shapes, run the conversion pipeline, and emit `{"images": [...]}` or a
//! `{"error", "details"?}` body. All failures are caught here at the
//! boundary, logged, and mapped to a status code; nothing is retried and no
//! partial image list ever leaves the handler.
//!
//! Check order: non-POST methods are rejected by the method router before
//! anything runs; the API key is checked before the body is touched; input
//! shape is resolved once into a [`PdfSource`] before any bytes are
//! produced.

use crate::config::ServerConfig;
use crate::convert::convert_bytes;
use crate::error::ConvertError;
use crate::output::{ConvertOutput, ConvertResponse};
use crate::pipeline::input::PdfSource;
use axum::body::to_bytes;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state: configuration plus the one HTTP client used for
/// URL-sourced input. Built once at startup; nothing else crosses requests.
pub struct AppState {
    pub config: ServerConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

/// JSON envelope for `application/json` requests: exactly one of `pdf`
/// (base64, optionally data-URI prefixed) or `url`.
#[derive(Debug, Deserialize)]
struct ConvertEnvelope {
    pdf: Option<String>,
    url: Option<String>,
}

/// Error body shared by every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Build the application router over explicit state.
///
/// A pure function so tests can drive the exact production routing without
/// binding a socket.
pub fn app(state: Arc<AppState>) -> Router {
    let max_body = state.config.max_body_bytes;
    Router::new()
        .route(
            "/api/convert",
            post(convert_handler).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.bind_addr;
    let auth = if config.api_key.is_some() {
        "enabled"
    } else {
        "disabled"
    };
    let state = Arc::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr} (auth {auth})");
    axum::serve(listener, app(state)).await
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
}

async fn convert_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    // Auth gate runs before the body is read; body validity is irrelevant to
    // a 401.
    if let Some(expected) = state.config.api_key.as_deref() {
        let presented = req
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected) {
            warn!("rejected request: missing or invalid API key");
            return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", None);
        }
    }

    match process(&state, req).await {
        Ok(output) => {
            info!(
                "converted {} pages in {}ms",
                output.stats.page_count, output.stats.total_duration_ms
            );
            (StatusCode::OK, Json(ConvertResponse::from(output))).into_response()
        }
        Err(err) => {
            error!("conversion failed: {err}");
            convert_error_response(&err, state.config.expose_error_details)
        }
    }
}

/// Resolve the input shape, produce bytes, convert. Every failure funnels
/// through [`ConvertError`].
async fn process(state: &AppState, req: Request) -> Result<ConvertOutput, ConvertError> {
    let source = extract_source(state, req).await?;
    let bytes = source
        .resolve(&state.http, state.config.convert.fetch_timeout_secs)
        .await?;
    convert_bytes(bytes, &state.config.convert).await
}

/// Inspect the content type once and build the matching [`PdfSource`].
async fn extract_source(state: &AppState, req: Request) -> Result<PdfSource, ConvertError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart =
            Multipart::from_request(req, &()).await.map_err(|e| ConvertError::Multipart {
                detail: e.to_string(),
            })?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ConvertError::Multipart {
                detail: e.to_string(),
            })?
        {
            if field.name() == Some("pdf") {
                let data = field.bytes().await.map_err(|e| ConvertError::Multipart {
                    detail: e.to_string(),
                })?;
                return Ok(PdfSource::Upload(data));
            }
        }
        Err(ConvertError::MissingFile)
    } else if content_type.starts_with("application/pdf") {
        let body = to_bytes(req.into_body(), state.config.max_body_bytes)
            .await
            .map_err(|e| ConvertError::Body {
                detail: e.to_string(),
            })?;
        Ok(PdfSource::Raw(body))
    } else if content_type.starts_with("application/json") {
        let body = to_bytes(req.into_body(), state.config.max_body_bytes)
            .await
            .map_err(|e| ConvertError::Body {
                detail: e.to_string(),
            })?;
        let envelope: ConvertEnvelope =
            serde_json::from_slice(&body).map_err(|e| ConvertError::InvalidJson {
                detail: e.to_string(),
            })?;

        match (envelope.pdf, envelope.url) {
            (Some(_), Some(_)) => Err(ConvertError::AmbiguousInput),
            (Some(pdf), None) => Ok(PdfSource::Base64(pdf)),
            (None, Some(url)) => Ok(PdfSource::RemoteUrl(url)),
            (None, None) => Err(ConvertError::MissingData),
        }
    } else {
        Err(ConvertError::UnsupportedContentType { content_type })
    }
}

/// Map a pipeline failure to status code, coarse label, and optional detail.
fn convert_error_response(err: &ConvertError, expose_details: bool) -> Response {
    let status = if err.is_input_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let label = match err {
        ConvertError::MissingFile => "No PDF file provided",
        ConvertError::MissingData => "No PDF data provided",
        ConvertError::AmbiguousInput => "Provide either 'pdf' or 'url', not both",
        ConvertError::InvalidBase64 { .. } => "Invalid base64 PDF data",
        ConvertError::UnsupportedContentType { .. } => "Unsupported content type",
        ConvertError::InvalidJson { .. } => "Invalid JSON body",
        ConvertError::Body { .. } => "Unreadable request body",
        ConvertError::Multipart { .. } => "Unreadable multipart form",
        ConvertError::Fetch { .. } => "Failed to fetch PDF from URL",
        ConvertError::NotAPdf { .. } | ConvertError::Decode { .. } => "Failed to decode PDF document",
        ConvertError::Render { .. } | ConvertError::Encode { .. } => "Failed to render PDF page",
        _ => "Failed to process PDF",
    };

    // Fetch failures always carry the upstream status: it belongs to the
    // caller's upstream, not to this service. Everything else is redacted
    // unless explicitly exposed.
    let details = match err {
        ConvertError::Fetch { reason, .. } => Some(reason.clone()),
        _ if expose_details => Some(err.to_string()),
        _ => None,
    };

    error_response(status, label, details)
}

fn error_response(status: StatusCode, label: &str, details: Option<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: label.to_string(),
            details,
        }),
    )
        .into_response()
}
