//! HTTP surface: `POST /upload` converts a CSV upload, `/public` serves the results.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{cli::LocalStorage, ServerConfig};
use crate::core::pipeline::ConversionPipeline;
use crate::core::publisher::{ArtifactPublisher, PUBLIC_ROUTE};
use crate::core::{ConfigProvider, PublishedArtifacts, TallySpec};
use crate::utils::error::{ConvertError, ErrorKind, Result};
use crate::utils::validation::{validate_distinct, validate_non_empty_string};

pub const UPLOAD_FIELD: &str = "file";
const DEFAULT_UPLOAD_NAME: &str = "upload.csv";

#[derive(Clone)]
pub struct AppState {
    tally: Arc<TallySpec>,
    publisher: Arc<ArtifactPublisher<LocalStorage>>,
}

/// Error body returned to clients as `{"error": "..."}`.
pub struct ApiError(ConvertError);

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        Self(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        // 超過 body 上限時保留 413
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(ConvertError::UploadTooLargeError {
                message: err.body_text(),
            })
        } else {
            Self(ConvertError::upload(err.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            kind if kind.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!("❌ Conversion failed ({:?}): {}", kind, self.0);

        // 內部錯誤不回傳細節
        let message = if kind.is_client_error() || kind.is_pipeline_error() {
            self.0.to_string()
        } else {
            "An error occurred".to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

struct Upload {
    file_name: String,
    data: Vec<u8>,
    tally: TallySpec,
}

async fn read_upload(
    mut multipart: Multipart,
    defaults: &TallySpec,
) -> std::result::Result<Upload, ApiError> {
    let mut file = None;
    let mut tally = defaults.clone();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(UPLOAD_FIELD) => {
                let file_name = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());
                let data = field.bytes().await?.to_vec();
                file = Some((file_name, data));
            }
            Some("column") => tally.column = field.text().await?,
            Some("valueA") => tally.value_a = field.text().await?,
            Some("valueB") => tally.value_b = field.text().await?,
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| ConvertError::upload(format!("missing '{}' field", UPLOAD_FIELD)))?;

    validate_non_empty_string("column", &tally.column)
        .and_then(|_| validate_distinct("valueB", &tally.value_a, &tally.value_b))
        .map_err(|e| ConvertError::upload(e.to_string()))?;

    Ok(Upload {
        file_name,
        data,
        tally,
    })
}

async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> std::result::Result<Json<PublishedArtifacts>, ApiError> {
    let upload = read_upload(multipart, &state.tally).await?;
    tracing::info!(
        "📥 Received '{}' ({} bytes)",
        upload.file_name,
        upload.data.len()
    );

    let pipeline = ConversionPipeline::new(upload.tally);
    let output = pipeline.convert_concurrent(upload.data).await?;
    let published = state.publisher.publish(&upload.file_name, &output).await?;

    tracing::info!(
        "✅ Converted {} rows ({}={}, {}={}) -> {}",
        output.rows,
        pipeline.tally_spec().value_a,
        output.counts.a,
        pipeline.tally_spec().value_b,
        output.counts.b,
        published.xlsx_name
    );
    Ok(Json(published))
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn build_router(config: &ServerConfig) -> Result<Router> {
    let storage = LocalStorage::new(config.output_dir());
    let serve_dir = ServeDir::new(storage.base_path());
    let state = AppState {
        tally: Arc::new(config.tally_spec()),
        publisher: Arc::new(ArtifactPublisher::new(storage, config)?),
    };

    Ok(Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .nest_service(&format!("/{}", PUBLIC_ROUTE), serve_dir)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serves `router` on an already bound listener until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let router = build_router(&config)?;
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "🚀 Listening on {} (artifacts in '{}', served at {}/{})",
        listener.local_addr()?,
        config.output_dir,
        config.base_url.trim_end_matches('/'),
        PUBLIC_ROUTE
    );

    run(listener, router, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("🛑 Shutting down");
    })
    .await
}
