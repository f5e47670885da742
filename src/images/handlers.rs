use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, MessageResponse},
    images::filter::{multipart_error, read_image_field, BODY_LIMIT_BYTES},
    state::AppState,
};

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

/// Accepts a single `file` part through the upload filter and discards it.
#[instrument(skip(mp))]
pub async fn upload(
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut mp = mp?;
    let mut received = false;
    while let Some(field) = mp.next_field().await.map_err(multipart_error)? {
        if field.file_name().is_none() {
            continue;
        }
        if field.name() != Some("file") || received {
            return Err(ApiError::Rejected("Unexpected field".into()));
        }
        let data = read_image_field(field).await?;
        received = true;
        info!(size = data.len(), "file received");
    }
    Ok(MessageResponse::new("File uploaded successfully!"))
}
