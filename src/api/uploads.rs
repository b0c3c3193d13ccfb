use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, AppState};

/// GET /uploads/{filename}
/// Serves a stored evidence file by its generated name. Sits behind the auth
/// gate with the rest of the record routes.
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state
        .evidence()
        .resolve(&filename)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("File {} not found", filename)))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read evidence file: {e}")))?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok((
        [(header::CONTENT_TYPE, mime.as_ref())],
        Body::from(bytes),
    )
        .into_response())
}
