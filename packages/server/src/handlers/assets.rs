use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Serve an image stored by the filesystem backend. Other backends host their own URLs.
#[instrument(skip(state))]
pub async fn serve_asset(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound("Asset not found".to_string());

    let local = state.local_assets.as_ref().ok_or_else(not_found)?;
    let path = local.resolve(&public_id).map_err(|_| not_found())?;

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::Storage(format!("IO error: {e}"))),
    };
    if !file
        .metadata()
        .await
        .map_err(|e| AppError::Storage(format!("IO error: {e}")))?
        .is_file()
    {
        return Err(not_found());
    }

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::Storage(e.to_string()))
}
