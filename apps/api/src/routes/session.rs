use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::session::{ClientCredentials, Session, SessionSummary};
use crate::state::AppState;

#[derive(Default)]
struct SessionUpload {
    uen: Option<String>,
    encryption_key: Option<String>,
    cert: Option<Vec<u8>>,
    key: Option<Vec<u8>>,
}

/// POST /api/v1/session
/// Multipart form with `uen`, `encryption_key`, `cert` and `key` (both PEM).
pub async fn handle_load_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionSummary>, AppError> {
    let mut upload = SessionUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "uen" => upload.uen = Some(String::from_utf8_lossy(&data).into_owned()),
            "encryption_key" => {
                upload.encryption_key = Some(String::from_utf8_lossy(&data).into_owned());
            }
            "cert" => upload.cert = Some(data.to_vec()),
            "key" => upload.key = Some(data.to_vec()),
            _ => {}
        }
    }

    let uen = upload.uen.ok_or_else(|| missing("uen"))?;
    let encryption_key = upload.encryption_key.ok_or_else(|| missing("encryption_key"))?;
    let cert = upload.cert.ok_or_else(|| missing("cert"))?;
    let key = upload.key.ok_or_else(|| missing("key"))?;

    let session = tokio::task::spawn_blocking(move || {
        let credentials = ClientCredentials::from_uploads(&cert, &key)?;
        Session::load(&uen, &encryption_key, credentials)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    let summary = session.summary();
    state.replace_session(session).await;
    Ok(Json(summary))
}

/// GET /api/v1/session
pub async fn handle_get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = state.current_session().await?;
    Ok(Json(session.summary()))
}

fn missing(field: &str) -> AppError {
    AppError::BadRequest(format!("Missing form field '{field}'"))
}
