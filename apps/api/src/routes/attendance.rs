use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::executors::UploadAttendance;
use crate::models::{RequestInfo, UploadAttendanceInfo};
use crate::routes::{preview, send, PreviewResponse, SendResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AttendanceForm {
    #[serde(default, rename = "runId")]
    pub run_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

async fn build(state: &AppState, form: &AttendanceForm) -> Result<UploadAttendance, AppError> {
    let (session, client) = state.client().await?;
    let mut info = UploadAttendanceInfo::new(session.uen());
    info.apply_fields(&form.fields)?;
    Ok(UploadAttendance::new(client, form.run_id.clone(), info))
}

/// POST /api/v1/attendance/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(form): Json<AttendanceForm>,
) -> Result<Json<PreviewResponse>, AppError> {
    let executor = build(&state, &form).await?;
    Ok(Json(preview(&executor)?))
}

/// POST /api/v1/attendance/send
pub async fn handle_send(
    State(state): State<AppState>,
    Json(form): Json<AttendanceForm>,
) -> Result<Json<SendResponse>, AppError> {
    let executor = build(&state, &form).await?;
    Ok(Json(send(&executor).await?))
}
