use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::executors::{CreateAssessment, UpdateVoidAssessment, ViewAssessment};
use crate::models::{CreateAssessmentInfo, RequestInfo, UpdateVoidAssessmentInfo};
use crate::routes::{preview, send, FieldsForm, PreviewResponse, SendResponse};
use crate::state::AppState;

async fn build_create(state: &AppState, form: &FieldsForm) -> Result<CreateAssessment, AppError> {
    let (session, client) = state.client().await?;
    let mut info = CreateAssessmentInfo::new(session.uen());
    info.apply_fields(&form.fields)?;
    Ok(CreateAssessment::new(client, info))
}

async fn build_update_void(
    state: &AppState,
    form: &FieldsForm,
) -> Result<UpdateVoidAssessment, AppError> {
    let (_, client) = state.client().await?;
    let mut info = UpdateVoidAssessmentInfo::new();
    info.apply_fields(&form.fields)?;
    Ok(UpdateVoidAssessment::new(client, info))
}

/// POST /api/v1/assessments/preview
pub async fn handle_create_preview(
    State(state): State<AppState>,
    Json(form): Json<FieldsForm>,
) -> Result<Json<PreviewResponse>, AppError> {
    let executor = build_create(&state, &form).await?;
    Ok(Json(preview(&executor)?))
}

/// POST /api/v1/assessments/send
pub async fn handle_create_send(
    State(state): State<AppState>,
    Json(form): Json<FieldsForm>,
) -> Result<Json<SendResponse>, AppError> {
    let executor = build_create(&state, &form).await?;
    Ok(Json(send(&executor).await?))
}

/// POST /api/v1/assessments/update-void/preview
pub async fn handle_update_void_preview(
    State(state): State<AppState>,
    Json(form): Json<FieldsForm>,
) -> Result<Json<PreviewResponse>, AppError> {
    let executor = build_update_void(&state, &form).await?;
    Ok(Json(preview(&executor)?))
}

/// POST /api/v1/assessments/update-void/send
pub async fn handle_update_void_send(
    State(state): State<AppState>,
    Json(form): Json<FieldsForm>,
) -> Result<Json<SendResponse>, AppError> {
    let executor = build_update_void(&state, &form).await?;
    Ok(Json(send(&executor).await?))
}

/// GET /api/v1/assessments/:reference
pub async fn handle_view(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<SendResponse>, AppError> {
    let (_, client) = state.client().await?;
    let executor = ViewAssessment::new(client, reference);
    Ok(Json(send(&executor).await?))
}
