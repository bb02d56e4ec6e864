use axum::Json;
use serde_json::{json, Value};

use crate::models::codes::{
    AssessmentAction, AssessmentIdType, AssessmentResult, AttendanceStatus, Grade,
    SurveyLanguage, TraineeIdType,
};
use crate::models::{
    CreateAssessmentInfo, RequestInfo, UpdateVoidAssessmentInfo, UploadAttendanceInfo,
};

fn table(mappings: &[(&str, &str)]) -> Value {
    mappings
        .iter()
        .map(|(code, label)| json!({"code": code, "label": label}))
        .collect()
}

/// GET /api/v1/codes
/// Every code table as `{code, label}` pairs, for populating form selects.
pub async fn handle_codes() -> Json<Value> {
    Json(json!({
        "attendanceStatus": table(AttendanceStatus::MAPPINGS),
        "traineeIdType": table(TraineeIdType::MAPPINGS),
        "surveyLanguage": table(SurveyLanguage::MAPPINGS),
        "assessmentIdType": table(AssessmentIdType::MAPPINGS),
        "grade": table(Grade::MAPPINGS),
        "result": table(AssessmentResult::MAPPINGS),
        "action": table(AssessmentAction::MAPPINGS),
    }))
}

/// GET /api/v1/forms
/// Field names each form accepts under `fields`.
pub async fn handle_forms() -> Json<Value> {
    Json(json!({
        "attendance": UploadAttendanceInfo::new("").field_names(),
        "assessments": CreateAssessmentInfo::new("").field_names(),
        "updateVoid": UpdateVoidAssessmentInfo::new().field_names(),
    }))
}
