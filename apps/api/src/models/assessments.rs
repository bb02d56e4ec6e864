use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::errors::{InvalidFieldError, ValidationError};
use crate::models::codes::{AssessmentAction, AssessmentIdType, AssessmentResult, Grade};
use crate::models::{
    read_code, read_date, read_float, read_text, unknown_field, Checklist, RequestInfo,
};

const CREATE_FIELDS: &[&str] = &[
    "runId",
    "referenceNumber",
    "traineeId",
    "traineeIdType",
    "traineeFullName",
    "grade",
    "score",
    "skillCode",
    "conferringInstituteCode",
    "result",
    "assessmentDate",
    "trainingPartnerCode",
];

const UPDATE_VOID_FIELDS: &[&str] = &[
    "referenceNumber",
    "action",
    "traineeFullName",
    "grade",
    "score",
    "skillCode",
    "result",
    "assessmentDate",
];

/// A new assessment record for a trainee enrolled in a course run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateAssessmentInfo {
    uen: String,
    run_id: Option<String>,
    reference_number: Option<String>,
    trainee_id: Option<String>,
    trainee_id_type: Option<AssessmentIdType>,
    trainee_full_name: Option<String>,
    grade: Option<Grade>,
    score: Option<f64>,
    skill_code: Option<String>,
    conferring_institute_code: Option<String>,
    result: Option<AssessmentResult>,
    assessment_date: Option<NaiveDate>,
    training_partner_code: Option<String>,
}

impl CreateAssessmentInfo {
    /// `uen` is the training partner's UEN from the loaded session.
    pub fn new(uen: impl Into<String>) -> Self {
        Self {
            uen: uen.into(),
            ..Self::default()
        }
    }

    pub fn set_run_id(&mut self, run_id: impl Into<String>) {
        self.run_id = Some(run_id.into());
    }

    pub fn set_reference_number(&mut self, reference_number: impl Into<String>) {
        self.reference_number = Some(reference_number.into());
    }

    pub fn set_trainee_id(&mut self, trainee_id: impl Into<String>) {
        self.trainee_id = Some(trainee_id.into());
    }

    pub fn set_trainee_id_type(&mut self, id_type: AssessmentIdType) {
        self.trainee_id_type = Some(id_type);
    }

    pub fn set_trainee_full_name(&mut self, full_name: impl Into<String>) {
        self.trainee_full_name = Some(full_name.into());
    }

    pub fn set_grade(&mut self, grade: Grade) {
        self.grade = Some(grade);
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = Some(score);
    }

    pub fn set_skill_code(&mut self, skill_code: impl Into<String>) {
        self.skill_code = Some(skill_code.into());
    }

    /// Defaults to the training partner code on the API side when left unset.
    pub fn set_conferring_institute_code(&mut self, code: impl Into<String>) {
        self.conferring_institute_code = Some(code.into());
    }

    pub fn set_result(&mut self, result: AssessmentResult) {
        self.result = Some(result);
    }

    pub fn set_assessment_date(&mut self, date: NaiveDate) {
        self.assessment_date = Some(date);
    }

    pub fn set_training_partner_code(&mut self, code: impl Into<String>) {
        self.training_partner_code = Some(code.into());
    }
}

impl RequestInfo for CreateAssessmentInfo {
    fn field_names(&self) -> &'static [&'static str] {
        CREATE_FIELDS
    }

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), InvalidFieldError> {
        match field {
            "runId" => self.run_id = read_text(field, value)?,
            "referenceNumber" => self.reference_number = read_text(field, value)?,
            "traineeId" => self.trainee_id = read_text(field, value)?,
            "traineeIdType" => self.trainee_id_type = read_code(field, value)?,
            "traineeFullName" => self.trainee_full_name = read_text(field, value)?,
            "grade" => self.grade = read_code(field, value)?,
            "score" => self.score = read_float(field, value)?,
            "skillCode" => self.skill_code = read_text(field, value)?,
            "conferringInstituteCode" => {
                self.conferring_institute_code = read_text(field, value)?;
            }
            "result" => self.result = read_code(field, value)?,
            "assessmentDate" => self.assessment_date = read_date(field, value)?,
            "trainingPartnerCode" => self.training_partner_code = read_text(field, value)?,
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checklist::default();
        checks.require_text(&self.run_id, "No course run ID specified");
        checks.require_text(&self.reference_number, "No course reference number specified");
        checks.require_text(&self.trainee_id, "No trainee ID specified");
        checks.require(&self.trainee_id_type, "No trainee ID type specified");
        checks.require_text(&self.trainee_full_name, "No trainee full name specified");
        checks.require(&self.result, "No assessment result specified");
        checks.require(&self.assessment_date, "No assessment date specified");
        checks.require_text(&self.training_partner_code, "No training partner code specified");
        checks.finish()
    }

    fn raw_payload(&self) -> Value {
        json!({
            "assessment": {
                "grade": self.grade,
                "score": self.score,
                "course": {
                    "runId": self.run_id,
                    "referenceNumber": self.reference_number
                },
                "result": self.result,
                "trainee": {
                    "id": self.trainee_id,
                    "idType": self.trainee_id_type,
                    "fullName": self.trainee_full_name
                },
                "skillCode": self.skill_code,
                "assessmentDate": self.assessment_date,
                "trainingPartner": {
                    "code": self.training_partner_code,
                    "uen": self.uen
                },
                "conferringInstitute": {
                    "code": self.conferring_institute_code
                }
            }
        })
    }
}

/// Detail fields an update may change. Each one is optional on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentDetails {
    pub trainee_full_name: Option<String>,
    pub grade: Option<Grade>,
    pub score: Option<f64>,
    pub skill_code: Option<String>,
    pub result: Option<AssessmentResult>,
    pub assessment_date: Option<NaiveDate>,
}

impl AssessmentDetails {
    pub fn is_empty(&self) -> bool {
        self.trainee_full_name.as_deref().map_or(true, str::is_empty)
            && self.grade.is_none()
            && self.score.is_none()
            && self.skill_code.as_deref().map_or(true, str::is_empty)
            && self.result.is_none()
            && self.assessment_date.is_none()
    }
}

/// Updates or voids an existing assessment, selected by `action`.
///
/// Detail fields survive a switch between actions; a void body simply never
/// carries them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateVoidAssessmentInfo {
    reference_number: Option<String>,
    action: Option<AssessmentAction>,
    details: AssessmentDetails,
}

impl UpdateVoidAssessmentInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference_number(&self) -> Option<&str> {
        self.reference_number.as_deref()
    }

    pub fn action(&self) -> Option<AssessmentAction> {
        self.action
    }

    pub fn is_update(&self) -> bool {
        self.action == Some(AssessmentAction::Update)
    }

    pub fn details(&self) -> &AssessmentDetails {
        &self.details
    }

    pub fn set_reference_number(&mut self, reference_number: impl Into<String>) {
        self.reference_number = Some(reference_number.into());
    }

    pub fn set_action(&mut self, action: AssessmentAction) {
        self.action = Some(action);
    }

    pub fn set_trainee_full_name(&mut self, full_name: impl Into<String>) {
        self.details.trainee_full_name = Some(full_name.into());
    }

    pub fn set_grade(&mut self, grade: Grade) {
        self.details.grade = Some(grade);
    }

    pub fn set_score(&mut self, score: f64) {
        self.details.score = Some(score);
    }

    pub fn set_skill_code(&mut self, skill_code: impl Into<String>) {
        self.details.skill_code = Some(skill_code.into());
    }

    pub fn set_result(&mut self, result: AssessmentResult) {
        self.details.result = Some(result);
    }

    pub fn set_assessment_date(&mut self, date: NaiveDate) {
        self.details.assessment_date = Some(date);
    }
}

impl RequestInfo for UpdateVoidAssessmentInfo {
    fn field_names(&self) -> &'static [&'static str] {
        UPDATE_VOID_FIELDS
    }

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), InvalidFieldError> {
        let details = &mut self.details;
        match field {
            "referenceNumber" => self.reference_number = read_text(field, value)?,
            "action" => self.action = read_code(field, value)?,
            "traineeFullName" => details.trainee_full_name = read_text(field, value)?,
            "grade" => details.grade = read_code(field, value)?,
            "score" => details.score = read_float(field, value)?,
            "skillCode" => details.skill_code = read_text(field, value)?,
            "result" => details.result = read_code(field, value)?,
            "assessmentDate" => details.assessment_date = read_date(field, value)?,
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checklist::default();
        checks.require_text(&self.reference_number, "No course reference number specified");
        checks.require(&self.action, "No action specified");
        if self.is_update() && self.details.is_empty() {
            checks.push("No assessment details specified for update");
        }
        checks.finish()
    }

    fn raw_payload(&self) -> Value {
        match self.action {
            Some(AssessmentAction::Void) => json!({
                "assessment": {
                    "action": AssessmentAction::Void
                }
            }),
            action => {
                let d = &self.details;
                json!({
                    "assessment": {
                        "grade": d.grade,
                        "score": d.score,
                        "action": action,
                        "result": d.result,
                        "trainee": {
                            "fullName": d.trainee_full_name
                        },
                        "skillCode": d.skill_code,
                        "assessmentDate": d.assessment_date
                    }
                })
            }
        }
    }
}
