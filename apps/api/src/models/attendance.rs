use std::fmt;

use serde_json::{json, Value};

use crate::errors::{InvalidFieldError, ValidationError};
use crate::models::codes::{AttendanceStatus, SurveyLanguage, TraineeIdType};
use crate::models::{
    read_code, read_float, read_integer, read_text, unknown_field, Checklist, RequestInfo,
};
use crate::payload::remove_null_fields;

const FIELDS: &[&str] = &[
    "sessionID",
    "statusCode",
    "traineeId",
    "traineeName",
    "traineeEmail",
    "traineeIdType",
    "mobile",
    "areaCode",
    "countryCode",
    "numberOfHours",
    "surveyLanguage",
    "referenceNumber",
    "corppassId",
];

/// Attendance of one trainee for one course session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadAttendanceInfo {
    uen: String,
    session_id: Option<String>,
    status: Option<AttendanceStatus>,
    trainee_id: Option<String>,
    trainee_name: Option<String>,
    trainee_email: Option<String>,
    trainee_id_type: Option<TraineeIdType>,
    mobile: Option<String>,
    area_code: Option<i64>,
    country_code: Option<i64>,
    number_of_hours: Option<f64>,
    survey_language: Option<SurveyLanguage>,
    reference_number: Option<String>,
    corppass_id: Option<String>,
}

impl UploadAttendanceInfo {
    /// `uen` is the training provider's UEN from the loaded session.
    pub fn new(uen: impl Into<String>) -> Self {
        Self {
            uen: uen.into(),
            ..Self::default()
        }
    }

    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
    }

    pub fn set_status(&mut self, status: AttendanceStatus) {
        self.status = Some(status);
    }

    pub fn set_trainee_id(&mut self, trainee_id: impl Into<String>) {
        self.trainee_id = Some(trainee_id.into());
    }

    pub fn set_trainee_name(&mut self, trainee_name: impl Into<String>) {
        self.trainee_name = Some(trainee_name.into());
    }

    pub fn set_trainee_email(&mut self, trainee_email: impl Into<String>) {
        self.trainee_email = Some(trainee_email.into());
    }

    pub fn set_trainee_id_type(&mut self, id_type: TraineeIdType) {
        self.trainee_id_type = Some(id_type);
    }

    pub fn set_mobile(&mut self, mobile: impl Into<String>) {
        self.mobile = Some(mobile.into());
    }

    pub fn set_area_code(&mut self, area_code: i64) {
        self.area_code = Some(area_code);
    }

    pub fn set_country_code(&mut self, country_code: i64) {
        self.country_code = Some(country_code);
    }

    pub fn set_number_of_hours(&mut self, hours: f64) {
        self.number_of_hours = Some(hours);
    }

    pub fn set_survey_language(&mut self, language: SurveyLanguage) {
        self.survey_language = Some(language);
    }

    pub fn set_reference_number(&mut self, reference_number: impl Into<String>) {
        self.reference_number = Some(reference_number.into());
    }

    pub fn set_corppass_id(&mut self, corppass_id: impl Into<String>) {
        self.corppass_id = Some(corppass_id.into());
    }
}

impl RequestInfo for UploadAttendanceInfo {
    fn field_names(&self) -> &'static [&'static str] {
        FIELDS
    }

    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), InvalidFieldError> {
        match field {
            "sessionID" => self.session_id = read_text(field, value)?,
            "statusCode" => self.status = read_code(field, value)?,
            "traineeId" => self.trainee_id = read_text(field, value)?,
            "traineeName" => self.trainee_name = read_text(field, value)?,
            "traineeEmail" => self.trainee_email = read_text(field, value)?,
            "traineeIdType" => self.trainee_id_type = read_code(field, value)?,
            "mobile" => self.mobile = read_text(field, value)?,
            "areaCode" => self.area_code = read_integer(field, value)?,
            "countryCode" => self.country_code = read_integer(field, value)?,
            "numberOfHours" => self.number_of_hours = read_float(field, value)?,
            "surveyLanguage" => self.survey_language = read_code(field, value)?,
            "referenceNumber" => self.reference_number = read_text(field, value)?,
            "corppassId" => self.corppass_id = read_text(field, value)?,
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checklist::default();
        checks.require_text(&self.session_id, "No session ID specified");
        checks.require_text(&self.trainee_id, "No trainee ID specified");
        checks.require_text(&self.trainee_name, "No trainee name specified");
        checks.require_text(&self.trainee_email, "No trainee email specified");
        checks.require(&self.trainee_id_type, "No trainee ID type specified");
        checks.require_text(&self.mobile, "No mobile number specified");
        checks.require(&self.country_code, "No country code specified");
        checks.require(&self.survey_language, "No survey language specified");
        checks.require_text(&self.reference_number, "No reference number specified");
        checks.require_text(&self.corppass_id, "No Corppass ID specified");
        checks.finish()
    }

    fn raw_payload(&self) -> Value {
        json!({
            "uen": self.uen,
            "course": {
                "sessionID": self.session_id,
                "attendance": {
                    "status": {
                        "code": self.status
                    },
                    "trainee": {
                        "id": self.trainee_id,
                        "name": self.trainee_name,
                        "email": self.trainee_email,
                        "idType": {
                            "code": self.trainee_id_type
                        },
                        "contactNumber": {
                            "mobile": self.mobile,
                            "areaCode": self.area_code,
                            "countryCode": self.country_code
                        },
                        "numberOfHours": self.number_of_hours,
                        "surveyLanguage": {
                            "code": self.survey_language
                        }
                    }
                },
                "referenceNumber": self.reference_number
            },
            "corppassId": self.corppass_id
        })
    }
}

impl fmt::Display for UploadAttendanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", remove_null_fields(&self.raw_payload()))
    }
}
