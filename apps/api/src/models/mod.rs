//! Request models, one per SSG API call. Each collects typed fields, validates
//! completeness and renders the exact nested JSON body the API expects.

pub mod assessments;
pub mod attendance;
pub mod codes;

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::{InvalidFieldError, ValidationError};
use crate::payload::remove_null_fields;

pub use assessments::{CreateAssessmentInfo, UpdateVoidAssessmentInfo};
pub use attendance::UploadAttendanceInfo;

/// Common surface of every request model.
///
/// Models are created per interaction, filled field by field, then discarded once
/// the request has been sent.
pub trait RequestInfo {
    /// Field names accepted by [`RequestInfo::set_field`], in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Sets one field from untyped form input. On error the model is unchanged.
    /// `null` clears the field.
    fn set_field(&mut self, field: &str, value: &Value) -> Result<(), InvalidFieldError>;

    /// Checks every field the API requires. Never mutates; reports all problems at once
    /// in field-declaration order.
    fn validate(&self) -> Result<(), ValidationError>;

    /// The full body before pruning, with unset fields as `null`.
    fn raw_payload(&self) -> Value;

    /// The request body with empty fields pruned, validated first when `verify` is set.
    fn payload(&self, verify: bool) -> Result<Value, ValidationError> {
        if verify {
            self.validate()?;
        }
        Ok(remove_null_fields(&self.raw_payload()))
    }

    /// [`RequestInfo::payload`] serialized to a JSON string.
    fn payload_json(&self, verify: bool) -> Result<String, ValidationError> {
        self.payload(verify).map(|p| p.to_string())
    }

    /// Applies every entry of a form. If any entry is invalid none of them are
    /// applied.
    fn apply_fields(&mut self, fields: &Map<String, Value>) -> Result<(), InvalidFieldError>
    where
        Self: Clone,
    {
        let mut scratch = self.clone();
        for (name, value) in fields {
            scratch.set_field(name, value)?;
        }
        *self = scratch;
        Ok(())
    }
}

/// Collects validation messages in the order fields are checked.
#[derive(Debug, Default)]
pub(crate) struct Checklist(Vec<String>);

impl Checklist {
    pub(crate) fn require_text(&mut self, value: &Option<String>, message: &str) {
        if value.as_deref().map_or(true, str::is_empty) {
            self.0.push(message.to_string());
        }
    }

    pub(crate) fn require<T>(&mut self, value: &Option<T>, message: &str) {
        if value.is_none() {
            self.0.push(message.to_string());
        }
    }

    pub(crate) fn push(&mut self, message: &str) {
        self.0.push(message.to_string());
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors: self.0 })
        }
    }
}

// Form value readers. `Ok(None)` means the caller sent `null`.

pub(crate) fn read_text(field: &str, value: &Value) -> Result<Option<String>, InvalidFieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(mismatch(field, "a string", other)),
    }
}

pub(crate) fn read_integer(field: &str, value: &Value) -> Result<Option<i64>, InvalidFieldError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| mismatch(field, "an integer", value)),
        other => Err(mismatch(field, "an integer", other)),
    }
}

pub(crate) fn read_float(field: &str, value: &Value) -> Result<Option<f64>, InvalidFieldError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| mismatch(field, "a number", value)),
        other => Err(mismatch(field, "a number", other)),
    }
}

pub(crate) fn read_code<T>(field: &str, value: &Value) -> Result<Option<T>, InvalidFieldError>
where
    T: FromStr<Err = InvalidFieldError>,
{
    match read_text(field, value)? {
        None => Ok(None),
        Some(code) => code
            .parse()
            .map(Some)
            .map_err(|e: InvalidFieldError| InvalidFieldError { field: field.to_string(), ..e }),
    }
}

pub(crate) fn read_date(field: &str, value: &Value) -> Result<Option<NaiveDate>, InvalidFieldError> {
    match read_text(field, value)? {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map(Some).map_err(|_| {
            InvalidFieldError::new(field, "a date (YYYY-MM-DD)", format!("got '{s}'"))
        }),
    }
}

pub(crate) fn unknown_field(field: &str) -> InvalidFieldError {
    InvalidFieldError::new(field, "a known field name", "no such field on this request")
}

fn mismatch(field: &str, expected: &'static str, got: &Value) -> InvalidFieldError {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a decimal number",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    InvalidFieldError::new(field, expected, format!("got {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::codes::Grade;

    #[test]
    fn test_read_text_rejects_number() {
        let err = read_text("name", &json!(5)).unwrap_err();
        assert_eq!(err.field, "name");
        assert!(err.reason.contains("integer"));
    }

    #[test]
    fn test_read_integer_rejects_string_and_decimal() {
        assert!(read_integer("countryCode", &json!("65")).is_err());
        assert!(read_integer("countryCode", &json!(6.5)).is_err());
        assert_eq!(read_integer("countryCode", &json!(65)).unwrap(), Some(65));
    }

    #[test]
    fn test_read_float_accepts_integers() {
        assert_eq!(read_float("score", &json!(80)).unwrap(), Some(80.0));
        assert_eq!(read_float("score", &json!(72.5)).unwrap(), Some(72.5));
        assert!(read_float("score", &json!("80")).is_err());
    }

    #[test]
    fn test_null_clears() {
        assert_eq!(read_text("x", &Value::Null).unwrap(), None);
        assert_eq!(read_float("x", &Value::Null).unwrap(), None);
    }

    #[test]
    fn test_read_code_reports_form_field_name() {
        let err = read_code::<Grade>("grade", &json!("Z")).unwrap_err();
        assert_eq!(err.field, "grade");
        assert_eq!(read_code::<Grade>("grade", &json!("A")).unwrap(), Some(Grade::A));
    }

    #[test]
    fn test_read_date() {
        assert_eq!(
            read_date("assessmentDate", &json!("2024-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(read_date("assessmentDate", &json!("01/03/2024")).is_err());
    }

    #[test]
    fn test_checklist_keeps_order() {
        let mut c = Checklist::default();
        c.require_text(&None, "first");
        c.require_text(&Some(String::new()), "second");
        c.require_text(&Some("ok".into()), "never");
        c.require::<i64>(&None, "third");
        assert_eq!(c.finish().unwrap_err().errors, vec!["first", "second", "third"]);
    }
}
