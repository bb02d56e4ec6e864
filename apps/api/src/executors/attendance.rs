use std::fmt;

use reqwest::Method;

use crate::errors::ValidationError;
use crate::executors::{path_segment, Executor};
use crate::models::{RequestInfo, UploadAttendanceInfo};
use crate::ssg_client::{ApiError, PreparedRequest, SsgClient};

/// POST /courses/runs/{runId}/sessions/attendance
pub struct UploadAttendance {
    client: SsgClient,
    run_id: String,
    info: UploadAttendanceInfo,
}

impl UploadAttendance {
    pub fn new(client: SsgClient, run_id: impl Into<String>, info: UploadAttendanceInfo) -> Self {
        Self {
            client,
            run_id: run_id.into(),
            info,
        }
    }

    fn path(&self) -> String {
        format!(
            "/courses/runs/{}/sessions/attendance",
            path_segment(Some(&self.run_id), "runId")
        )
    }
}

impl Executor for UploadAttendance {
    fn client(&self) -> &SsgClient {
        &self.client
    }

    fn prepare(&self, verify: bool) -> Result<PreparedRequest, ApiError> {
        if verify {
            let mut errors = Vec::new();
            if self.run_id.is_empty() {
                errors.push("No course run ID specified".to_string());
            }
            if let Err(e) = self.info.validate() {
                errors.extend(e.errors);
            }
            if !errors.is_empty() {
                return Err(ValidationError { errors }.into());
            }
        }
        let body = self.info.payload(false)?;
        Ok(self.client.prepare(Method::POST, &self.path(), Some(body)))
    }
}

impl fmt::Display for UploadAttendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prepare(false) {
            Ok(request) => write!(f, "{request}"),
            Err(_) => Err(fmt::Error),
        }
    }
}
