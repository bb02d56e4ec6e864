use std::fmt;

use reqwest::Method;

use crate::errors::ValidationError;
use crate::executors::{path_segment, Executor};
use crate::models::{CreateAssessmentInfo, RequestInfo, UpdateVoidAssessmentInfo};
use crate::ssg_client::{ApiError, PreparedRequest, SsgClient};

/// POST /tpg/assessments
pub struct CreateAssessment {
    client: SsgClient,
    info: CreateAssessmentInfo,
}

impl CreateAssessment {
    pub fn new(client: SsgClient, info: CreateAssessmentInfo) -> Self {
        Self { client, info }
    }
}

impl Executor for CreateAssessment {
    fn client(&self) -> &SsgClient {
        &self.client
    }

    fn prepare(&self, verify: bool) -> Result<PreparedRequest, ApiError> {
        let body = self.info.payload(verify)?;
        Ok(self.client.prepare(Method::POST, "/tpg/assessments", Some(body)))
    }
}

/// POST /tpg/assessments/details/{referenceNumber}
pub struct UpdateVoidAssessment {
    client: SsgClient,
    info: UpdateVoidAssessmentInfo,
}

impl UpdateVoidAssessment {
    pub fn new(client: SsgClient, info: UpdateVoidAssessmentInfo) -> Self {
        Self { client, info }
    }
}

impl Executor for UpdateVoidAssessment {
    fn client(&self) -> &SsgClient {
        &self.client
    }

    fn prepare(&self, verify: bool) -> Result<PreparedRequest, ApiError> {
        let body = self.info.payload(verify)?;
        let path = format!(
            "/tpg/assessments/details/{}",
            path_segment(self.info.reference_number(), "referenceNumber")
        );
        Ok(self.client.prepare(Method::POST, &path, Some(body)))
    }
}

/// GET /tpg/assessments/details/{referenceNumber}
pub struct ViewAssessment {
    client: SsgClient,
    reference_number: String,
}

impl ViewAssessment {
    pub fn new(client: SsgClient, reference_number: impl Into<String>) -> Self {
        Self {
            client,
            reference_number: reference_number.into(),
        }
    }
}

impl Executor for ViewAssessment {
    fn client(&self) -> &SsgClient {
        &self.client
    }

    fn prepare(&self, verify: bool) -> Result<PreparedRequest, ApiError> {
        let reference = self.reference_number.trim();
        if verify && reference.is_empty() {
            return Err(ValidationError {
                errors: vec!["No assessment reference number specified".to_string()],
            }
            .into());
        }
        let path = format!(
            "/tpg/assessments/details/{}",
            path_segment(Some(reference), "referenceNumber")
        );
        Ok(self.client.prepare(Method::GET, &path, None))
    }
}

macro_rules! display_via_prepare {
    ($($executor:ty),+) => {
        $(
            impl fmt::Display for $executor {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match self.prepare(false) {
                        Ok(request) => write!(f, "{request}"),
                        Err(_) => Err(fmt::Error),
                    }
                }
            }
        )+
    };
}

display_via_prepare!(CreateAssessment, UpdateVoidAssessment, ViewAssessment);
