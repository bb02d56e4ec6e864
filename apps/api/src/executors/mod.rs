//! One executor per SSG API operation. Each wraps a filled request model, knows the
//! method and path of its call and sends it through the shared `SsgClient`.

pub mod assessments;
pub mod attendance;

use async_trait::async_trait;
use serde_json::Value;

use crate::ssg_client::{ApiError, PreparedRequest, SsgClient};

pub use assessments::{CreateAssessment, UpdateVoidAssessment, ViewAssessment};
pub use attendance::UploadAttendance;

#[async_trait]
pub trait Executor: Send + Sync {
    fn client(&self) -> &SsgClient;

    /// Assembles the pending request without any network I/O. With `verify` set the
    /// model is validated first and an incomplete one is refused.
    fn prepare(&self, verify: bool) -> Result<PreparedRequest, ApiError>;

    /// Sends the request once and returns the parsed response body.
    async fn execute(&self) -> Result<Value, ApiError> {
        let request = self.prepare(true)?;
        self.client().send(&request).await
    }
}

/// Percent-encodes one path segment; empty segments keep a readable placeholder so
/// previews of incomplete forms still show where the value goes.
pub(crate) fn path_segment(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => urlencoding::encode(v).into_owned(),
        _ => format!("{{{placeholder}}}"),
    }
}
