pub mod assessments;
pub mod attendance;
pub mod codes;
pub mod health;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::executors::Executor;
use crate::ssg_client::ApiError;
use crate::state::AppState;

/// Form fields keyed by API field name, e.g. `{"fields": {"countryCode": 65}}`.
#[derive(Debug, Default, Deserialize)]
pub struct FieldsForm {
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// What the caller sees before pressing send. Produced without network I/O.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub errors: Vec<String>,
    pub payload: Value,
    pub request: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub request: String,
    pub response: Value,
}

pub(crate) fn preview(executor: &dyn Executor) -> Result<PreviewResponse, AppError> {
    let errors = match executor.prepare(true) {
        Ok(_) => Vec::new(),
        Err(ApiError::Validation(e)) => e.errors,
        Err(e) => return Err(e.into()),
    };
    let request = executor.prepare(false)?;
    Ok(PreviewResponse {
        errors,
        payload: request.body.clone().unwrap_or(Value::Null),
        request: request.to_string(),
    })
}

pub(crate) async fn send(executor: &dyn Executor) -> Result<SendResponse, AppError> {
    let request = executor.prepare(true)?.to_string();
    let response = executor.execute().await?;
    Ok(SendResponse { request, response })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/session",
            get(session::handle_get_session).post(session::handle_load_session),
        )
        .route("/api/v1/codes", get(codes::handle_codes))
        .route("/api/v1/forms", get(codes::handle_forms))
        // Attendance
        .route(
            "/api/v1/attendance/preview",
            post(attendance::handle_preview),
        )
        .route("/api/v1/attendance/send", post(attendance::handle_send))
        // Assessments
        .route(
            "/api/v1/assessments/preview",
            post(assessments::handle_create_preview),
        )
        .route(
            "/api/v1/assessments/send",
            post(assessments::handle_create_send),
        )
        .route(
            "/api/v1/assessments/update-void/preview",
            post(assessments::handle_update_void_preview),
        )
        .route(
            "/api/v1/assessments/update-void/send",
            post(assessments::handle_update_void_send),
        )
        .route(
            "/api/v1/assessments/:reference",
            get(assessments::handle_view),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::session::{ClientCredentials, Session};
    use crate::test_support::spawn_stub;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

    fn state(base_url: &str, with_session: bool) -> AppState {
        let config = Config::from_lookup(|k| match k {
            "SSG_BASE_URL" => Some(base_url.to_string()),
            _ => None,
        })
        .unwrap();
        let session = with_session.then(|| {
            let credentials = ClientCredentials::from_paths(
                format!("{FIXTURES}/cert.pem"),
                format!("{FIXTURES}/key.pem"),
            );
            Session::load("T01AB2345C", &STANDARD.encode([7u8; 32]), credentials).unwrap()
        });
        AppState::new(config, session)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    const BOUNDARY: &str = "ssg-session-upload";

    async fn upload(app: Router, parts: &[(&str, &[u8])]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for (name, data) in parts {
            let header = format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            );
            body.extend_from_slice(header.as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/session")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn fixture(name: &str) -> Vec<u8> {
        std::fs::read(format!("{FIXTURES}/{name}")).unwrap()
    }

    #[tokio::test]
    async fn test_session_upload_replaces_session() {
        let app = build_router(state("http://127.0.0.1:9", false));
        let key = STANDARD.encode([9u8; 32]);
        let (cert, pem) = (fixture("cert.pem"), fixture("key.pem"));

        let (status, first) = upload(
            app.clone(),
            &[
                ("uen", b"T01AB2345C".as_slice()),
                ("encryption_key", key.as_bytes()),
                ("cert", cert.as_slice()),
                ("key", pem.as_slice()),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["uen"], "T01AB2345C");
        let first_cert = std::path::PathBuf::from(first["cert_path"].as_str().unwrap());
        assert!(first_cert.exists());

        let (status, _) = upload(
            app.clone(),
            &[
                ("uen", b"123456789Z".as_slice()),
                ("encryption_key", key.as_bytes()),
                ("cert", cert.as_slice()),
                ("key", pem.as_slice()),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!first_cert.exists());

        let (status, body) = call(app, "GET", "/api/v1/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["uen"], "123456789Z");
    }

    #[tokio::test]
    async fn test_session_upload_missing_key_part() {
        let app = build_router(state("http://127.0.0.1:9", false));
        let key = STANDARD.encode([9u8; 32]);
        let cert = fixture("cert.pem");
        let (status, body) = upload(
            app.clone(),
            &[
                ("uen", b"T01AB2345C".as_slice()),
                ("encryption_key", key.as_bytes()),
                ("cert", cert.as_slice()),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert!(body["error"]["message"].as_str().unwrap().contains("'key'"));

        let (status, _) = call(app, "GET", "/api/v1/session", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_upload_mismatched_pair() {
        let app = build_router(state("http://127.0.0.1:9", true));
        let key = STANDARD.encode([9u8; 32]);
        let (cert, other) = (fixture("cert.pem"), fixture("other_key.pem"));
        let (status, body) = upload(
            app.clone(),
            &[
                ("uen", b"123456789Z".as_slice()),
                ("encryption_key", key.as_bytes()),
                ("cert", cert.as_slice()),
                ("key", other.as_slice()),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "SESSION_ERROR");

        // the session loaded before the rejected upload stays in place
        let (_, body) = call(app, "GET", "/api/v1/session", None).await;
        assert_eq!(body["uen"], "T01AB2345C");
    }

    #[tokio::test]
    async fn test_health_reports_session_state() {
        let app = build_router(state("http://127.0.0.1:9", false));
        let (status, body) = call(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_loaded"], false);
    }

    #[tokio::test]
    async fn test_codes_and_forms_need_no_session() {
        let app = build_router(state("http://127.0.0.1:9", false));
        let (status, body) = call(app.clone(), "GET", "/api/v1/codes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attendanceStatus"][3], json!({"code": "4", "label": "TP Voided"}));
        assert_eq!(body["action"].as_array().unwrap().len(), 2);

        let (status, body) = call(app, "GET", "/api/v1/forms", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attendance"][0], "sessionID");
        assert_eq!(body["updateVoid"][1], "action");
    }

    #[tokio::test]
    async fn test_preview_requires_session() {
        let app = build_router(state("http://127.0.0.1:9", false));
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/attendance/preview",
            Some(json!({"runId": "10026", "fields": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "SESSION_REQUIRED");
    }

    #[tokio::test]
    async fn test_get_session_summary() {
        let app = build_router(state("http://127.0.0.1:9", true));
        let (status, body) = call(app, "GET", "/api/v1/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["uen"], "T01AB2345C");
        assert!(body["encryption_key"].as_str().unwrap().starts_with("****"));
    }

    #[tokio::test]
    async fn test_attendance_preview_lists_missing_fields() {
        let app = build_router(state("https://uat-api.ssg-wsg.sg", true));
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/attendance/preview",
            Some(json!({"fields": {"sessionID": "TGS-1", "countryCode": 65}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errors"][0], "No course run ID specified");
        assert!(!body["errors"]
            .as_array()
            .unwrap()
            .contains(&json!("No session ID specified")));
        assert_eq!(body["payload"]["uen"], "T01AB2345C");
        assert_eq!(body["payload"]["course"]["sessionID"], "TGS-1");
        assert!(body["request"]
            .as_str()
            .unwrap()
            .contains("/courses/runs/{runId}/sessions/attendance"));
    }

    #[tokio::test]
    async fn test_preview_rejects_mistyped_field() {
        let app = build_router(state("https://uat-api.ssg-wsg.sg", true));
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/attendance/preview",
            Some(json!({"runId": "10026", "fields": {"countryCode": "sixty-five"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "InvalidFieldError");
    }

    #[tokio::test]
    async fn test_send_refuses_incomplete_form() {
        let app = build_router(state("http://127.0.0.1:9", true));
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/assessments/send",
            Some(json!({"fields": {"runId": "10026"}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "ValidationError");
        assert!(!body["error"]["errors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_void_send_reaches_remote() {
        let remote = spawn_stub(Router::new().route(
            "/tpg/assessments/details/:reference",
            post(|axum::Json(body): axum::Json<Value>| async move {
                axum::Json(json!({"status": 200, "echo": body}))
            }),
        ))
        .await;
        let app = build_router(state(&remote, true));
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/assessments/update-void/send",
            Some(json!({"fields": {"referenceNumber": "ASM-1", "action": "void"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"]["echo"], json!({"assessment": {"action": "void"}}));
        assert!(body["request"].as_str().unwrap().starts_with("POST "));
    }

    #[tokio::test]
    async fn test_view_surfaces_remote_error() {
        let remote = spawn_stub(Router::new().route(
            "/tpg/assessments/details/:reference",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    axum::Json(json!({"error": {"message": "Assessment not found"}})),
                )
            }),
        ))
        .await;
        let app = build_router(state(&remote, true));
        let (status, body) = call(app, "GET", "/api/v1/assessments/ASM-404", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "RemoteAPIError");
        assert_eq!(body["error"]["status"], 404);
    }
}
