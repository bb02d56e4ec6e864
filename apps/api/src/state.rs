use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::errors::AppError;
use crate::session::Session;
use crate::ssg_client::SsgClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The loaded session, replaced wholesale on every successful upload. Replacing it
    /// drops the previous session and with it any uploaded temp files.
    pub session: Arc<RwLock<Option<Arc<Session>>>>,
}

impl AppState {
    pub fn new(config: Config, session: Option<Session>) -> Self {
        Self {
            config,
            session: Arc::new(RwLock::new(session.map(Arc::new))),
        }
    }

    pub async fn current_session(&self) -> Result<Arc<Session>, AppError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(AppError::SessionRequired)
    }

    pub async fn replace_session(&self, session: Session) {
        *self.session.write().await = Some(Arc::new(session));
    }

    /// A client authenticated as the current session, for preview or sending.
    pub async fn client(&self) -> Result<(Arc<Session>, SsgClient), AppError> {
        let session = self.current_session().await?;
        let client = SsgClient::for_session(
            &session,
            self.config.base_url.clone(),
            self.config.request_timeout,
        )?;
        Ok((session, client))
    }
}
