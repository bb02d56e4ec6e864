//! Per-user session context: the organisation's UEN, its encryption key and the
//! client certificate pair used for every SSG call.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{error, info};

use crate::verify::{verify_aes_encryption_key, verify_cert_private_key, verify_uen};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid UEN provided")]
    InvalidUen,

    #[error("Invalid AES-256 encryption key provided")]
    InvalidEncryptionKey,

    #[error("Certificate and private key do not match, or either could not be parsed")]
    CertificateMismatch,

    #[error("Could not store uploaded credentials: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the PEM certificate and private key live.
///
/// Uploaded credentials are held in temp files owned by this value; dropping it
/// deletes them.
#[derive(Debug)]
pub enum ClientCredentials {
    Files {
        cert_path: PathBuf,
        key_path: PathBuf,
    },
    Uploaded {
        cert: NamedTempFile,
        key: NamedTempFile,
    },
}

impl ClientCredentials {
    pub fn from_paths(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        ClientCredentials::Files {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }

    /// Writes uploaded PEM bytes to temp files so they can be handed to the TLS stack
    /// by path.
    pub fn from_uploads(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, SessionError> {
        Ok(ClientCredentials::Uploaded {
            cert: write_temp_pem(cert_pem)?,
            key: write_temp_pem(key_pem)?,
        })
    }

    pub fn cert_path(&self) -> &Path {
        match self {
            ClientCredentials::Files { cert_path, .. } => cert_path,
            ClientCredentials::Uploaded { cert, .. } => cert.path(),
        }
    }

    pub fn key_path(&self) -> &Path {
        match self {
            ClientCredentials::Files { key_path, .. } => key_path,
            ClientCredentials::Uploaded { key, .. } => key.path(),
        }
    }
}

fn write_temp_pem(bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("ssg-")
        .suffix(".pem")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

/// A verified set of credentials. Only constructed through [`Session::load`].
pub struct Session {
    uen: String,
    encryption_key: String,
    credentials: ClientCredentials,
}

/// Display-safe view of a session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub uen: String,
    pub encryption_key: String,
    pub cert_path: String,
    pub key_path: String,
}

impl Session {
    /// Runs every gate in order (UEN, encryption key, certificate pair) and keeps
    /// the credentials only if all pass. On failure the credentials are dropped,
    /// which removes any uploaded temp files.
    pub fn load(
        uen: &str,
        encryption_key: &str,
        credentials: ClientCredentials,
    ) -> Result<Self, SessionError> {
        info!("Loading session configuration...");

        if !verify_uen(uen) {
            error!("Invalid UEN provided");
            return Err(SessionError::InvalidUen);
        }
        if !verify_aes_encryption_key(encryption_key) {
            error!("Invalid AES-256 encryption key provided");
            return Err(SessionError::InvalidEncryptionKey);
        }

        info!("Verifying certificate and private key...");
        if !verify_cert_private_key(credentials.cert_path(), credentials.key_path()) {
            error!("Certificate and private key are not a valid pair");
            return Err(SessionError::CertificateMismatch);
        }

        // verify_uen only admits upper-case UENs, so the value is already canonical
        info!("Session loaded for UEN {uen}");
        Ok(Self {
            uen: uen.to_string(),
            encryption_key: encryption_key.trim().to_string(),
            credentials,
        })
    }

    pub fn uen(&self) -> &str {
        &self.uen
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            uen: self.uen.clone(),
            encryption_key: mask(&self.encryption_key),
            cert_path: self.credentials.cert_path().display().to_string(),
            key_path: self.credentials.key_path().display().to_string(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uen", &self.uen)
            .field("encryption_key", &mask(&self.encryption_key))
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Keeps the last four characters.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{visible}")
}
