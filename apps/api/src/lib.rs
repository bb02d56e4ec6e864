//! SSG API demo service: session credentials, request models, executors and the
//! HTTP surface that previews and sends them.

pub mod config;
pub mod errors;
pub mod executors;
pub mod models;
pub mod payload;
pub mod routes;
pub mod session;
pub mod ssg_client;
pub mod state;
pub mod verify;

#[cfg(test)]
mod test_support;

pub use errors::{AppError, InvalidFieldError, ValidationError};
pub use executors::Executor;
pub use models::RequestInfo;
pub use session::{ClientCredentials, Session};
