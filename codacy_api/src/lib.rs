//! Client for the Codacy API v3 with classified errors.
//!
//! Every request runs through a pipeline of stages topped by an error
//! policy. Callers get either the decoded model or one [`Error`] whose
//! [`ErrorKind`] says what happened:
//!
//! ```no_run
//! use codacy_api::{Client, ClientOptions, ErrorKind};
//! use codacy_api::types::Provider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientOptions::default().with_api_token("token"))?;
//! match client.get_repository(Provider::GitHub, "codacy", "docs").await {
//!     Ok(repo) => println!("{}", repo.data.display_path()),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such repository"),
//!     Err(e) if e.kind().is_transport() => println!("API unreachable: {}", e),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod errors;
pub mod pipeline;
mod query;
pub mod types;
pub use self::client::{Client, ClientOptions, ConfigError, DEFAULT_BASE_URL};
pub use self::errors::{Error, ErrorKind, TransportError, TransportErrorCode};
pub use self::query::{CursorQuery, NoQuery, Query, MAX_LIMIT};
pub use tokio_util::sync::CancellationToken;
