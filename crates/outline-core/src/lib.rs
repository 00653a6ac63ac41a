//! Outline Core - typed client for the Outline document API
//!
//! This crate wraps Outline's RPC-style HTTP API (every call is a POST to
//! `{base_url}/{resource}.{action}`) behind typed resource facades.
//!
//! # Main Components
//!
//! - **Request Engine**: authentication headers, per-attempt timeouts and
//!   exponential-backoff retries over a pluggable [`Transport`]
//! - **Error Handling**: classified [`ApiError`]s for server answers and
//!   [`TransportError`]s for everything below the HTTP layer
//! - **Pagination**: lazy [`Paginator`] cursors over list endpoints
//! - **Resources**: documents, collections and auth facades
//! - **Configuration**: [`ClientConfig`] and a layered resolver
//!
//! # Example
//!
//! ```no_run
//! use outline_core::{ClientConfig, DocumentListOptions, OutlineClient, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = OutlineClient::new(
//!         ClientConfig::new("ol_api_...").with_api_url("https://wiki.example.com/api"),
//!     )?;
//!
//!     let mut documents = client.documents.iterate(DocumentListOptions::default());
//!     while let Some(document) = documents.next().await {
//!         println!("{}", document?.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod resources;
pub mod types;

// Re-export main types for convenience
pub use client::OutlineClient;
pub use config::{resolve, ClientConfig, ConfigLayer, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use http::{
    ApiError, ErrorCategory, Method, RequestEngine, RequestOptions, ReqwestTransport, RetryPolicy,
    RetryState, Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
pub use pagination::{ListOperation, Paginator, PAGE_LIMIT};
pub use resources::{AuthApi, CollectionsApi, DocumentsApi};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
