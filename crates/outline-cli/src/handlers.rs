//! Command handlers for CLI subcommands
//!
//! Each resource gets its own module; shared plumbing lives in `utils`.

mod auth;
mod collections;
mod completions;
mod config;
mod docs;
mod utils;

pub use auth::handle_auth;
pub use collections::handle_collections;
pub use completions::handle_completions;
pub use config::handle_config;
pub use docs::handle_docs;
pub use utils::Session;
