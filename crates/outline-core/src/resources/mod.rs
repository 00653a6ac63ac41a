//! Resource facades over the request engine
//!
//! Each facade is a thin, stateless view: it assembles the request body for
//! one endpoint, calls [`RequestEngine::request`](crate::http::RequestEngine::request)
//! and hands the envelope back untouched. Facades share one engine through
//! an `Arc` and are cheap to clone.

use serde_json::Value;

pub mod auth;
pub mod collections;
pub mod documents;

pub use auth::AuthApi;
pub use collections::{CollectionLister, CollectionsApi};
pub use documents::{DocumentLister, DocumentsApi};

/// Add one field to a JSON object body; other values are replaced by a
/// single-field object
pub(crate) fn with_field(body: Value, key: &str, value: Value) -> Value {
    let mut fields = match body {
        Value::Object(fields) => fields,
        _ => serde_json::Map::new(),
    };
    fields.insert(key.to_string(), value);
    Value::Object(fields)
}
