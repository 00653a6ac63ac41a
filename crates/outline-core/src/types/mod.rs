//! Wire types for the Outline API
//!
//! The envelope and option types are shared by every resource; entity
//! records live in the per-resource submodules. Entities are opaque to the
//! request engine: they are only (de)serialized, never validated.

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod collection;
pub mod document;

pub use auth::{ApiKey, AuthInfo, Team, User, UserRole};
pub use collection::{
    Collection, CollectionDocument, CollectionExportFormat, CollectionGroup,
    CollectionMembership, CreateCollectionData, Permission, Sort, SortDirection, SortField,
    UpdateCollectionData,
};
pub use document::{
    CreateDocumentData, Document, DocumentExport, DocumentListOptions, DocumentSearchResult,
    DocumentSort, ExportFormat, MoveDocumentData, UpdateDocumentData,
};

/// Successful response envelope returned by every API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Success flag reported by the server
    pub ok: bool,
    /// Typed payload; a missing field is `None` without requiring `T: Default`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error identifier, only present on failed envelopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Pagination descriptor for list-shaped operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// HTTP status code, filled in by the request engine
    #[serde(default)]
    pub status: u16,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, discarding the envelope
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Pagination descriptor reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Sort direction for list operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

/// Offset/limit options accepted by list operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl PaginationOptions {
    pub fn page(offset: u32, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            ..Default::default()
        }
    }
}

/// Time window for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    Day,
    Week,
    Month,
    Year,
}

/// Options for full-text document search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(flatten)]
    pub pagination: PaginationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_drafts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<DateFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<bool>,
}

/// Lightweight reference to a user embedded in other records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReference {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_without_optional_fields() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(envelope.ok);
        assert!(envelope.data.is_none());
        assert!(envelope.pagination.is_none());
        assert_eq!(envelope.status, 0);
    }

    #[test]
    fn test_envelope_payload_without_default_impl() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Record {
            id: String,
        }

        let envelope: ApiResponse<Record> =
            serde_json::from_value(json!({ "ok": true, "data": { "id": "r1" } })).unwrap();
        assert_eq!(envelope.data, Some(Record { id: "r1".to_string() }));

        let empty: ApiResponse<Record> = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(empty.data.is_none());
    }

    #[test]
    fn test_envelope_with_pagination() {
        let envelope: ApiResponse<Vec<u32>> = serde_json::from_value(json!({
            "ok": true,
            "data": [1, 2, 3],
            "pagination": { "offset": 0, "limit": 25, "nextPath": "/api/documents.list?offset=25" }
        }))
        .unwrap();

        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
        let pagination = envelope.pagination.unwrap();
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.next_path.as_deref(), Some("/api/documents.list?offset=25"));
        assert!(pagination.total.is_none());
    }

    #[test]
    fn test_search_options_flatten_pagination() {
        let options = SearchOptions {
            pagination: PaginationOptions::page(25, 10),
            collection_id: Some("col-1".to_string()),
            date_filter: Some(DateFilter::Week),
            ..Default::default()
        };

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(
            value,
            json!({ "offset": 25, "limit": 10, "collectionId": "col-1", "dateFilter": "week" })
        );
    }

    #[test]
    fn test_direction_is_uppercase() {
        assert_eq!(serde_json::to_value(Direction::Desc).unwrap(), json!("DESC"));
    }
}
