//! Document records and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Direction, UserReference};

/// A document as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_id: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<String>,
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_width: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserReference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collaborator_ids: Vec<String>,
}

impl Document {
    /// Published documents have a publish timestamp; drafts do not
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// A search hit. Outline wraps the document with a context snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSearchResult {
    pub document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<f64>,
}

/// Payload for `documents.create`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentData {
    pub title: String,
    pub text: String,
    pub collection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_width: Option<bool>,
}

/// Payload for `documents.update`; omitted fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_width: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

/// Payload for `documents.move`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDocumentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Html,
    Pdf,
}

/// Payload of `documents.export`.
///
/// Servers answer either with the exported text directly or wrapped in a
/// `data` field; both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentExport {
    Text(String),
    Wrapped { data: String },
}

impl DocumentExport {
    pub fn content(&self) -> &str {
        match self {
            DocumentExport::Text(text) => text,
            DocumentExport::Wrapped { data } => data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSort {
    Title,
    UpdatedAt,
    CreatedAt,
    PublishedAt,
}

/// Filters for `documents.list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlink_document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<DocumentSort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_from_api_payload() {
        let doc: Document = serde_json::from_value(json!({
            "id": "doc-123",
            "url": "/doc/test-abc",
            "urlId": "abc",
            "title": "Test Document",
            "text": "# Test Document\n\nContent",
            "collectionId": "col-123",
            "parentDocumentId": null,
            "revision": 1,
            "createdBy": { "id": "user-123", "name": "Test User" },
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "publishedAt": "2024-01-01T00:00:00.000Z",
            "teamId": "team-123",
            "collaboratorIds": []
        }))
        .unwrap();

        assert_eq!(doc.id, "doc-123");
        assert_eq!(doc.collection_id.as_deref(), Some("col-123"));
        assert!(doc.parent_document_id.is_none());
        assert!(doc.is_published());
        assert_eq!(doc.created_by.unwrap().name, "Test User");
    }

    #[test]
    fn test_create_payload_skips_unset_fields() {
        let data = CreateDocumentData {
            title: "Hello".to_string(),
            text: "World".to_string(),
            collection_id: "col-1".to_string(),
            publish: Some(true),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "title": "Hello", "text": "World", "collectionId": "col-1", "publish": true })
        );
    }

    #[test]
    fn test_export_accepts_both_shapes() {
        let wrapped: DocumentExport = serde_json::from_value(json!({ "data": "# Title" })).unwrap();
        let plain: DocumentExport = serde_json::from_value(json!("# Title")).unwrap();
        assert_eq!(wrapped.content(), "# Title");
        assert_eq!(plain.content(), "# Title");
    }

    #[test]
    fn test_list_options_serialize_sort() {
        let options = DocumentListOptions {
            sort: Some(DocumentSort::UpdatedAt),
            direction: Some(Direction::Desc),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "sort": "updatedAt", "direction": "DESC" })
        );
    }
}
