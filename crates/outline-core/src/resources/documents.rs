//! Documents endpoints

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::http::{body_with_id, to_body, RequestEngine, RequestOptions};
use crate::pagination::{ListOperation, Paginator};
use crate::types::{
    ApiResponse, CreateDocumentData, Document, DocumentExport, DocumentListOptions,
    DocumentSearchResult, ExportFormat, MoveDocumentData, SearchOptions, UpdateDocumentData,
};

use super::with_field;

#[derive(Debug, Clone)]
pub struct DocumentsApi {
    engine: Arc<RequestEngine>,
}

impl DocumentsApi {
    pub fn new(engine: Arc<RequestEngine>) -> Self {
        Self { engine }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<ApiResponse<T>> {
        self.engine
            .request(path, RequestOptions::default().with_body(body))
            .await
    }

    /// One page of documents
    pub async fn list(&self, options: &DocumentListOptions) -> Result<ApiResponse<Vec<Document>>> {
        self.call("/documents.list", to_body(options)?).await
    }

    pub async fn info(&self, id: &str) -> Result<ApiResponse<Document>> {
        self.call("/documents.info", json!({ "id": id })).await
    }

    /// Full-text search
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<ApiResponse<Vec<DocumentSearchResult>>> {
        let body = with_field(to_body(options)?, "query", Value::String(query.to_string()));
        self.call("/documents.search", body).await
    }

    pub async fn create(&self, data: &CreateDocumentData) -> Result<ApiResponse<Document>> {
        self.call("/documents.create", to_body(data)?).await
    }

    pub async fn update(&self, id: &str, data: &UpdateDocumentData) -> Result<ApiResponse<Document>> {
        self.call("/documents.update", body_with_id(id, data)?).await
    }

    /// Move to trash, or delete for good when `permanent` is set
    pub async fn delete(&self, id: &str, permanent: bool) -> Result<ApiResponse<Value>> {
        self.call("/documents.delete", json!({ "id": id, "permanent": permanent }))
            .await
    }

    pub async fn archive(&self, id: &str) -> Result<ApiResponse<Document>> {
        self.call("/documents.archive", json!({ "id": id })).await
    }

    pub async fn unarchive(&self, id: &str) -> Result<ApiResponse<Document>> {
        self.call("/documents.unarchive", json!({ "id": id })).await
    }

    /// Returns every document whose position changed
    pub async fn r#move(&self, id: &str, data: &MoveDocumentData) -> Result<ApiResponse<Vec<Document>>> {
        self.call("/documents.move", body_with_id(id, data)?).await
    }

    pub async fn export(&self, id: &str, format: ExportFormat) -> Result<ApiResponse<DocumentExport>> {
        self.call("/documents.export", json!({ "id": id, "format": format }))
            .await
    }

    /// Restore a deleted or archived document, optionally to a given revision
    pub async fn restore(&self, id: &str, revision: Option<u64>) -> Result<ApiResponse<Document>> {
        let mut body = json!({ "id": id });
        if let Some(revision) = revision {
            body = with_field(body, "revision", json!(revision));
        }
        self.call("/documents.restore", body).await
    }

    pub async fn star(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.call("/documents.star", json!({ "id": id })).await
    }

    pub async fn unstar(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.call("/documents.unstar", json!({ "id": id })).await
    }

    /// Recently viewed documents
    pub async fn viewed(&self, id: &str) -> Result<ApiResponse<Vec<Document>>> {
        self.call("/documents.viewed", json!({ "id": id })).await
    }

    /// Lazily walk every document matching `options`.
    ///
    /// `offset` and `limit` in `options` are ignored; the paginator owns them.
    pub fn iterate(&self, options: DocumentListOptions) -> Paginator<DocumentLister> {
        Paginator::new(DocumentLister {
            api: self.clone(),
            options,
        })
    }
}

/// Page source backing [`DocumentsApi::iterate`]
#[derive(Debug, Clone)]
pub struct DocumentLister {
    api: DocumentsApi,
    options: DocumentListOptions,
}

#[async_trait]
impl ListOperation for DocumentLister {
    type Item = Document;

    async fn list_page(&self, offset: u32, limit: u32) -> Result<ApiResponse<Vec<Document>>> {
        let options = DocumentListOptions {
            offset: Some(offset),
            limit: Some(limit),
            ..self.options.clone()
        };
        self.api.list(&options).await
    }
}
