//! Collections endpoints

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::Result;
use crate::http::{body_with_id, to_body, RequestEngine, RequestOptions};
use crate::pagination::{ListOperation, Paginator};
use crate::types::{
    ApiResponse, Collection, CollectionDocument, CollectionExportFormat, CollectionGroup,
    CollectionMembership, CreateCollectionData, PaginationOptions, Permission,
    UpdateCollectionData,
};

#[derive(Debug, Clone)]
pub struct CollectionsApi {
    engine: Arc<RequestEngine>,
}

impl CollectionsApi {
    pub fn new(engine: Arc<RequestEngine>) -> Self {
        Self { engine }
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<ApiResponse<T>> {
        self.engine
            .request(path, RequestOptions::default().with_body(body))
            .await
    }

    pub async fn list(&self, options: &PaginationOptions) -> Result<ApiResponse<Vec<Collection>>> {
        self.call("/collections.list", to_body(options)?).await
    }

    pub async fn info(&self, id: &str) -> Result<ApiResponse<Collection>> {
        self.call("/collections.info", json!({ "id": id })).await
    }

    /// Document tree of a collection
    pub async fn documents(
        &self,
        id: &str,
        options: &PaginationOptions,
    ) -> Result<ApiResponse<Vec<CollectionDocument>>> {
        self.call("/collections.documents", body_with_id(id, options)?)
            .await
    }

    pub async fn create(&self, data: &CreateCollectionData) -> Result<ApiResponse<Collection>> {
        self.call("/collections.create", to_body(data)?).await
    }

    pub async fn update(&self, id: &str, data: &UpdateCollectionData) -> Result<ApiResponse<Collection>> {
        self.call("/collections.update", body_with_id(id, data)?).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.call("/collections.delete", json!({ "id": id })).await
    }

    /// Start an export; the payload describes the server-side file operation
    pub async fn export(&self, id: &str, format: CollectionExportFormat) -> Result<ApiResponse<Value>> {
        self.call("/collections.export", json!({ "id": id, "format": format }))
            .await
    }

    pub async fn export_all(&self, format: CollectionExportFormat) -> Result<ApiResponse<Value>> {
        self.call("/collections.export_all", json!({ "format": format }))
            .await
    }

    pub async fn memberships(
        &self,
        id: &str,
        options: &PaginationOptions,
    ) -> Result<ApiResponse<Vec<CollectionMembership>>> {
        self.call("/collections.memberships", body_with_id(id, options)?)
            .await
    }

    pub async fn add_user(
        &self,
        id: &str,
        user_id: &str,
        permission: Permission,
    ) -> Result<ApiResponse<CollectionMembership>> {
        self.call(
            "/collections.add_user",
            json!({ "id": id, "userId": user_id, "permission": permission }),
        )
        .await
    }

    pub async fn remove_user(&self, id: &str, user_id: &str) -> Result<ApiResponse<Value>> {
        self.call("/collections.remove_user", json!({ "id": id, "userId": user_id }))
            .await
    }

    pub async fn add_group(
        &self,
        id: &str,
        group_id: &str,
        permission: Permission,
    ) -> Result<ApiResponse<CollectionGroup>> {
        self.call(
            "/collections.add_group",
            json!({ "id": id, "groupId": group_id, "permission": permission }),
        )
        .await
    }

    pub async fn remove_group(&self, id: &str, group_id: &str) -> Result<ApiResponse<Value>> {
        self.call("/collections.remove_group", json!({ "id": id, "groupId": group_id }))
            .await
    }

    /// Lazily walk every collection
    pub fn iterate(&self) -> Paginator<CollectionLister> {
        Paginator::new(CollectionLister { api: self.clone() })
    }
}

/// Page source backing [`CollectionsApi::iterate`]
#[derive(Debug, Clone)]
pub struct CollectionLister {
    api: CollectionsApi,
}

#[async_trait]
impl ListOperation for CollectionLister {
    type Item = Collection;

    async fn list_page(&self, offset: u32, limit: u32) -> Result<ApiResponse<Vec<Collection>>> {
        self.api.list(&PaginationOptions::page(offset, limit)).await
    }
}
