//! Authentication and API key endpoints

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::Result;
use crate::http::{RequestEngine, RequestOptions};
use crate::types::{ApiKey, ApiResponse, AuthInfo};

#[derive(Debug, Clone)]
pub struct AuthApi {
    engine: Arc<RequestEngine>,
}

impl AuthApi {
    pub fn new(engine: Arc<RequestEngine>) -> Self {
        Self { engine }
    }

    /// The user and team the API key belongs to
    pub async fn info(&self) -> Result<ApiResponse<AuthInfo>> {
        self.engine.request("/auth.info", RequestOptions::new()).await
    }

    pub async fn api_keys(&self) -> Result<ApiResponse<Vec<ApiKey>>> {
        self.engine.request("/apiKeys.list", RequestOptions::new()).await
    }

    /// The returned key carries its secret; it is not shown again
    pub async fn create_api_key(&self, name: &str) -> Result<ApiResponse<ApiKey>> {
        self.engine
            .request(
                "/apiKeys.create",
                RequestOptions::new().with_body(json!({ "name": name })),
            )
            .await
    }

    pub async fn delete_api_key(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.engine
            .request(
                "/apiKeys.delete",
                RequestOptions::new().with_body(json!({ "id": id })),
            )
            .await
    }
}
