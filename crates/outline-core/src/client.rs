//! Client facade bundling the resource groups

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{RequestEngine, Transport};
use crate::resources::{AuthApi, CollectionsApi, DocumentsApi};

/// Entry point for the Outline API.
///
/// All resource groups share one [`RequestEngine`]; cloning the client is
/// cheap and clones share the engine too.
#[derive(Debug, Clone)]
pub struct OutlineClient {
    engine: Arc<RequestEngine>,
    pub documents: DocumentsApi,
    pub collections: CollectionsApi,
    pub auth: AuthApi,
}

impl OutlineClient {
    /// Build a client over the default `reqwest` transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_engine(RequestEngine::with_default_transport(config)?))
    }

    /// Build a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::from_engine(RequestEngine::new(config, transport)?))
    }

    /// Build a client for the hosted service with default settings
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    fn from_engine(engine: RequestEngine) -> Self {
        let engine = Arc::new(engine);
        Self {
            documents: DocumentsApi::new(engine.clone()),
            collections: CollectionsApi::new(engine.clone()),
            auth: AuthApi::new(engine.clone()),
            engine,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.engine.config()
    }

    /// Shared engine, for endpoints without a dedicated facade
    pub fn engine(&self) -> &Arc<RequestEngine> {
        &self.engine
    }

    /// Check connectivity and credentials.
    ///
    /// Never fails: every error, retryable or not, is reported as `false`.
    pub async fn ping(&self) -> bool {
        match self.auth.info().await {
            Ok(response) => response.ok,
            Err(err) => {
                debug!(error = %err, "Ping failed");
                false
            }
        }
    }
}
