//! Pending decisions and open loops, as read from the memory service.

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

use crate::{ApiClient, Result};

pub const CONTEXT_PATH: &str = "/context";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextItem {
    pub title: String,
}

impl ContextItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryContext {
    #[serde(default)]
    pub pending_decisions: Vec<ContextItem>,
    #[serde(default)]
    pub open_loops: Vec<ContextItem>,
}

impl MemoryContext {
    pub fn is_empty(&self) -> bool {
        self.pending_decisions.is_empty() && self.open_loops.is_empty()
    }
}

/// Anything that can supply briefing context.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn get_context(&self) -> Result<MemoryContext>;
}

/// Reads context from the memory service over HTTP.
pub struct MemoryApiClient {
    client: ApiClient,
}

impl MemoryApiClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContextSource for MemoryApiClient {
    async fn get_context(&self) -> Result<MemoryContext> {
        self.client.get(CONTEXT_PATH).await
    }
}

/// Fixed context, for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticContextSource(pub MemoryContext);

#[async_trait]
impl ContextSource for StaticContextSource {
    async fn get_context(&self) -> Result<MemoryContext> {
        Ok(self.0.clone())
    }
}

/// Used when memory integration is disabled or has no credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContextSource;

#[async_trait]
impl ContextSource for EmptyContextSource {
    async fn get_context(&self) -> Result<MemoryContext> {
        Ok(MemoryContext::default())
    }
}
