use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::feed::StatsFeed;

/// Feed that serves a body held in memory. Clones share the same body.
#[derive(Debug, Clone)]
pub struct MemoryStatsFeed {
    source: String,
    body: Arc<RwLock<String>>,
}

impl MemoryStatsFeed {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            source: "memory".to_string(),
            body: Arc::new(RwLock::new(body.into())),
        }
    }

    pub async fn set_body(&self, body: impl Into<String>) {
        *self.body.write().await = body.into();
    }
}

impl Default for MemoryStatsFeed {
    fn default() -> Self {
        Self::new("[]")
    }
}

#[async_trait]
impl StatsFeed for MemoryStatsFeed {
    fn source(&self) -> &str {
        &self.source
    }

    async fn fetch_body(&self) -> Result<String> {
        Ok(self.body.read().await.clone())
    }
}
