pub mod in_memory;
pub mod notion;

use crate::error::Result;
use crate::types::{Page, QueryRequest};
use async_trait::async_trait;

pub use in_memory::InMemoryCms;
pub use notion::NotionClient;

/// Outbound "query collection" operation against the headless CMS.
#[async_trait]
pub trait CmsClient: Send + Sync {
    /// Run one query against `data_source_id` and return the first page of results
    /// in source order.
    async fn query_collection(&self, data_source_id: &str, query: &QueryRequest) -> Result<Vec<Page>>;
}
