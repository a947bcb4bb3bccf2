//! Sink trait for generated documents
//!
//! Implementations are in infra/storage. The pipeline only ever inserts and
//! clears; schema and index management belong to external tooling.

use crate::contract::{Collection, Document};
use anyhow::Result;
use async_trait::async_trait;

/// Bulk-write target for generated documents
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Insert a batch of documents into a collection
    async fn bulk_insert(&self, collection: Collection, documents: Vec<Document>) -> Result<()>;

    /// Remove every document of a collection, keeping its schema
    async fn clear(&self, collection: Collection) -> Result<()>;

    /// Number of documents currently stored in a collection
    async fn count(&self, collection: Collection) -> Result<u64>;
}
