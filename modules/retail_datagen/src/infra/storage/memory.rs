//! In-process document sink
//!
//! Backs `--dry-run` and the test suites. Documents are kept per collection
//! in insertion order; inserting an `_id` twice is rejected the way a
//! document store rejects a duplicate primary key.

use crate::contract::{Collection, Document};
use crate::domain::repository::DocumentSink;
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct InMemorySink {
    collections: RwLock<HashMap<Collection, IndexMap<String, serde_json::Value>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection's document bodies, in insertion order
    pub fn documents(&self, collection: Collection) -> Vec<serde_json::Value> {
        self.collections
            .read()
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Look up one document body by `_id`
    pub fn get(&self, collection: Collection, id: &str) -> Option<serde_json::Value> {
        self.collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.get(id).cloned())
    }

    /// Number of documents across every collection
    pub fn total(&self) -> usize {
        self.collections.read().values().map(IndexMap::len).sum()
    }
}

#[async_trait]
impl DocumentSink for InMemorySink {
    async fn bulk_insert(&self, collection: Collection, documents: Vec<Document>) -> Result<()> {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection).or_default();

        let mut seen = HashSet::with_capacity(documents.len());
        if let Some(dup) = documents
            .iter()
            .find(|d| docs.contains_key(&d.id) || !seen.insert(d.id.as_str()))
        {
            anyhow::bail!("duplicate key '{}' in collection '{}'", dup.id, collection);
        }

        for doc in documents {
            docs.insert(doc.id, doc.body);
        }
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        if let Some(docs) = self.collections.write().get_mut(&collection) {
            docs.clear();
        }
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map_or(0, |docs| docs.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            body: json!({ "_id": id, "deleted": false }),
        }
    }

    #[tokio::test]
    async fn test_insert_count_clear() {
        let sink = InMemorySink::new();
        sink.bulk_insert(Collection::Stores, vec![doc("store_a"), doc("store_b")])
            .await
            .unwrap();
        sink.bulk_insert(Collection::Orders, vec![doc("order_1")])
            .await
            .unwrap();

        assert_eq!(sink.count(Collection::Stores).await.unwrap(), 2);
        assert_eq!(sink.count(Collection::Customers).await.unwrap(), 0);
        assert_eq!(sink.total(), 3);
        assert_eq!(sink.get(Collection::Stores, "store_b").unwrap()["_id"], "store_b");

        sink.clear(Collection::Stores).await.unwrap();
        assert_eq!(sink.count(Collection::Stores).await.unwrap(), 0);
        assert_eq!(sink.count(Collection::Orders).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let sink = InMemorySink::new();
        sink.bulk_insert(Collection::Stores, vec![doc("store_a")])
            .await
            .unwrap();
        assert!(sink
            .bulk_insert(Collection::Stores, vec![doc("store_a")])
            .await
            .is_err());
    }
}
