//! Buffered writers between generators and the sink
//!
//! Generators stay pure; these loaders own the only I/O of a stage and cap
//! how many documents are held in memory at once.

use super::repository::DocumentSink;
use crate::contract::{Collection, DatagenError, Document, Stage};
use std::mem;

/// Documents buffered per collection before a flush
pub const BATCH_SIZE: usize = 1000;

/// Buffers documents for one collection, flushing every `batch_size`
pub struct BatchLoader<'a> {
    sink: &'a dyn DocumentSink,
    collection: Collection,
    stage: Stage,
    batch_size: usize,
    buffer: Vec<Document>,
    written: usize,
}

impl<'a> BatchLoader<'a> {
    pub fn new(sink: &'a dyn DocumentSink, collection: Collection, stage: Stage) -> Self {
        Self::with_batch_size(sink, collection, stage, BATCH_SIZE)
    }

    pub fn with_batch_size(
        sink: &'a dyn DocumentSink,
        collection: Collection,
        stage: Stage,
        batch_size: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            collection,
            stage,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            written: 0,
        }
    }

    /// Buffer a document, flushing once the batch is full
    pub async fn add(&mut self, document: Document) -> Result<(), DatagenError> {
        self.buffer.push(document);
        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Write whatever is buffered
    pub async fn flush(&mut self) -> Result<(), DatagenError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
        let len = batch.len();
        write_batch(self.sink, self.collection, self.stage, self.written, batch).await?;
        self.written += len;

        tracing::debug!(
            collection = %self.collection,
            batch = len,
            written = self.written,
            "Flushed batch"
        );
        Ok(())
    }

    /// Flush the remainder and return the number of documents written
    pub async fn finish(mut self) -> Result<usize, DatagenError> {
        self.flush().await?;
        Ok(self.written)
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Buffers orders together with their line items.
///
/// An order and its items always land in the same flush, so a failed run
/// never leaves items behind whose order was dropped at a batch boundary.
pub struct PairedBatchLoader<'a> {
    sink: &'a dyn DocumentSink,
    stage: Stage,
    batch_size: usize,
    orders: Vec<Document>,
    items: Vec<Document>,
    orders_written: usize,
    items_written: usize,
}

impl<'a> PairedBatchLoader<'a> {
    pub fn new(sink: &'a dyn DocumentSink, stage: Stage) -> Self {
        Self::with_batch_size(sink, stage, BATCH_SIZE)
    }

    pub fn with_batch_size(sink: &'a dyn DocumentSink, stage: Stage, batch_size: usize) -> Self {
        Self {
            sink,
            stage,
            batch_size: batch_size.max(1),
            orders: Vec::new(),
            items: Vec::new(),
            orders_written: 0,
            items_written: 0,
        }
    }

    /// Buffer an order and its items; flushes once `batch_size` orders wait
    pub async fn add(&mut self, order: Document, items: Vec<Document>) -> Result<(), DatagenError> {
        self.orders.push(order);
        self.items.extend(items);
        if self.orders.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Write buffered orders, then their items
    pub async fn flush(&mut self) -> Result<(), DatagenError> {
        if self.orders.is_empty() {
            return Ok(());
        }

        let orders = mem::take(&mut self.orders);
        let items = mem::take(&mut self.items);
        let (order_count, item_count) = (orders.len(), items.len());

        write_batch(
            self.sink,
            Collection::Orders,
            self.stage,
            self.orders_written,
            orders,
        )
        .await?;
        self.orders_written += order_count;

        write_batch(
            self.sink,
            Collection::OrderItems,
            self.stage,
            self.items_written,
            items,
        )
        .await?;
        self.items_written += item_count;

        tracing::info!(
            orders = self.orders_written,
            items = self.items_written,
            "Inserted order batch"
        );
        Ok(())
    }

    /// Flush the remainder and return `(orders, items)` written
    pub async fn finish(mut self) -> Result<(usize, usize), DatagenError> {
        self.flush().await?;
        Ok((self.orders_written, self.items_written))
    }
}

async fn write_batch(
    sink: &dyn DocumentSink,
    collection: Collection,
    stage: Stage,
    record_index: usize,
    batch: Vec<Document>,
) -> Result<(), DatagenError> {
    if batch.is_empty() {
        return Ok(());
    }
    sink.bulk_insert(collection, batch)
        .await
        .map_err(|e| DatagenError::Sink {
            stage,
            collection: collection.to_string(),
            record_index,
            reason: format!("{:#}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Records the size of every bulk insert
    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<(Collection, usize)>>,
        fail_on: Option<Collection>,
    }

    #[async_trait]
    impl DocumentSink for RecordingSink {
        async fn bulk_insert(
            &self,
            collection: Collection,
            documents: Vec<Document>,
        ) -> anyhow::Result<()> {
            if self.fail_on == Some(collection) {
                anyhow::bail!("write rejected");
            }
            self.batches.lock().push((collection, documents.len()));
            Ok(())
        }

        async fn clear(&self, _collection: Collection) -> anyhow::Result<()> {
            Ok(())
        }

        async fn count(&self, collection: Collection) -> anyhow::Result<u64> {
            Ok(self
                .batches
                .lock()
                .iter()
                .filter(|(c, _)| *c == collection)
                .map(|(_, n)| *n as u64)
                .sum())
        }
    }

    fn doc(id: usize) -> Document {
        Document {
            id: id.to_string(),
            body: json!({ "_id": id.to_string() }),
        }
    }

    #[tokio::test]
    async fn test_auto_flush_at_batch_size() {
        let sink = RecordingSink::default();
        let mut loader =
            BatchLoader::with_batch_size(&sink, Collection::Customers, Stage::Customers, 3);

        for i in 0..7 {
            loader.add(doc(i)).await.unwrap();
        }
        assert_eq!(loader.written(), 6);
        assert_eq!(loader.pending(), 1);

        let written = loader.finish().await.unwrap();
        assert_eq!(written, 7);
        assert_eq!(
            *sink.batches.lock(),
            vec![
                (Collection::Customers, 3),
                (Collection::Customers, 3),
                (Collection::Customers, 1)
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_flush_writes_nothing() {
        let sink = RecordingSink::default();
        let loader = BatchLoader::new(&sink, Collection::Stores, Stage::Stores);
        assert_eq!(loader.finish().await.unwrap(), 0);
        assert!(sink.batches.lock().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_reports_first_record_of_batch() {
        let sink = RecordingSink {
            fail_on: Some(Collection::Inventory),
            ..Default::default()
        };
        let mut loader =
            BatchLoader::with_batch_size(&sink, Collection::Inventory, Stage::Inventory, 2);
        loader.add(doc(0)).await.unwrap();
        let err = loader.add(doc(1)).await.unwrap_err();
        assert!(matches!(
            err,
            DatagenError::Sink { stage: Stage::Inventory, record_index: 0, ref collection, .. }
                if collection == "inventory"
        ));
    }

    #[tokio::test]
    async fn test_orders_and_items_flush_together() {
        let sink = RecordingSink::default();
        let mut loader = PairedBatchLoader::with_batch_size(&sink, Stage::Orders, 2);

        loader.add(doc(1), vec![doc(10), doc(11)]).await.unwrap();
        assert!(sink.batches.lock().is_empty());
        loader.add(doc(2), vec![doc(20)]).await.unwrap();
        loader.add(doc(3), vec![doc(30), doc(31), doc(32)]).await.unwrap();

        let (orders, items) = loader.finish().await.unwrap();
        assert_eq!((orders, items), (3, 6));
        assert_eq!(
            *sink.batches.lock(),
            vec![
                (Collection::Orders, 2),
                (Collection::OrderItems, 3),
                (Collection::Orders, 1),
                (Collection::OrderItems, 3)
            ]
        );
    }
}
