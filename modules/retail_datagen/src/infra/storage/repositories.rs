//! SeaORM-backed document sink
//!
//! Documents of every collection share one table, keyed by
//! `(namespace, collection, doc_id)`, with the full document in a JSON
//! column. Clearing deletes rows and leaves the table and its indexes alone.

use crate::contract::{Collection, Document};
use crate::domain::repository::DocumentSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

use super::entity;
use super::migrations::Migrator;

pub struct SeaOrmDocumentSink {
    db: Arc<DatabaseConnection>,
    namespace: String,
}

impl SeaOrmDocumentSink {
    pub fn new(db: Arc<DatabaseConnection>, namespace: impl Into<String>) -> Self {
        Self {
            db,
            namespace: namespace.into(),
        }
    }

    /// Connect and make sure the document table exists
    pub async fn connect(url: &str, namespace: impl Into<String>) -> Result<Self> {
        let db = Database::connect(url)
            .await
            .with_context(|| format!("connecting to document store at {}", url))?;
        Migrator::up(&db, None)
            .await
            .context("running document store migrations")?;

        let namespace = namespace.into();
        tracing::info!(namespace = %namespace, "Connected to document store");
        Ok(Self::new(Arc::new(db), namespace))
    }

    /// Another sink on the same connection, writing under `namespace`
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
        Self::new(self.db.clone(), namespace)
    }
}

#[async_trait]
impl DocumentSink for SeaOrmDocumentSink {
    async fn bulk_insert(&self, collection: Collection, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now();
        let rows = documents.into_iter().map(|doc| entity::ActiveModel {
            namespace: Set(self.namespace.clone()),
            collection: Set(collection.as_str().to_string()),
            doc_id: Set(doc.id),
            body: Set(doc.body),
            inserted_at: Set(now),
        });

        entity::Entity::insert_many(rows)
            .exec_without_returning(&*self.db)
            .await
            .with_context(|| format!("inserting into {}", collection))?;
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::Namespace.eq(&self.namespace))
            .filter(entity::Column::Collection.eq(collection.as_str()))
            .exec(&*self.db)
            .await
            .with_context(|| format!("clearing {}", collection))?;

        tracing::debug!(
            collection = %collection,
            removed = result.rows_affected,
            "Cleared collection"
        );
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        entity::Entity::find()
            .filter(entity::Column::Namespace.eq(&self.namespace))
            .filter(entity::Column::Collection.eq(collection.as_str()))
            .count(&*self.db)
            .await
            .with_context(|| format!("counting {}", collection))
    }
}
