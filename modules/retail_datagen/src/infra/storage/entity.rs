//! SeaORM entity for the document table

use sea_orm::entity::prelude::*;

/// One generated document
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Target database/namespace (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub namespace: String,

    /// Collection name (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub collection: String,

    /// Document `_id` (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub doc_id: String,

    /// Full document as JSON
    pub body: Json,

    /// Insertion timestamp
    pub inserted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
