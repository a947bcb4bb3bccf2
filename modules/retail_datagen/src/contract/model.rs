//! Generated retail entities
//!
//! Pure domain models. Every entity is created once, in full, by its
//! generator and never updated afterwards.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

/// Month label -> multiplier, keyed `jan`..`dec`
pub type SeasonalMap = IndexMap<&'static str, f64>;

/// Target collections, in the order they are cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Stores,
    Customers,
    Categories,
    Products,
    ProductEmbeddings,
    Inventory,
    Orders,
    OrderItems,
}

impl Collection {
    pub const ALL: [Self; 8] = [
        Self::Stores,
        Self::Customers,
        Self::Categories,
        Self::Products,
        Self::ProductEmbeddings,
        Self::Inventory,
        Self::Orders,
        Self::OrderItems,
    ];

    /// Collection name in the document store
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stores => "stores",
            Self::Customers => "customers",
            Self::Categories => "categories",
            Self::Products => "products",
            Self::ProductEmbeddings => "product_embeddings",
            Self::Inventory => "inventory",
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
        }
    }

    /// Whether the collection takes part in peer-to-peer replication.
    /// Embedding vectors stay server-side.
    pub const fn is_replicated(self) -> bool {
        !matches!(self, Self::ProductEmbeddings)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Clear,
    Stores,
    Categories,
    Products,
    Customers,
    Inventory,
    Orders,
    /// End-of-run count query
    Summary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clear => "clear",
            Self::Stores => "stores",
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Inventory => "inventory",
            Self::Orders => "orders",
            Self::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// A document ready for the sink: primary key plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Sink primary key (also present in the body as `_id`)
    pub id: String,
    /// Full document body
    pub body: serde_json::Value,
}

/// Physical store address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub city: String,
    pub state: String,
}

/// Retail store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Slug derived from the display name (e.g. `store_seattle`)
    pub store_id: String,
    pub store_name: String,
    /// Row-level-security user carried over from the reference catalog
    pub rls_user_id: Option<String>,
    pub is_online: bool,
    /// `None` for online stores
    pub location: Option<StoreLocation>,
}

/// Product category
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Slug derived from the display name (e.g. `cat_hand_tools`)
    pub category_id: String,
    pub category_name: String,
    /// Empty when the source category has no seasonal data
    pub seasonal_multipliers: SeasonalMap,
}

/// Lean product document (no embedding vectors)
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub category_id: String,
    pub cost: f64,
    pub base_price: f64,
    pub gross_margin_percent: f64,
    pub description: String,
    pub image_path: String,
    pub stock_level: i64,
}

/// Embedding vectors of a product, stored apart from the product itself
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEmbedding {
    pub product_id: String,
    pub image_embedding: Vec<f64>,
    pub description_embedding: Vec<f64>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Synthetic customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// `cust_` + zero-padded sequence number
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub primary_store_id: String,
    pub created_at: DateTime<Utc>,
}

/// Shelf position of an inventory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLocation {
    pub aisle: String,
    pub shelf: String,
    pub bin: Option<String>,
}

/// Stock of one product at one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    pub id: Uuid,
    pub store_id: String,
    pub product_id: String,
    pub location: InventoryLocation,
    pub stock_level: u32,
    pub reorder_threshold: u32,
    pub last_updated: DateTime<Utc>,
    pub last_counted: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Completed,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

/// Order header
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// `order_` + zero-padded sequence number
    pub order_id: String,
    pub customer_id: String,
    /// Denormalized customer label at order time
    pub customer_name: String,
    pub store_id: String,
    /// Denormalized store name at order time
    pub store_name: String,
    pub order_date: DateTime<Utc>,
    pub item_count: u32,
    pub subtotal: f64,
    pub total: f64,
    pub status: OrderStatus,
}

/// Order line item
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: String,
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_percent: u32,
    pub line_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_embeddings_are_not_replicated() {
        let local: Vec<_> = Collection::ALL
            .iter()
            .filter(|c| !c.is_replicated())
            .collect();
        assert_eq!(local, vec![&Collection::ProductEmbeddings]);
    }

    #[test]
    fn test_collection_names_are_unique() {
        let mut names: Vec<_> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
    }
}
