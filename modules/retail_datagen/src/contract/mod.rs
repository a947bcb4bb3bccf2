//! Contract layer - generated entities, collection names and errors
//!
//! Models here are pure domain types. Their document shape lives in
//! `infra::storage::mapper`.

pub mod error;
pub mod model;

pub use error::DatagenError;
pub use model::{
    Category, Collection, Customer, Document, InventoryLocation, InventoryRecord, Order,
    OrderItem, OrderStatus, Product, ProductEmbedding, Stage, Store, StoreLocation,
};
