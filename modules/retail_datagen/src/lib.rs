//! Retail Datagen
//!
//! Synthesizes an internally-consistent retail dataset (stores, categories,
//! products, customers, inventory, orders and order items) from two static
//! catalogs and loads it into a document store. Documents are shaped for
//! offline-first replication: maps instead of arrays, pre-generated
//! identifiers and soft-delete flags.

// Public exports
pub mod contract;
pub use contract::{
    error::DatagenError, Category, Collection, Customer, Document, InventoryRecord, Order,
    OrderItem, Product, ProductEmbedding, Stage, Store,
};

pub mod config;
pub use config::{Config, GenerationSettings};

pub mod domain;
pub use domain::{DocumentSink, Pipeline, RunSummary};

pub mod infra;
