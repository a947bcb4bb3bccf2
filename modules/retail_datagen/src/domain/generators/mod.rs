//! Stage generators
//!
//! Pure functions of (catalogs, context, random source). None of them touch
//! the sink; `Pipeline` feeds their output into batch loaders.

pub mod categories;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod stores;

pub use categories::{category_id_for, generate_categories};
pub use customers::CustomerGenerator;
pub use inventory::InventoryGenerator;
pub use orders::OrderGenerator;
pub use products::{generate_products, GeneratedProducts};
pub use stores::{generate_stores, is_online_store, store_id_for};

use rand::Rng;
use uuid::Uuid;

/// Zero-padded sequence identifier, e.g. `cust_000042`
pub fn sequence_id(prefix: &str, seq: u64, width: usize) -> String {
    format!("{}_{:0width$}", prefix, seq, width = width)
}

/// Padding width that fits `count` while never going below `min_width`
pub fn id_width(min_width: usize, count: u64) -> usize {
    min_width.max(count.to_string().len())
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Random v4 UUID drawn from the supplied source
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}
