//! Lookup tables shared between generation stages
//!
//! Every stage reads the tables filled by earlier stages and never reaches
//! for ambient state. A missing entry means a stage ran out of order and is
//! reported as [`DatagenError::Integrity`].

use crate::contract::{DatagenError, Stage};
use indexmap::IndexMap;

/// What downstream stages need to know about a generated store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRef {
    pub store_id: String,
    pub store_name: String,
    pub is_online: bool,
    pub customer_distribution_weight: f64,
    pub order_value_multiplier: f64,
}

/// What downstream stages need to know about a generated product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
}

/// Explicit generation state threaded through the pipeline
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// store display name -> store
    stores: IndexMap<String, StoreRef>,
    /// category display name -> category_id
    categories: IndexMap<String, String>,
    /// sku -> product
    products: IndexMap<String, ProductRef>,
    /// year -> growth multiplier
    year_weights: IndexMap<i32, f64>,
    customer_count: u64,
    customer_id_width: usize,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Stores =====

    /// Register a store under its display name; slugs must stay unique
    pub fn register_store(&mut self, store: StoreRef) -> Result<(), DatagenError> {
        if self.stores.values().any(|s| s.store_id == store.store_id) {
            return Err(DatagenError::source(
                "reference_data",
                format!(
                    "store '{}' maps to an already used store_id '{}'",
                    store.store_name, store.store_id
                ),
            ));
        }
        self.stores.insert(store.store_name.clone(), store);
        Ok(())
    }

    /// All stores in registration order
    pub fn stores(&self) -> impl Iterator<Item = &StoreRef> {
        self.stores.values()
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    // ===== Categories =====

    pub fn register_category(&mut self, name: &str, category_id: &str) {
        self.categories
            .insert(name.to_string(), category_id.to_string());
    }

    /// Resolve a category display name to its id
    pub fn category_id(
        &self,
        stage: Stage,
        index: usize,
        name: &str,
    ) -> Result<&str, DatagenError> {
        self.categories
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| DatagenError::integrity(stage, index, "category", name))
    }

    // ===== Products =====

    /// Register a product under its sku; skus must stay unique
    pub fn register_product(&mut self, product: ProductRef) -> Result<(), DatagenError> {
        if self.products.contains_key(&product.sku) {
            return Err(DatagenError::source(
                "product_data",
                format!("duplicate sku '{}'", product.sku),
            ));
        }
        self.products.insert(product.sku.clone(), product);
        Ok(())
    }

    /// All products in catalog order
    pub fn products(&self) -> impl Iterator<Item = &ProductRef> {
        self.products.values()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    // ===== Growth =====

    pub fn set_year_weights(&mut self, weights: IndexMap<i32, f64>) {
        self.year_weights = weights;
    }

    /// Growth multiplier of a calendar year, 1.0 when unknown
    pub fn year_multiplier(&self, year: i32) -> f64 {
        self.year_weights.get(&year).copied().unwrap_or(1.0)
    }

    // ===== Customers =====

    /// Record how many customers were generated and their id width
    pub fn set_customers(&mut self, count: u64, id_width: usize) {
        self.customer_count = count;
        self.customer_id_width = id_width;
    }

    pub fn customer_count(&self) -> u64 {
        self.customer_count
    }

    pub fn customer_id_width(&self) -> usize {
        self.customer_id_width
    }
}
