//! Static source catalogs
//!
//! Two JSON documents feed every run: the reference catalog (stores and
//! yearly growth weights) and the product catalog (categories, product types
//! and products). Both are loaded and checked up front so that a bad input
//! fails the run before anything is written.

use super::generators::products::product_id_for;
use super::generators::{category_id_for, store_id_for};
use super::sampler::WeightedSampler;
use super::seasonal::array_to_seasonal_map;
use crate::contract::DatagenError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Per-store generation parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreProfile {
    /// Relative share of customers whose primary store this is
    pub customer_distribution_weight: f64,
    /// Price multiplier applied to this store's order lines
    #[serde(default = "default_multiplier")]
    pub order_value_multiplier: f64,
    #[serde(default)]
    pub rls_user_id: Option<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Store display name -> profile, plus year -> growth weight
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceCatalog {
    pub stores: IndexMap<String, StoreProfile>,
    #[serde(default)]
    pub year_weights: IndexMap<String, f64>,
}

/// One product as it appears in the product catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceProduct {
    pub sku: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub stock_level: Option<i64>,
    #[serde(default)]
    pub image_embedding: Option<Vec<f64>>,
    #[serde(default)]
    pub description_embedding: Option<Vec<f64>>,
}

impl SourceProduct {
    /// Whether the entry carries any vector data
    pub fn has_embeddings(&self) -> bool {
        self.image_embedding.is_some() || self.description_embedding.is_some()
    }
}

/// A category: optional seasonal array plus product type -> products
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryEntry {
    #[serde(default)]
    pub washington_seasonal_multipliers: Option<Vec<f64>>,
    #[serde(flatten)]
    pub product_types: IndexMap<String, Vec<SourceProduct>>,
}

impl CategoryEntry {
    /// Every product of the category, in catalog order
    pub fn products(&self) -> impl Iterator<Item = &SourceProduct> {
        self.product_types.values().flatten()
    }
}

/// Category display name -> category entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductCatalog {
    pub main_categories: IndexMap<String, CategoryEntry>,
}

impl ProductCatalog {
    /// Total number of products across all categories
    pub fn product_count(&self) -> usize {
        self.main_categories.values().map(|c| c.products().count()).sum()
    }
}

/// Both catalogs, loaded and checked
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCatalogs {
    pub reference: ReferenceCatalog,
    pub products: ProductCatalog,
}

impl SourceCatalogs {
    /// Read both catalogs from disk
    pub fn load(reference_path: &Path, product_path: &Path) -> Result<Self, DatagenError> {
        let reference: ReferenceCatalog = read_json(reference_path)?;
        tracing::info!(
            path = %reference_path.display(),
            stores = reference.stores.len(),
            "Loaded reference data"
        );

        let products: ProductCatalog = read_json(product_path)?;
        tracing::info!(
            path = %product_path.display(),
            categories = products.main_categories.len(),
            products = products.product_count(),
            "Loaded product data"
        );

        let catalogs = Self {
            reference,
            products,
        };
        catalogs.check(
            &reference_path.display().to_string(),
            &product_path.display().to_string(),
        )?;
        Ok(catalogs)
    }

    /// Parse both catalogs from in-memory JSON
    pub fn from_json(reference: &str, products: &str) -> Result<Self, DatagenError> {
        let reference = serde_json::from_str(reference)
            .map_err(|e| DatagenError::source("reference_data", e.to_string()))?;
        let products = serde_json::from_str(products)
            .map_err(|e| DatagenError::source("product_data", e.to_string()))?;

        let catalogs = Self {
            reference,
            products,
        };
        catalogs.check("reference_data", "product_data")?;
        Ok(catalogs)
    }

    fn check(&self, reference_name: &str, product_name: &str) -> Result<(), DatagenError> {
        if self.reference.stores.is_empty() {
            return Err(DatagenError::source(reference_name, "no stores defined"));
        }

        for (name, profile) in &self.reference.stores {
            if !profile.order_value_multiplier.is_finite() || profile.order_value_multiplier <= 0.0
            {
                return Err(DatagenError::source(
                    reference_name,
                    format!("store '{}' has a non-positive order_value_multiplier", name),
                ));
            }
        }

        WeightedSampler::new(
            self.reference
                .stores
                .iter()
                .map(|(name, p)| (name, p.customer_distribution_weight)),
        )
        .map_err(|e| {
            DatagenError::source(reference_name, format!("customer_distribution_weight: {}", e))
        })?;

        check_unique_ids(
            reference_name,
            "store",
            self.reference.stores.keys().map(|name| (name.as_str(), store_id_for(name))),
        )?;

        for (year, weight) in &self.reference.year_weights {
            if year.parse::<i32>().is_err() {
                return Err(DatagenError::source(
                    reference_name,
                    format!("year_weights key '{}' is not a year", year),
                ));
            }
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(DatagenError::source(
                    reference_name,
                    format!("year weight for {} must be positive", year),
                ));
            }
        }

        if self.products.main_categories.is_empty() {
            return Err(DatagenError::source(product_name, "no categories defined"));
        }

        for (name, category) in &self.products.main_categories {
            if let Some(values) = &category.washington_seasonal_multipliers {
                array_to_seasonal_map(values).map_err(|e| {
                    DatagenError::source(product_name, format!("category '{}': {}", name, e))
                })?;
            }
            if let Some(product) = category
                .products()
                .find(|p| !p.price.is_finite() || p.price < 0.0)
            {
                return Err(DatagenError::source(
                    product_name,
                    format!("product '{}' has an invalid price", product.sku),
                ));
            }
        }

        if self.products.product_count() == 0 {
            return Err(DatagenError::source(product_name, "catalog contains no products"));
        }

        check_unique_ids(
            product_name,
            "category",
            self.products
                .main_categories
                .keys()
                .map(|name| (name.as_str(), category_id_for(name))),
        )?;

        let mut skus = HashSet::new();
        let products = || {
            self.products
                .main_categories
                .values()
                .flat_map(CategoryEntry::products)
        };
        for product in products() {
            if !skus.insert(product.sku.as_str()) {
                return Err(DatagenError::source(
                    product_name,
                    format!("duplicate sku '{}'", product.sku),
                ));
            }
        }
        check_unique_ids(
            product_name,
            "sku",
            products().map(|p| (p.sku.as_str(), product_id_for(&p.sku))),
        )?;

        Ok(())
    }
}

/// Reject two source names that derive the same document id
fn check_unique_ids<'a>(
    document: &str,
    kind: &str,
    ids: impl Iterator<Item = (&'a str, String)>,
) -> Result<(), DatagenError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (name, id) in ids {
        if let Some(previous) = seen.insert(id.clone(), name) {
            return Err(DatagenError::source(
                document,
                format!("{} '{}' and '{}' both map to id '{}'", kind, previous, name, id),
            ));
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DatagenError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DatagenError::source(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&raw)
        .map_err(|e| DatagenError::source(path.display().to_string(), e.to_string()))
}
