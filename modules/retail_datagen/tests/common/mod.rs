//! Common test utilities: catalog fixtures, settings and sink doubles
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use retail_datagen::domain::{DocumentSink, SourceCatalogs};
use retail_datagen::infra::storage::InMemorySink;
use retail_datagen::{Collection, Document, GenerationSettings};
use serde_json::json;
use std::path::PathBuf;

/// Smallest realistic scenario: one physical store, two products
pub fn single_store_catalogs() -> SourceCatalogs {
    let reference = json!({
        "stores": {
            "Zava Retail Seattle": {
                "rls_user_id": "8d3c1f3e-6a4b-4f4e-9a55-2f1a0f6c2a11",
                "customer_distribution_weight": 1.0,
                "order_value_multiplier": 1.0
            }
        },
        "year_weights": { "2024": 1.0 }
    });
    let products = json!({
        "main_categories": {
            "Power Tools": {
                "washington_seasonal_multipliers": [0.8, 0.8, 1.0, 1.2, 1.3, 1.3, 1.2, 1.1, 1.0, 0.9, 1.0, 1.4],
                "DRILLS": [
                    {
                        "sku": "PT-001",
                        "name": "Cordless Drill",
                        "price": 89.99,
                        "description": "18V cordless drill with two batteries",
                        "image_path": "power_tools/drill.png",
                        "stock_level": 40,
                        "image_embedding": [0.12, -0.4, 0.33],
                        "description_embedding": [0.9, 0.1, -0.2]
                    },
                    {
                        "sku": "PT-002",
                        "name": "Hammer Drill",
                        "price": 129.0
                    }
                ]
            }
        }
    });
    SourceCatalogs::from_json(&reference.to_string(), &products.to_string())
        .expect("fixture catalogs are valid")
}

/// Physical stores plus an online store, with a larger catalog
pub fn chain_catalogs(products_per_type: usize) -> SourceCatalogs {
    let reference = json!({
        "stores": {
            "Zava Retail Seattle": { "customer_distribution_weight": 4.0, "order_value_multiplier": 1.3 },
            "Zava Retail Tacoma": { "customer_distribution_weight": 2.0 },
            "Zava Retail Online": { "customer_distribution_weight": 1.0, "order_value_multiplier": 0.9 }
        },
        "year_weights": { "2023": 1.0, "2024": 1.12 }
    });

    let products = |prefix: &str| -> Vec<serde_json::Value> {
        (1..=products_per_type)
            .map(|i| {
                json!({
                    "sku": format!("{}-{:03}", prefix, i),
                    "name": format!("{} item {}", prefix, i),
                    "price": 5.0 + i as f64
                })
            })
            .collect()
    };
    let catalog = json!({
        "main_categories": {
            "Garden & Outdoor": {
                "SEEDS": products("GO"),
                "PLANTERS": products("PL")
            },
            "Paint": {
                "washington_seasonal_multipliers": [0.7, 0.7, 0.9, 1.2, 1.4, 1.5, 1.5, 1.3, 1.1, 0.9, 0.8, 0.7],
                "INTERIOR": products("PA")
            }
        }
    });
    SourceCatalogs::from_json(&reference.to_string(), &catalog.to_string())
        .expect("fixture catalogs are valid")
}

pub fn settings(customers: u64, orders: u64, seed: Option<u64>) -> GenerationSettings {
    GenerationSettings {
        num_customers: customers,
        num_orders: orders,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"),
        database: "retail-test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        reference_data_path: PathBuf::from("tests/reference_data.json"),
        product_data_path: PathBuf::from("tests/product_data.json"),
        seed,
    }
}

/// In-memory sink that rejects every write to one collection
pub struct FailingSink {
    inner: InMemorySink,
    fail_on: Collection,
    attempts: RwLock<usize>,
}

impl FailingSink {
    pub fn new(fail_on: Collection) -> Self {
        Self {
            inner: InMemorySink::new(),
            fail_on,
            attempts: RwLock::new(0),
        }
    }

    /// Writes attempted against the failing collection
    pub fn attempts(&self) -> usize {
        *self.attempts.read()
    }

    pub fn documents(&self, collection: Collection) -> Vec<serde_json::Value> {
        self.inner.documents(collection)
    }
}

#[async_trait]
impl DocumentSink for FailingSink {
    async fn bulk_insert(&self, collection: Collection, documents: Vec<Document>) -> Result<()> {
        if collection == self.fail_on {
            *self.attempts.write() += 1;
            anyhow::bail!("connection reset while writing {}", collection);
        }
        self.inner.bulk_insert(collection, documents).await
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        self.inner.clear(collection).await
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        self.inner.count(collection).await
    }
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
