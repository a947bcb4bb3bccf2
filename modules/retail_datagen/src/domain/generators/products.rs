//! Lean product documents and their separate embedding documents

use crate::contract::{DatagenError, Product, ProductEmbedding, Stage};
use crate::domain::context::{GenerationContext, ProductRef};
use crate::domain::source::ProductCatalog;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Margin applied to every catalog price
pub const GROSS_MARGIN_PERCENT: f64 = 33.0;

/// Output of the product stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedProducts {
    pub products: Vec<Product>,
    /// Only for catalog entries that carry vectors
    pub embeddings: Vec<ProductEmbedding>,
}

/// `"HT-001"` -> `"prod_ht-001"`
pub fn product_id_for(sku: &str) -> String {
    format!("prod_{}", sku.to_lowercase())
}

/// Cost implied by a price at the fixed margin
pub fn cost_for(base_price: f64) -> f64 {
    base_price * (1.0 - GROSS_MARGIN_PERCENT / 100.0)
}

/// Split every catalog product into a product and an optional embedding.
///
/// Categories must already be registered in `ctx`; every product is
/// registered under its sku.
pub fn generate_products(
    catalog: &ProductCatalog,
    ctx: &mut GenerationContext,
    now: DateTime<Utc>,
) -> Result<GeneratedProducts, DatagenError> {
    let mut out = GeneratedProducts::default();
    let mut product_ids = HashSet::new();
    let mut index = 0usize;

    for (category_name, entry) in &catalog.main_categories {
        let category_id = ctx
            .category_id(Stage::Products, index, category_name)?
            .to_string();

        for source in entry.products() {
            let product_id = product_id_for(&source.sku);
            if !product_ids.insert(product_id.clone()) {
                return Err(DatagenError::source(
                    "product_data",
                    format!("sku '{}' collides with product_id '{}'", source.sku, product_id),
                ));
            }

            ctx.register_product(ProductRef {
                product_id: product_id.clone(),
                sku: source.sku.clone(),
                product_name: source.name.clone(),
            })?;

            if source.has_embeddings() {
                out.embeddings.push(ProductEmbedding {
                    product_id: product_id.clone(),
                    image_embedding: source.image_embedding.clone().unwrap_or_default(),
                    description_embedding: source
                        .description_embedding
                        .clone()
                        .unwrap_or_default(),
                    image_url: source.image_path.clone().unwrap_or_default(),
                    created_at: now,
                });
            }

            out.products.push(Product {
                product_id,
                sku: source.sku.clone(),
                product_name: source.name.clone(),
                category_id: category_id.clone(),
                cost: cost_for(source.price),
                base_price: source.price,
                gross_margin_percent: GROSS_MARGIN_PERCENT,
                description: source.description.clone().unwrap_or_default(),
                image_path: source.image_path.clone().unwrap_or_default(),
                stock_level: source.stock_level.unwrap_or(0),
            });

            index += 1;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generators::categories::generate_categories;
    use crate::domain::source::SourceCatalogs;
    use serde_json::json;

    fn catalogs(products: serde_json::Value) -> SourceCatalogs {
        let reference = json!({
            "stores": { "Zava Retail Seattle": { "customer_distribution_weight": 1.0 } }
        });
        SourceCatalogs::from_json(&reference.to_string(), &products.to_string()).unwrap()
    }

    fn sample() -> SourceCatalogs {
        catalogs(json!({
            "main_categories": {
                "Power Tools": {
                    "DRILLS": [
                        {
                            "sku": "PT-DR-01",
                            "name": "Cordless Drill",
                            "price": 100.0,
                            "description": "18V drill",
                            "image_path": "drills/pt-dr-01.png",
                            "stock_level": 12,
                            "image_embedding": [0.5, 0.25],
                            "description_embedding": [0.1]
                        },
                        { "sku": "PT-DR-02", "name": "Hammer Drill", "price": 150.0 }
                    ]
                }
            }
        }))
    }

    #[test]
    fn test_products_split_from_embeddings() {
        let catalogs = sample();
        let mut ctx = GenerationContext::new();
        generate_categories(&catalogs.products, &mut ctx).unwrap();

        let now = Utc::now();
        let out = generate_products(&catalogs.products, &mut ctx, now).unwrap();

        assert_eq!(out.products.len(), 2);
        assert_eq!(out.embeddings.len(), 1);

        let drill = &out.products[0];
        assert_eq!(drill.product_id, "prod_pt-dr-01");
        assert_eq!(drill.category_id, "cat_power_tools");
        assert_eq!(drill.stock_level, 12);
        assert!((drill.cost - 67.0).abs() < 1e-9);
        assert_eq!(drill.gross_margin_percent, 33.0);

        let embedding = &out.embeddings[0];
        assert_eq!(embedding.product_id, drill.product_id);
        assert_eq!(embedding.image_embedding, vec![0.5, 0.25]);
        assert_eq!(embedding.image_url, "drills/pt-dr-01.png");
        assert_eq!(embedding.created_at, now);

        let plain = &out.products[1];
        assert_eq!(plain.description, "");
        assert_eq!(plain.stock_level, 0);

        let registered = ctx.products().find(|p| p.sku == "PT-DR-02").unwrap();
        assert_eq!(registered.product_id, "prod_pt-dr-02");
        assert_eq!(registered.product_name, "Hammer Drill");
    }

    #[test]
    fn test_cost_follows_margin() {
        for price in [0.0, 9.99, 19.99, 250.0] {
            let expected = price * (1.0 - GROSS_MARGIN_PERCENT / 100.0);
            assert_eq!(cost_for(price), expected);
        }
    }

    #[test]
    fn test_categories_must_run_first() {
        let catalogs = sample();
        let mut ctx = GenerationContext::new();
        let err = generate_products(&catalogs.products, &mut ctx, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            DatagenError::Integrity { stage: Stage::Products, ref kind, .. } if kind == "category"
        ));
    }

    #[test]
    fn test_duplicate_sku_rejected() {
        // bypasses SourceCatalogs::check, which rejects this catalog up front
        let catalog: ProductCatalog = serde_json::from_value(json!({
            "main_categories": {
                "Paint": {
                    "BRUSHES": [{ "sku": "PA-1", "name": "Brush", "price": 3.0 }],
                    "ROLLERS": [{ "sku": "PA-1", "name": "Roller", "price": 5.0 }]
                }
            }
        }))
        .unwrap();
        let mut ctx = GenerationContext::new();
        generate_categories(&catalog, &mut ctx).unwrap();
        assert!(generate_products(&catalog, &mut ctx, Utc::now()).is_err());
    }
}
