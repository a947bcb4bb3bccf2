//! Store x product inventory with shelf locations

use super::random_uuid;
use crate::contract::{DatagenError, InventoryLocation, InventoryRecord, Stage};
use crate::domain::context::{GenerationContext, StoreRef};
use chrono::{DateTime, Duration, Utc};
use rand::seq::{index, IndexedRandom};
use rand::Rng;

/// Upper bound on the online store's assortment
pub const ONLINE_SAMPLE_CAP: usize = 200;

const AISLES: &[&str] = &["1", "2", "3", "4", "5", "A1", "A2", "B1", "B2", "C1"];
const SHELVES: &[&str] = &["A", "B", "C", "D", "Top", "Middle", "Bottom"];
const BINS: &[Option<&str>] = &[
    None,
    Some("1"),
    Some("2"),
    Some("3"),
    Some("12"),
    Some("24"),
    Some("36"),
];
const NOTES: &[Option<&str>] = &[
    None,
    Some("High demand"),
    Some("Seasonal"),
    Some("Check weekly"),
    Some("Promotional item"),
    Some("Best seller"),
];

/// Inclusive stock level range
pub const STOCK_LEVEL_RANGE: (u32, u32) = (5, 100);
/// Inclusive reorder threshold range
pub const REORDER_THRESHOLD_RANGE: (u32, u32) = (5, 20);
/// Inclusive age range of the last physical count, in days
pub const LAST_COUNTED_DAYS: (i64, i64) = (1, 30);

/// Decides each store's assortment and fills in its inventory records
#[derive(Debug, Clone)]
pub struct InventoryGenerator {
    product_ids: Vec<String>,
    online_cap: usize,
    now: DateTime<Utc>,
}

impl InventoryGenerator {
    /// Products must already be registered in `ctx`
    pub fn new(ctx: &GenerationContext, now: DateTime<Utc>) -> Result<Self, DatagenError> {
        if ctx.product_count() == 0 {
            return Err(DatagenError::integrity(Stage::Inventory, 0, "product", "*"));
        }

        Ok(Self {
            product_ids: ctx.products().map(|p| p.product_id.clone()).collect(),
            online_cap: ONLINE_SAMPLE_CAP,
            now,
        })
    }

    pub fn with_online_cap(mut self, cap: usize) -> Self {
        self.online_cap = cap;
        self
    }

    /// Products stocked by `store`: a sample without replacement for online
    /// stores, the full catalog otherwise. Never contains duplicates.
    pub fn assortment<R: Rng + ?Sized>(&self, store: &StoreRef, rng: &mut R) -> Vec<&str> {
        if !store.is_online {
            return self.product_ids.iter().map(String::as_str).collect();
        }

        let amount = self.online_cap.min(self.product_ids.len());
        index::sample(rng, self.product_ids.len(), amount)
            .into_iter()
            .map(|i| self.product_ids[i].as_str())
            .collect()
    }

    /// One inventory record for a (store, product) pair
    pub fn record<R: Rng + ?Sized>(
        &self,
        store_id: &str,
        product_id: &str,
        rng: &mut R,
    ) -> InventoryRecord {
        let location = InventoryLocation {
            aisle: pick(AISLES, rng).to_string(),
            shelf: pick(SHELVES, rng).to_string(),
            bin: BINS.choose(rng).copied().flatten().map(str::to_string),
        };

        let counted_days_ago = rng.random_range(LAST_COUNTED_DAYS.0..=LAST_COUNTED_DAYS.1);

        InventoryRecord {
            id: random_uuid(rng),
            store_id: store_id.to_string(),
            product_id: product_id.to_string(),
            location,
            stock_level: rng.random_range(STOCK_LEVEL_RANGE.0..=STOCK_LEVEL_RANGE.1),
            reorder_threshold: rng
                .random_range(REORDER_THRESHOLD_RANGE.0..=REORDER_THRESHOLD_RANGE.1),
            last_updated: self.now,
            last_counted: self.now - Duration::days(counted_days_ago),
            notes: NOTES.choose(rng).copied().flatten().map(str::to_string),
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::ProductRef;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn context(products: usize) -> GenerationContext {
        let mut ctx = GenerationContext::new();
        for i in 0..products {
            ctx.register_product(ProductRef {
                product_id: format!("prod_sku-{}", i),
                sku: format!("SKU-{}", i),
                product_name: format!("Product {}", i),
            })
            .unwrap();
        }
        ctx
    }

    fn store(id: &str, is_online: bool) -> StoreRef {
        StoreRef {
            store_id: id.to_string(),
            store_name: id.to_string(),
            is_online,
            customer_distribution_weight: 1.0,
            order_value_multiplier: 1.0,
        }
    }

    #[test]
    fn test_physical_store_gets_full_catalog() {
        let generator = InventoryGenerator::new(&context(250), Utc::now()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let assortment = generator.assortment(&store("store_seattle", false), &mut rng);
        assert_eq!(assortment.len(), 250);
    }

    #[test]
    fn test_online_store_sample_is_capped_and_distinct() {
        let generator = InventoryGenerator::new(&context(250), Utc::now()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let assortment = generator.assortment(&store("store_online", true), &mut rng);

        assert_eq!(assortment.len(), ONLINE_SAMPLE_CAP);
        let distinct: HashSet<_> = assortment.iter().collect();
        assert_eq!(distinct.len(), assortment.len());
    }

    #[test]
    fn test_online_sample_bounded_by_catalog_size() {
        let generator = InventoryGenerator::new(&context(12), Utc::now()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let assortment = generator.assortment(&store("store_online", true), &mut rng);
        assert_eq!(assortment.len(), 12);
    }

    #[test]
    fn test_record_attribute_ranges() {
        let now = Utc::now();
        let generator = InventoryGenerator::new(&context(1), now).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        let mut saw_missing_bin = false;
        for _ in 0..500 {
            let record = generator.record("store_seattle", "prod_sku-0", &mut rng);
            assert!((5..=100).contains(&record.stock_level));
            assert!((5..=20).contains(&record.reorder_threshold));
            assert!(AISLES.contains(&record.location.aisle.as_str()));
            assert!(SHELVES.contains(&record.location.shelf.as_str()));
            assert_eq!(record.last_updated, now);
            let age = now - record.last_counted;
            assert!(age >= Duration::days(1) && age <= Duration::days(30));
            saw_missing_bin |= record.location.bin.is_none();
        }
        assert!(saw_missing_bin);
    }

    #[test]
    fn test_requires_products() {
        let err = InventoryGenerator::new(&GenerationContext::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DatagenError::Integrity { stage: Stage::Inventory, .. }));
    }
}
