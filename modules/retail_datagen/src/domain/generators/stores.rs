//! Store documents from the reference catalog

use crate::contract::{DatagenError, Store, StoreLocation};
use crate::domain::context::{GenerationContext, StoreRef};
use crate::domain::source::ReferenceCatalog;

/// Brand prefix stripped from store display names
pub const BRAND_PREFIX: &str = "Zava Retail ";

/// State assigned to every physical store
pub const STORE_STATE: &str = "WA";

/// `"Zava Retail Seattle"` -> `"store_seattle"`
pub fn store_id_for(name: &str) -> String {
    format!(
        "store_{}",
        strip_brand(name).to_lowercase().replace(' ', "_")
    )
}

/// Online stores are recognized by name
pub fn is_online_store(name: &str) -> bool {
    name.to_lowercase().contains("online")
}

fn strip_brand(name: &str) -> &str {
    name.strip_prefix(BRAND_PREFIX).unwrap_or(name)
}

/// One store per reference entry; registers every store in `ctx`
pub fn generate_stores(
    catalog: &ReferenceCatalog,
    ctx: &mut GenerationContext,
) -> Result<Vec<Store>, DatagenError> {
    let mut stores = Vec::with_capacity(catalog.stores.len());

    for (name, profile) in &catalog.stores {
        let store_id = store_id_for(name);
        let is_online = is_online_store(name);

        let location = (!is_online).then(|| StoreLocation {
            city: strip_brand(name).to_string(),
            state: STORE_STATE.to_string(),
        });

        ctx.register_store(StoreRef {
            store_id: store_id.clone(),
            store_name: name.clone(),
            is_online,
            customer_distribution_weight: profile.customer_distribution_weight,
            order_value_multiplier: profile.order_value_multiplier,
        })?;

        stores.push(Store {
            store_id,
            store_name: name.clone(),
            rls_user_id: profile.rls_user_id.clone(),
            is_online,
            location,
        });
    }

    Ok(stores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source::StoreProfile;
    use indexmap::IndexMap;

    fn profile(weight: f64) -> StoreProfile {
        StoreProfile {
            customer_distribution_weight: weight,
            order_value_multiplier: 1.0,
            rls_user_id: None,
        }
    }

    #[test]
    fn test_store_id_slug() {
        assert_eq!(store_id_for("Zava Retail Seattle"), "store_seattle");
        assert_eq!(store_id_for("Zava Retail Bellevue Square"), "store_bellevue_square");
        assert_eq!(store_id_for("Zava Retail Online"), "store_online");
        assert_eq!(store_id_for("Pop Up"), "store_pop_up");
    }

    #[test]
    fn test_online_detection() {
        assert!(is_online_store("Zava Retail Online"));
        assert!(is_online_store("ONLINE outlet"));
        assert!(!is_online_store("Zava Retail Spokane"));
    }

    #[test]
    fn test_generate_stores_populates_context() {
        let catalog = ReferenceCatalog {
            stores: IndexMap::from([
                ("Zava Retail Seattle".to_string(), profile(3.0)),
                ("Zava Retail Online".to_string(), profile(1.0)),
            ]),
            year_weights: IndexMap::new(),
        };
        let mut ctx = GenerationContext::new();
        let stores = generate_stores(&catalog, &mut ctx).unwrap();

        assert_eq!(stores.len(), 2);
        assert_eq!(
            stores[0].location,
            Some(StoreLocation {
                city: "Seattle".to_string(),
                state: "WA".to_string()
            })
        );
        assert!(stores[1].is_online);
        assert_eq!(stores[1].location, None);

        let online = ctx.stores().find(|s| s.is_online).unwrap();
        assert_eq!(online.store_id, "store_online");
        assert_eq!(online.store_name, "Zava Retail Online");
        assert_eq!(ctx.store_count(), 2);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let catalog = ReferenceCatalog {
            stores: IndexMap::from([("Zava Retail Tacoma".to_string(), profile(2.0))]),
            year_weights: IndexMap::new(),
        };
        let a = generate_stores(&catalog, &mut GenerationContext::new()).unwrap();
        let b = generate_stores(&catalog, &mut GenerationContext::new()).unwrap();
        assert_eq!(a, b);
    }
}
