//! Category documents with month-keyed seasonal multipliers

use crate::contract::{Category, DatagenError};
use crate::domain::context::GenerationContext;
use crate::domain::seasonal::array_to_seasonal_map;
use crate::domain::source::ProductCatalog;

/// `"Paint & Finishes"` -> `"cat_paint_finishes"`
pub fn category_id_for(name: &str) -> String {
    format!(
        "cat_{}",
        name.to_lowercase().replace(" & ", "_").replace(' ', "_")
    )
}

/// One category per catalog entry; registers every category in `ctx`
pub fn generate_categories(
    catalog: &ProductCatalog,
    ctx: &mut GenerationContext,
) -> Result<Vec<Category>, DatagenError> {
    catalog
        .main_categories
        .iter()
        .map(|(name, entry)| {
            let category_id = category_id_for(name);
            let seasonal_multipliers = match &entry.washington_seasonal_multipliers {
                Some(values) => array_to_seasonal_map(values)?,
                None => Default::default(),
            };

            ctx.register_category(name, &category_id);

            Ok(Category {
                category_id,
                category_name: name.clone(),
                seasonal_multipliers,
            })
        })
        .collect()
}
