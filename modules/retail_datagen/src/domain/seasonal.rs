//! Array-to-map transforms for replication-friendly documents

use crate::contract::model::SeasonalMap;
use crate::contract::DatagenError;

/// Month labels in calendar order
pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Convert a 12-element calendar-ordered sequence into a month-keyed map.
///
/// The input is never truncated or padded. Values must be finite and
/// positive.
pub fn array_to_seasonal_map(values: &[f64]) -> Result<SeasonalMap, DatagenError> {
    if values.len() != MONTHS.len() {
        return Err(DatagenError::InvalidSeasonal {
            reason: format!("expected 12 monthly values, got {}", values.len()),
        });
    }

    if let Some((month, value)) = MONTHS
        .iter()
        .zip(values)
        .find(|(_, v)| !v.is_finite() || **v <= 0.0)
    {
        return Err(DatagenError::InvalidSeasonal {
            reason: format!("multiplier for {} must be positive, got {}", month, value),
        });
    }

    Ok(MONTHS.iter().copied().zip(values.iter().copied()).collect())
}
