//! Synthetic customers with weighted primary-store assignment

use super::{id_width, sequence_id};
use crate::contract::{Customer, DatagenError, Stage};
use crate::domain::context::GenerationContext;
use crate::domain::sampler::WeightedSampler;
use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::Rng;

/// Minimum padding of `cust_` sequence numbers
pub const CUSTOMER_ID_MIN_WIDTH: usize = 6;

/// Customers were created at most this many days before the run
pub const CUSTOMER_HISTORY_DAYS: i64 = 5 * 365;

/// Produces customers `1..=count`
#[derive(Debug, Clone)]
pub struct CustomerGenerator {
    stores: WeightedSampler<String>,
    count: u64,
    width: usize,
    now: DateTime<Utc>,
}

impl CustomerGenerator {
    /// Stores must already be registered in `ctx`
    pub fn new(
        ctx: &GenerationContext,
        count: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, DatagenError> {
        if ctx.store_count() == 0 {
            return Err(DatagenError::integrity(Stage::Customers, 0, "store", "*"));
        }

        let stores = WeightedSampler::new(
            ctx.stores()
                .map(|s| (s.store_id.clone(), s.customer_distribution_weight)),
        )?;

        Ok(Self {
            stores,
            count,
            width: id_width(CUSTOMER_ID_MIN_WIDTH, count),
            now,
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Padding width used for every id of this run
    pub fn width(&self) -> usize {
        self.width
    }

    /// Customer number `seq` (1-based)
    pub fn generate<R: Rng + ?Sized>(&self, seq: u64, rng: &mut R) -> Customer {
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let domain: String = FreeEmailProvider().fake_with_rng(rng);

        let email = format!(
            "{}.{}.{}@{}",
            email_part(&first_name),
            email_part(&last_name),
            seq,
            domain
        );

        let age_secs = rng.random_range(0..=CUSTOMER_HISTORY_DAYS * 86_400);

        Customer {
            customer_id: customer_id(seq, self.width),
            first_name,
            last_name,
            email,
            phone: phone_number(rng),
            primary_store_id: self.stores.choose(rng).clone(),
            created_at: self.now - Duration::seconds(age_secs),
        }
    }
}

/// `cust_` id of sequence number `seq`
pub fn customer_id(seq: u64, width: usize) -> String {
    sequence_id("cust", seq, width)
}

/// North American format: `(NXX) NXX-XXXX`
pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "({}) {}-{}",
        rng.random_range(200..=999),
        rng.random_range(200..=999),
        rng.random_range(1000..=9999)
    )
}

/// Lowercase ASCII letters and digits of a name (`"O'Neil"` -> `"oneil"`)
fn email_part(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
