//! Orders and their line items
//!
//! Line prices are synthesized per item (base price x variance x store
//! multiplier x yearly growth) rather than taken from the product catalog.

use super::customers::customer_id;
use super::{id_width, random_uuid, round2, sequence_id};
use crate::contract::{DatagenError, Order, OrderItem, OrderStatus, Stage};
use crate::domain::context::{GenerationContext, ProductRef, StoreRef};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Minimum padding of `order_` sequence numbers
pub const ORDER_ID_MIN_WIDTH: usize = 8;

/// Sales tax applied to every subtotal
pub const TAX_RATE: f64 = 0.10;

/// Upper bound on line items per order
pub const MAX_ITEMS_PER_ORDER: usize = 3;

/// Discount percentages; zero is repeated so most lines get none
pub const DISCOUNT_CHOICES: [u32; 7] = [0, 0, 0, 5, 10, 15, 20];

/// Half-open range of synthesized base prices
pub const BASE_PRICE_RANGE: (f64, f64) = (15.0, 300.0);

/// Half-open range of the random price variance factor
pub const PRICE_VARIANCE_RANGE: (f64, f64) = (0.9, 1.1);

/// Inclusive quantity range per line
pub const QUANTITY_RANGE: (u32, u32) = (1, 3);

/// `round(unit_price x quantity x (1 - discount/100), 2)`
pub fn line_total(unit_price: f64, quantity: u32, discount_percent: u32) -> f64 {
    round2(unit_price * f64::from(quantity) * (1.0 - f64::from(discount_percent) / 100.0))
}

/// `round(subtotal x (1 + TAX_RATE), 2)`
pub fn order_total(subtotal: f64) -> f64 {
    round2(subtotal * (1.0 + TAX_RATE))
}

/// Produces orders `1..=count` inside an inclusive date window
#[derive(Debug, Clone)]
pub struct OrderGenerator<'a> {
    ctx: &'a GenerationContext,
    stores: Vec<&'a StoreRef>,
    products: Vec<&'a ProductRef>,
    start: NaiveDate,
    span_days: i64,
    count: u64,
    width: usize,
}

impl<'a> OrderGenerator<'a> {
    /// Stores, products and customers must already be in `ctx`
    pub fn new(
        ctx: &'a GenerationContext,
        count: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, DatagenError> {
        if ctx.store_count() == 0 {
            return Err(DatagenError::integrity(Stage::Orders, 0, "store", "*"));
        }
        if ctx.product_count() == 0 {
            return Err(DatagenError::integrity(Stage::Orders, 0, "product", "*"));
        }
        if ctx.customer_count() == 0 {
            return Err(DatagenError::integrity(Stage::Orders, 0, "customer", "*"));
        }
        if end < start {
            return Err(DatagenError::config(
                "END_DATE",
                format!("{} is before START_DATE {}", end, start),
            ));
        }

        Ok(Self {
            ctx,
            stores: ctx.stores().collect(),
            products: ctx.products().collect(),
            start,
            span_days: (end - start).num_days(),
            count,
            width: id_width(ORDER_ID_MIN_WIDTH, count),
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Order number `seq` (1-based) and its 1-3 line items
    pub fn generate<R: Rng + ?Sized>(
        &self,
        seq: u64,
        rng: &mut R,
    ) -> Result<(Order, Vec<OrderItem>), DatagenError> {
        let order_id = sequence_id("order", seq, self.width);
        let index = usize::try_from(seq).unwrap_or(usize::MAX);

        let order_date = self.start + Duration::days(rng.random_range(0..=self.span_days));

        let customer_seq = rng.random_range(1..=self.ctx.customer_count());
        let store = *self
            .stores
            .choose(rng)
            .ok_or_else(|| DatagenError::integrity(Stage::Orders, index, "store", "*"))?;

        let price_factor =
            store.order_value_multiplier * self.ctx.year_multiplier(order_date.year());

        let wanted = rng.random_range(1..=MAX_ITEMS_PER_ORDER);
        let picked: Vec<&ProductRef> = self
            .products
            .choose_multiple(rng, wanted.min(self.products.len()))
            .copied()
            .collect();

        let mut items = Vec::with_capacity(picked.len());
        for product in picked {
            let base_price = rng.random_range(BASE_PRICE_RANGE.0..BASE_PRICE_RANGE.1);
            let quantity = rng.random_range(QUANTITY_RANGE.0..=QUANTITY_RANGE.1);
            let variance = rng.random_range(PRICE_VARIANCE_RANGE.0..PRICE_VARIANCE_RANGE.1);
            let unit_price = round2(base_price * variance * price_factor);
            let discount_percent = DISCOUNT_CHOICES.choose(rng).copied().unwrap_or(0);

            items.push(OrderItem {
                id: random_uuid(rng),
                order_id: order_id.clone(),
                product_id: product.product_id.clone(),
                sku: product.sku.clone(),
                product_name: product.product_name.clone(),
                quantity,
                unit_price,
                discount_percent,
                line_total: line_total(unit_price, quantity, discount_percent),
            });
        }

        let subtotal = round2(items.iter().map(|i| i.line_total).sum());
        let customer_id = customer_id(customer_seq, self.ctx.customer_id_width());

        let order = Order {
            order_id,
            customer_name: format!("Customer {}", customer_id),
            customer_id,
            store_id: store.store_id.clone(),
            store_name: store.store_name.clone(),
            order_date: midnight_utc(order_date),
            item_count: items.len() as u32,
            subtotal,
            total: order_total(subtotal),
            status: OrderStatus::Completed,
        };

        Ok((order, items))
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
