//! Model to document mappers
//!
//! Every document carries the sink key `_id`, a duplicate of its identifier
//! under a plain field name (replication connectors read that one), and
//! `deleted: false`.

use crate::contract::{
    Category, Customer, Document, InventoryRecord, Order, OrderItem, Product, ProductEmbedding,
    Store,
};
use serde_json::{json, Map, Value};

fn document(id: String, body: Value) -> Document {
    Document { id, body }
}

// ===== Reference Data =====

impl From<&Store> for Document {
    fn from(store: &Store) -> Self {
        let location = match &store.location {
            Some(loc) => json!({ "city": loc.city, "state": loc.state }),
            None => Value::Object(Map::new()),
        };

        document(
            store.store_id.clone(),
            json!({
                "_id": store.store_id,
                "store_id": store.store_id,
                "store_name": store.store_name,
                "rls_user_id": store.rls_user_id,
                "is_online": store.is_online,
                "location": location,
                "deleted": false,
            }),
        )
    }
}

impl From<&Category> for Document {
    fn from(category: &Category) -> Self {
        let seasonal: Map<String, Value> = category
            .seasonal_multipliers
            .iter()
            .map(|(month, value)| ((*month).to_string(), json!(value)))
            .collect();

        document(
            category.category_id.clone(),
            json!({
                "_id": category.category_id,
                "category_id": category.category_id,
                "category_name": category.category_name,
                "seasonal_multipliers": seasonal,
                "deleted": false,
            }),
        )
    }
}

// ===== Catalog =====

impl From<&Product> for Document {
    fn from(product: &Product) -> Self {
        document(
            product.product_id.clone(),
            json!({
                "_id": product.product_id,
                "product_id": product.product_id,
                "sku": product.sku,
                "product_name": product.product_name,
                "category_id": product.category_id,
                "cost": product.cost,
                "base_price": product.base_price,
                "gross_margin_percent": product.gross_margin_percent,
                "product_description": product.description,
                "image_path": product.image_path,
                "stock_level": product.stock_level,
                "deleted": false,
            }),
        )
    }
}

impl From<&ProductEmbedding> for Document {
    fn from(embedding: &ProductEmbedding) -> Self {
        document(
            embedding.product_id.clone(),
            json!({
                "_id": embedding.product_id,
                "product_id": embedding.product_id,
                "image_embedding": embedding.image_embedding,
                "description_embedding": embedding.description_embedding,
                "image_url": embedding.image_url,
                "created_at": embedding.created_at.to_rfc3339(),
                "deleted": false,
            }),
        )
    }
}

// ===== Customers & Inventory =====

impl From<&Customer> for Document {
    fn from(customer: &Customer) -> Self {
        document(
            customer.customer_id.clone(),
            json!({
                "_id": customer.customer_id,
                "customer_id": customer.customer_id,
                "first_name": customer.first_name,
                "last_name": customer.last_name,
                "email": customer.email,
                "phone": customer.phone,
                "primary_store_id": customer.primary_store_id,
                "created_at": customer.created_at.to_rfc3339(),
                "deleted": false,
            }),
        )
    }
}

impl From<&InventoryRecord> for Document {
    fn from(record: &InventoryRecord) -> Self {
        let id = record.id.to_string();
        document(
            id.clone(),
            json!({
                "_id": id,
                "id": id,
                "store_id": record.store_id,
                "product_id": record.product_id,
                "location": {
                    "aisle": record.location.aisle,
                    "shelf": record.location.shelf,
                    "bin": record.location.bin,
                },
                "stock_level": record.stock_level,
                "reorder_threshold": record.reorder_threshold,
                "last_updated": record.last_updated.to_rfc3339(),
                "last_counted": record.last_counted.to_rfc3339(),
                "notes": record.notes,
                "deleted": false,
            }),
        )
    }
}

// ===== Orders =====

impl From<&Order> for Document {
    fn from(order: &Order) -> Self {
        document(
            order.order_id.clone(),
            json!({
                "_id": order.order_id,
                "order_id": order.order_id,
                "customer_id": order.customer_id,
                "customer_name": order.customer_name,
                "store_id": order.store_id,
                "store_name": order.store_name,
                "order_date": order.order_date.to_rfc3339(),
                "item_count": order.item_count,
                "subtotal": order.subtotal,
                "total": order.total,
                "status": order.status.as_str(),
                "deleted": false,
            }),
        )
    }
}

impl From<&OrderItem> for Document {
    fn from(item: &OrderItem) -> Self {
        let id = item.id.to_string();
        document(
            id.clone(),
            json!({
                "_id": id,
                "id": id,
                "order_id": item.order_id,
                "product_id": item.product_id,
                "sku": item.sku,
                "product_name": item.product_name,
                "quantity": item.quantity,
                "unit_price": item.unit_price,
                "discount_percent": item.discount_percent,
                "line_total": item.line_total,
                "deleted": false,
            }),
        )
    }
}
