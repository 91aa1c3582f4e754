//! Logical records produced by the generator.
//!
//! Records are transient: they live in one batch buffer, get their foreign
//! keys filled by the resolver, are flushed, and are dropped. `index` is the
//! 0-based logical index the record was drafted from; it is not a column.
//! The row id is assigned by the store on insert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::entity::EntityKind;
use crate::values::FieldValue;

/// Serialize blob payloads as base64 so sample output stays printable.
fn serialize_blob<S: Serializer>(blob: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    use base64::Engine;
    match blob {
        Some(bytes) => {
            serializer.serialize_some(&base64::engine::general_purpose::STANDARD.encode(bytes))
        }
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Department {
    pub index: u64,
    pub name: String,
    pub description: String,
    pub budget: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub index: u64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub index: u64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Optional: users may exist without a department.
    pub department_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub index: u64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<u64>,
    #[serde(serialize_with = "serialize_blob")]
    pub image_blob: Option<Vec<u8>>,
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub index: u64,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    /// Required; an order whose user cannot be resolved is skipped.
    pub user_id: Option<u64>,
    #[serde(serialize_with = "serialize_blob")]
    pub invoice_blob: Option<Vec<u8>>,
}

impl Order {
    /// Order number for the row stored under `id`.
    pub fn number_for_id(id: u64) -> String {
        format!("ORD-{id:010}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub index: u64,
    pub order_id: Option<u64>,
    pub product_id: Option<u64>,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// One logical row of any entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Department(Department),
    Category(Category),
    User(User),
    Product(Product),
    Order(Order),
    OrderItem(OrderItem),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Department(_) => EntityKind::Department,
            Record::Category(_) => EntityKind::Category,
            Record::User(_) => EntityKind::User,
            Record::Product(_) => EntityKind::Product,
            Record::Order(_) => EntityKind::Order,
            Record::OrderItem(_) => EntityKind::OrderItem,
        }
    }

    /// Logical index this record was drafted from.
    pub fn index(&self) -> u64 {
        match self {
            Record::Department(r) => r.index,
            Record::Category(r) => r.index,
            Record::User(r) => r.index,
            Record::Product(r) => r.index,
            Record::Order(r) => r.index,
            Record::OrderItem(r) => r.index,
        }
    }

    /// Foreign keys as `(parent kind, id)` pairs, `None` while unresolved.
    pub fn foreign_keys(&self) -> Vec<(EntityKind, Option<u64>)> {
        match self {
            Record::Department(_) | Record::Category(_) => Vec::new(),
            Record::User(r) => vec![(EntityKind::Department, r.department_id)],
            Record::Product(r) => vec![(EntityKind::Category, r.category_id)],
            Record::Order(r) => vec![(EntityKind::User, r.user_id)],
            Record::OrderItem(r) => vec![
                (EntityKind::Order, r.order_id),
                (EntityKind::Product, r.product_id),
            ],
        }
    }

    /// Rewrite the fields derived from the store id once the id is known.
    ///
    /// Drafts carry a provisional order number for `index + 1`; skipped
    /// records make the stored id differ from that.
    pub fn bind_id(&mut self, id: u64) {
        if let Record::Order(r) = self {
            r.order_number = Order::number_for_id(id);
        }
    }

    /// Size of the blob payload carried by this record, if any.
    pub fn blob_len(&self) -> usize {
        match self {
            Record::Product(r) => r.image_blob.as_ref().map_or(0, Vec::len),
            Record::Order(r) => r.invoice_blob.as_ref().map_or(0, Vec::len),
            _ => 0,
        }
    }

    /// Column values in [`EntityKind::columns`] order.
    pub fn values(&self) -> Vec<FieldValue> {
        match self {
            Record::Department(r) => vec![
                FieldValue::Text(r.name.clone()),
                FieldValue::Text(r.description.clone()),
                FieldValue::Decimal(r.budget),
            ],
            Record::Category(r) => vec![
                FieldValue::Text(r.name.clone()),
                FieldValue::Text(r.description.clone()),
            ],
            Record::User(r) => vec![
                FieldValue::Text(r.name.clone()),
                FieldValue::Text(r.email.clone()),
                FieldValue::Timestamp(r.created_at),
                r.department_id.into(),
            ],
            Record::Product(r) => vec![
                FieldValue::Text(r.name.clone()),
                FieldValue::Text(r.description.clone()),
                FieldValue::Decimal(r.price),
                FieldValue::Int32(r.stock_quantity),
                r.category_id.into(),
                r.image_blob.clone().into(),
            ],
            Record::Order(r) => vec![
                FieldValue::Text(r.order_number.clone()),
                FieldValue::Timestamp(r.order_date),
                FieldValue::Text(r.status.as_str().to_string()),
                FieldValue::Decimal(r.total_amount),
                r.user_id.into(),
                r.invoice_blob.clone().into(),
            ],
            Record::OrderItem(r) => vec![
                r.order_id.into(),
                r.product_id.into(),
                FieldValue::Int32(r.quantity),
                FieldValue::Decimal(r.unit_price),
            ],
        }
    }
}
