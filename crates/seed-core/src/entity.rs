//! Entity kinds and their population order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of rows the generator produces.
///
/// Variants are declared in phase order: independent entities first,
/// dependents after. `Ord` follows that order, so a `BTreeMap<EntityKind, _>`
/// iterates the same way the orchestrator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[serde(alias = "departments")]
    Department,
    #[serde(alias = "categories")]
    Category,
    #[serde(alias = "users")]
    User,
    #[serde(alias = "products")]
    Product,
    #[serde(alias = "orders")]
    Order,
    #[serde(alias = "order_items")]
    OrderItem,
}

impl EntityKind {
    /// All kinds in dependency order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Department,
        EntityKind::Category,
        EntityKind::User,
        EntityKind::Product,
        EntityKind::Order,
        EntityKind::OrderItem,
    ];

    /// Storage table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Department => "departments",
            EntityKind::Category => "categories",
            EntityKind::User => "users",
            EntityKind::Product => "products",
            EntityKind::Order => "orders",
            EntityKind::OrderItem => "order_items",
        }
    }

    /// Human-readable plural used in progress lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Department => "Departments",
            EntityKind::Category => "Categories",
            EntityKind::User => "Users",
            EntityKind::Product => "Products",
            EntityKind::Order => "Orders",
            EntityKind::OrderItem => "Order items",
        }
    }

    /// Entity kinds whose ids this kind references.
    pub fn parents(&self) -> &'static [EntityKind] {
        match self {
            EntityKind::Department | EntityKind::Category => &[],
            EntityKind::User => &[EntityKind::Department],
            EntityKind::Product => &[EntityKind::Category],
            EntityKind::Order => &[EntityKind::User],
            EntityKind::OrderItem => &[EntityKind::Order, EntityKind::Product],
        }
    }

    /// Insertable columns, in the order [`crate::Record::values`] yields them.
    ///
    /// The `id` column is assigned by the store and never listed here.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Department => &["name", "description", "budget"],
            EntityKind::Category => &["name", "description"],
            EntityKind::User => &["name", "email", "created_at", "department_id"],
            EntityKind::Product => &[
                "name",
                "description",
                "price",
                "stock_quantity",
                "category_id",
                "image_blob",
            ],
            EntityKind::Order => &[
                "order_number",
                "order_date",
                "status",
                "total_amount",
                "user_id",
                "invoice_blob",
            ],
            EntityKind::OrderItem => &["order_id", "product_id", "quantity", "unit_price"],
        }
    }

    /// Name of the blob column, for kinds that carry one.
    pub fn blob_column(&self) -> Option<&'static str> {
        match self {
            EntityKind::Product => Some("image_blob"),
            EntityKind::Order => Some("invoice_blob"),
            _ => None,
        }
    }

    /// The phase that runs after this one, if any.
    pub fn next(&self) -> Option<EntityKind> {
        let position = EntityKind::ALL.iter().position(|k| k == self)?;
        EntityKind::ALL.get(position + 1).copied()
    }

    /// Stable small integer used to decorrelate per-kind random streams.
    pub fn ordinal(&self) -> u64 {
        match self {
            EntityKind::Department => 1,
            EntityKind::Category => 2,
            EntityKind::User => 3,
            EntityKind::Product => 4,
            EntityKind::Order => 5,
            EntityKind::OrderItem => 6,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "department" | "departments" => Ok(EntityKind::Department),
            "category" | "categories" => Ok(EntityKind::Category),
            "user" | "users" => Ok(EntityKind::User),
            "product" | "products" => Ok(EntityKind::Product),
            "order" | "orders" => Ok(EntityKind::Order),
            "order_item" | "order_items" => Ok(EntityKind::OrderItem),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}
