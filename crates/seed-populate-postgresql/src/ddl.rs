//! Table definitions and DDL generation.

use seed_core::EntityKind;

/// PostgreSQL column types used by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Integer,
    /// `NUMERIC(12, 2)`
    Money,
    VarChar(u32),
    Text,
    TimestampTz,
    Bytea,
}

impl ColumnType {
    pub fn sql(&self) -> String {
        match self {
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Money => "NUMERIC(12, 2)".to_string(),
            ColumnType::VarChar(length) => format!("VARCHAR({length})"),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::TimestampTz => "TIMESTAMPTZ".to_string(),
            ColumnType::Bytea => "BYTEA".to_string(),
        }
    }
}

/// One insertable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    pub references: Option<EntityKind>,
}

const fn column(name: &'static str, column_type: ColumnType) -> ColumnDefinition {
    ColumnDefinition {
        name,
        column_type,
        nullable: false,
        unique: false,
        references: None,
    }
}

const fn nullable(name: &'static str, column_type: ColumnType) -> ColumnDefinition {
    ColumnDefinition {
        nullable: true,
        ..column(name, column_type)
    }
}

const fn unique(name: &'static str, column_type: ColumnType) -> ColumnDefinition {
    ColumnDefinition {
        unique: true,
        ..column(name, column_type)
    }
}

const fn foreign_key(name: &'static str, parent: EntityKind, nullable: bool) -> ColumnDefinition {
    ColumnDefinition {
        name,
        column_type: ColumnType::BigInt,
        nullable,
        unique: false,
        references: Some(parent),
    }
}

const NAME: ColumnType = ColumnType::VarChar(255);

/// Insertable columns of `kind`, in [`EntityKind::columns`] order. The `id`
/// column is a `BIGSERIAL` primary key and is not listed.
pub fn table_columns(kind: EntityKind) -> &'static [ColumnDefinition] {
    const DEPARTMENTS: &[ColumnDefinition] = &[
        column("name", NAME),
        column("description", ColumnType::Text),
        column("budget", ColumnType::Money),
    ];
    const CATEGORIES: &[ColumnDefinition] = &[
        column("name", NAME),
        column("description", ColumnType::Text),
    ];
    const USERS: &[ColumnDefinition] = &[
        column("name", NAME),
        unique("email", NAME),
        column("created_at", ColumnType::TimestampTz),
        foreign_key("department_id", EntityKind::Department, true),
    ];
    const PRODUCTS: &[ColumnDefinition] = &[
        column("name", NAME),
        column("description", ColumnType::Text),
        column("price", ColumnType::Money),
        column("stock_quantity", ColumnType::Integer),
        foreign_key("category_id", EntityKind::Category, false),
        nullable("image_blob", ColumnType::Bytea),
    ];
    const ORDERS: &[ColumnDefinition] = &[
        unique("order_number", ColumnType::VarChar(32)),
        column("order_date", ColumnType::TimestampTz),
        column("status", ColumnType::VarChar(16)),
        column("total_amount", ColumnType::Money),
        foreign_key("user_id", EntityKind::User, false),
        nullable("invoice_blob", ColumnType::Bytea),
    ];
    const ORDER_ITEMS: &[ColumnDefinition] = &[
        foreign_key("order_id", EntityKind::Order, false),
        foreign_key("product_id", EntityKind::Product, false),
        column("quantity", ColumnType::Integer),
        column("unit_price", ColumnType::Money),
    ];

    match kind {
        EntityKind::Department => DEPARTMENTS,
        EntityKind::Category => CATEGORIES,
        EntityKind::User => USERS,
        EntityKind::Product => PRODUCTS,
        EntityKind::Order => ORDERS,
        EntityKind::OrderItem => ORDER_ITEMS,
    }
}

/// Generate the CREATE TABLE statement for `kind`.
pub fn generate_create_table(kind: EntityKind) -> String {
    let mut definitions = vec!["\"id\" BIGSERIAL PRIMARY KEY".to_string()];
    for column in table_columns(kind) {
        let mut definition = format!("\"{}\" {}", column.name, column.column_type.sql());
        if !column.nullable {
            definition.push_str(" NOT NULL");
        }
        if column.unique {
            definition.push_str(" UNIQUE");
        }
        if let Some(parent) = column.references {
            definition.push_str(&format!(" REFERENCES \"{}\" (\"id\")", parent.table_name()));
        }
        definitions.push(definition);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        kind.table_name(),
        definitions.join(", ")
    )
}

/// Generate DROP TABLE statement.
pub fn generate_drop_table(kind: EntityKind) -> String {
    format!("DROP TABLE IF EXISTS \"{}\" CASCADE", kind.table_name())
}

/// Empty every table and restart id sequences at 1.
pub fn generate_truncate_all() -> String {
    let tables: Vec<String> = EntityKind::ALL
        .iter()
        .map(|kind| format!("\"{}\"", kind.table_name()))
        .collect();
    format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", tables.join(", "))
}
