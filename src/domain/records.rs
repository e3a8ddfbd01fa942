//! Entity record types for the normalized retail schema
//!
//! This module defines the fixed record shapes the pipeline produces: the
//! raw and cleaned source rows, and the four entity tables (customers,
//! products, invoices, invoice_items) derived from them. Each entity
//! implements [`Record`], which declares its destination table, column
//! layout, conflict keys for both sinks, and a hashable natural key for
//! deduplication.
//!
//! Entity collections are derived, read-only artifacts of one pipeline run.
//! They are never mutated after decomposition.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use tokio_postgres::types::ToSql;

/// Destination tables, in referential write order
///
/// `invoice_items` is the fact table; the other three are the dimension
/// tables it references. Sinks that enforce foreign keys will reject writes
/// that arrive out of this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Customers,
    Products,
    Invoices,
    InvoiceItems,
}

impl Table {
    /// Fixed write order: dimensions before the fact table
    pub const WRITE_ORDER: [Table; 4] = [
        Table::Customers,
        Table::Products,
        Table::Invoices,
        Table::InvoiceItems,
    ];

    /// Table name as it exists in both sinks
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Products => "products",
            Table::Invoices => "invoices",
            Table::InvoiceItems => "invoice_items",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One record of the flat transaction export, before any coercion
///
/// Field names map to the export's fixed CSV headers. No uniqueness is
/// guaranteed; customer identifier and description may be missing, and
/// quantity/price may be non-positive. Numeric fields that fail to parse at
/// the CSV layer never construct a `RawRow` (the source reader skips those
/// records).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,

    #[serde(rename = "Country")]
    pub country: String,

    #[serde(rename = "StockCode")]
    pub stock_code: String,

    #[serde(rename = "Description")]
    pub description: Option<String>,

    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,

    #[serde(rename = "InvoiceNo")]
    pub invoice_no: String,

    #[serde(rename = "InvoiceDate")]
    pub invoice_date: String,

    #[serde(rename = "Quantity")]
    pub quantity: i64,
}

/// The canonical in-memory row shape after sanitization
///
/// All cleaning predicates hold: customer_id parsed, description non-empty,
/// quantity > 0, unit_price > 0, invoice_date parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub customer_id: i64,
    pub country: String,
    pub stock_code: String,
    pub description: String,
    pub unit_price: f64,
    pub invoice_no: String,
    pub invoice_date: NaiveDateTime,
    pub quantity: i64,
}

/// A record destined for one of the normalized tables
///
/// Implementors declare everything the dual-sink writer needs: the
/// destination table, the column layout for parameterized inserts, the
/// conflict key for the primary sink's insert-if-absent policy, the conflict
/// key for the secondary sink's upsert (logically equivalent, but declared
/// separately because the two sinks may spell it differently), and a
/// hashable key for first-occurrence deduplication.
pub trait Record: Clone + Send + Sync + Serialize + 'static {
    /// Hashable natural-key type used by the deduplicator
    type Key: Eq + Hash;

    /// Destination table
    const TABLE: Table;

    /// Column list, in insert order
    const COLUMNS: &'static [&'static str];

    /// Natural/composite key columns for the primary sink's conflict target
    const KEY_COLUMNS: &'static [&'static str];

    /// Conflict key columns for the secondary sink's upsert
    ///
    /// Defaults to the primary key columns; override when the secondary
    /// store declares the key under different column names.
    const UPSERT_KEY_COLUMNS: &'static [&'static str] = Self::KEY_COLUMNS;

    /// The record's natural key value
    fn key(&self) -> Self::Key;

    /// SQL parameter references for one row, aligned with [`Self::COLUMNS`]
    fn params(&self) -> Vec<&(dyn ToSql + Sync)>;
}

/// Customer dimension row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub country: String,
}

impl Record for Customer {
    type Key = i64;

    const TABLE: Table = Table::Customers;
    const COLUMNS: &'static [&'static str] = &["customer_id", "country"];
    const KEY_COLUMNS: &'static [&'static str] = &["customer_id"];

    fn key(&self) -> i64 {
        self.customer_id
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.customer_id, &self.country]
    }
}

/// Product dimension row
///
/// Invariant: `unit_price > 0` (guaranteed by the sanitizer upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub description: String,
    pub unit_price: f64,
}

impl Record for Product {
    type Key = String;

    const TABLE: Table = Table::Products;
    const COLUMNS: &'static [&'static str] = &["product_id", "description", "unit_price"];
    const KEY_COLUMNS: &'static [&'static str] = &["product_id"];

    fn key(&self) -> String {
        self.product_id.clone()
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.product_id, &self.description, &self.unit_price]
    }
}

/// Invoice dimension row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub invoice_date: NaiveDateTime,
}

impl Record for Invoice {
    type Key = String;

    const TABLE: Table = Table::Invoices;
    const COLUMNS: &'static [&'static str] = &["invoice_id", "invoice_date"];
    const KEY_COLUMNS: &'static [&'static str] = &["invoice_id"];

    fn key(&self) -> String {
        self.invoice_id.clone()
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.invoice_id, &self.invoice_date]
    }
}

/// Invoice line item — the fact table
///
/// Composite key: (invoice_id, product_id, customer_id). Carries logical
/// foreign keys into the three dimension tables; referential integrity is
/// enforced by write order and by the sinks, not here.
/// Invariant: `quantity > 0` (guaranteed by the sanitizer upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub invoice_id: String,
    pub product_id: String,
    pub customer_id: i64,
    pub quantity: i64,
}

impl Record for InvoiceItem {
    type Key = (String, String, i64);

    const TABLE: Table = Table::InvoiceItems;
    const COLUMNS: &'static [&'static str] =
        &["invoice_id", "product_id", "customer_id", "quantity"];
    const KEY_COLUMNS: &'static [&'static str] = &["invoice_id", "product_id", "customer_id"];

    fn key(&self) -> (String, String, i64) {
        (
            self.invoice_id.clone(),
            self.product_id.clone(),
            self.customer_id,
        )
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.invoice_id,
            &self.product_id,
            &self.customer_id,
            &self.quantity,
        ]
    }
}
