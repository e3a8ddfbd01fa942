//! Entity decomposition
//!
//! Projects sanitized rows into the four entity collections using fixed
//! field projections and renames. Pure and deterministic: output order
//! follows input order, because downstream deduplication keeps the first
//! occurrence per key.

use crate::domain::{CleanRow, Customer, Invoice, InvoiceItem, Product};

/// The four raw (non-deduplicated) entity collections of one run
#[derive(Debug, Clone, Default)]
pub struct EntitySets {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    pub invoice_items: Vec<InvoiceItem>,
}

/// Project sanitized rows into the four entity collections
///
/// Every input row contributes one element to each collection; duplicates
/// are resolved later by the deduplicator.
pub fn decompose(rows: &[CleanRow]) -> EntitySets {
    let mut sets = EntitySets {
        customers: Vec::with_capacity(rows.len()),
        products: Vec::with_capacity(rows.len()),
        invoices: Vec::with_capacity(rows.len()),
        invoice_items: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        sets.customers.push(Customer {
            customer_id: row.customer_id,
            country: row.country.clone(),
        });

        sets.products.push(Product {
            product_id: row.stock_code.clone(),
            description: row.description.clone(),
            unit_price: row.unit_price,
        });

        sets.invoices.push(Invoice {
            invoice_id: row.invoice_no.clone(),
            invoice_date: row.invoice_date,
        });

        sets.invoice_items.push(InvoiceItem {
            invoice_id: row.invoice_no.clone(),
            product_id: row.stock_code.clone(),
            customer_id: row.customer_id,
            quantity: row.quantity,
        });
    }

    tracing::debug!(
        rows = rows.len(),
        customers = sets.customers.len(),
        products = sets.products.len(),
        invoices = sets.invoices.len(),
        invoice_items = sets.invoice_items.len(),
        "Decomposed rows into entity collections"
    );

    sets
}
