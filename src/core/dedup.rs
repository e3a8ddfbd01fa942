//! Key-based deduplication
//!
//! Reduces an entity collection to at most one record per distinct natural
//! key, keeping the first-seen occurrence in its original position.
//! Equality is by key only: two records with equal key but differing
//! non-key fields are not reconciled, the first occurrence silently wins.
//! This mirrors the source export's drop-duplicates-by-key behavior and is
//! an intentional simplification, not last-write-wins.

use crate::domain::Record;
use std::collections::HashSet;

/// Keep the first occurrence per distinct key, preserving order
///
/// Idempotent: deduplicating an already-deduplicated collection returns it
/// unchanged.
pub fn dedup_by_key<R: Record>(records: Vec<R>) -> Vec<R> {
    let before = records.len();
    let mut seen: HashSet<R::Key> = HashSet::with_capacity(records.len());
    let deduped: Vec<R> = records
        .into_iter()
        .filter(|record| seen.insert(record.key()))
        .collect();

    if deduped.len() < before {
        tracing::debug!(
            table = %R::TABLE,
            input = before,
            unique = deduped.len(),
            "Dropped duplicate keys"
        );
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, InvoiceItem, Product};

    #[test]
    fn test_first_occurrence_wins() {
        let records = vec![
            Product {
                product_id: "71053".to_string(),
                description: "WHITE METAL LANTERN".to_string(),
                unit_price: 3.39,
            },
            Product {
                product_id: "71053".to_string(),
                description: "WHITE METAL LANTERN, LARGE".to_string(),
                unit_price: 4.25,
            },
        ];

        let deduped = dedup_by_key(records);
        assert_eq!(deduped.len(), 1);
        // Non-key fields of the first occurrence are kept, not reconciled
        assert_eq!(deduped[0].description, "WHITE METAL LANTERN");
        assert_eq!(deduped[0].unit_price, 3.39);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            Customer {
                customer_id: 13047,
                country: "United Kingdom".to_string(),
            },
            Customer {
                customer_id: 17850,
                country: "United Kingdom".to_string(),
            },
            Customer {
                customer_id: 13047,
                country: "France".to_string(),
            },
        ];

        let deduped = dedup_by_key(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].customer_id, 13047);
        assert_eq!(deduped[1].customer_id, 17850);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            Customer {
                customer_id: 17850,
                country: "United Kingdom".to_string(),
            },
            Customer {
                customer_id: 17850,
                country: "United Kingdom".to_string(),
            },
            Customer {
                customer_id: 13047,
                country: "France".to_string(),
            },
        ];

        let once = dedup_by_key(records);
        let twice = dedup_by_key(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_composite_key_distinguishes_rows() {
        let records = vec![
            InvoiceItem {
                invoice_id: "536365".to_string(),
                product_id: "71053".to_string(),
                customer_id: 17850,
                quantity: 6,
            },
            // Same invoice and product, different customer: distinct key
            InvoiceItem {
                invoice_id: "536365".to_string(),
                product_id: "71053".to_string(),
                customer_id: 13047,
                quantity: 2,
            },
            // Exact key repeat: dropped
            InvoiceItem {
                invoice_id: "536365".to_string(),
                product_id: "71053".to_string(),
                customer_id: 17850,
                quantity: 12,
            },
        ];

        let deduped = dedup_by_key(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].quantity, 6);
    }

    #[test]
    fn test_empty_input() {
        let deduped = dedup_by_key(Vec::<Customer>::new());
        assert!(deduped.is_empty());
    }
}
