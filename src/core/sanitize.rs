//! Row sanitization
//!
//! This module filters and coerces raw export rows into the canonical
//! [`CleanRow`] shape. Rows failing any cleaning predicate are dropped
//! silently, matching the source export's bulk-filter semantics; only the
//! drop count is surfaced, for diagnostics. The sanitizer never fails for
//! individual bad rows and keeps no global state.

use crate::domain::{CleanRow, RawRow};
use chrono::NaiveDateTime;

/// Timestamp renderings seen in the export, tried in order.
const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Output of a sanitization pass
#[derive(Debug, Clone)]
pub struct Sanitized {
    /// Rows satisfying every cleaning predicate, in input order
    pub rows: Vec<CleanRow>,

    /// Number of rows dropped by the predicates
    pub dropped: usize,
}

/// Filter and coerce raw rows into the canonical record shape
///
/// A row survives when all of the following hold:
/// - customer identifier present and parseable as an integer
/// - description present and non-empty after trimming
/// - `quantity > 0`
/// - `unit_price > 0`
/// - invoice date parseable as a timestamp
///
/// Output order follows input order.
pub fn sanitize(raw: Vec<RawRow>) -> Sanitized {
    let total = raw.len();
    let rows: Vec<CleanRow> = raw.into_iter().filter_map(clean_row).collect();
    let dropped = total - rows.len();

    tracing::info!(
        input_rows = total,
        clean_rows = rows.len(),
        dropped = dropped,
        "Sanitized raw rows"
    );

    Sanitized { rows, dropped }
}

/// Apply the cleaning predicates to one row, coercing on success
fn clean_row(row: RawRow) -> Option<CleanRow> {
    let customer_id = parse_customer_id(row.customer_id.as_deref()?)?;

    let description = row.description?.trim().to_string();
    if description.is_empty() {
        return None;
    }

    if row.quantity <= 0 || row.unit_price <= 0.0 {
        return None;
    }

    let invoice_date = parse_invoice_date(&row.invoice_date)?;

    Some(CleanRow {
        customer_id,
        country: row.country,
        stock_code: row.stock_code,
        description,
        unit_price: row.unit_price,
        invoice_no: row.invoice_no,
        invoice_date,
        quantity: row.quantity,
    })
}

/// Parse a customer identifier as an integer
///
/// The export renders identifiers both as plain integers and as float-form
/// integers (`"17850.0"`); both are accepted. Anything else is rejected.
fn parse_customer_id(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(id) = value.parse::<i64>() {
        return Some(id);
    }

    match value.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

/// Parse an invoice date against the accepted timestamp renderings
fn parse_invoice_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn raw_row() -> RawRow {
        RawRow {
            customer_id: Some("17850".to_string()),
            country: "United Kingdom".to_string(),
            stock_code: "71053".to_string(),
            description: Some("WHITE METAL LANTERN".to_string()),
            unit_price: 3.39,
            invoice_no: "536365".to_string(),
            invoice_date: "12/1/2010 8:26".to_string(),
            quantity: 6,
        }
    }

    #[test]
    fn test_valid_row_survives_and_is_coerced() {
        let result = sanitize(vec![raw_row()]);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.dropped, 0);

        let row = &result.rows[0];
        assert_eq!(row.customer_id, 17850);
        assert_eq!(row.description, "WHITE METAL LANTERN");
        assert_eq!(
            row.invoice_date,
            NaiveDateTime::parse_from_str("2010-12-01 08:26:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
    }

    #[test]
    fn test_missing_customer_id_dropped() {
        let mut row = raw_row();
        row.customer_id = None;

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_unparseable_customer_id_dropped() {
        let mut row = raw_row();
        row.customer_id = Some("not-a-number".to_string());

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_float_form_customer_id_accepted() {
        let mut row = raw_row();
        row.customer_id = Some("17850.0".to_string());

        let result = sanitize(vec![row]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].customer_id, 17850);
    }

    #[test]
    fn test_missing_description_dropped() {
        let mut row = raw_row();
        row.description = None;

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_blank_description_dropped() {
        let mut row = raw_row();
        row.description = Some("   ".to_string());

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
    }

    #[test_case(0 ; "zero quantity")]
    #[test_case(-3 ; "negative quantity")]
    fn test_non_positive_quantity_dropped(quantity: i64) {
        let mut row = raw_row();
        row.quantity = quantity;

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
        assert_eq!(result.dropped, 1);
    }

    #[test_case(0.0 ; "zero price")]
    #[test_case(-1.25 ; "negative price")]
    fn test_non_positive_price_dropped(unit_price: f64) {
        let mut row = raw_row();
        row.unit_price = unit_price;

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_unparseable_date_dropped() {
        let mut row = raw_row();
        row.invoice_date = "sometime in december".to_string();

        let result = sanitize(vec![row]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_iso_date_accepted() {
        let mut row = raw_row();
        row.invoice_date = "2010-12-01 08:26:00".to_string();

        let result = sanitize(vec![row]);
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_drop_count_mixes_reasons() {
        let good = raw_row();

        let mut bad_qty = raw_row();
        bad_qty.quantity = -3;

        let mut bad_customer = raw_row();
        bad_customer.customer_id = None;

        let result = sanitize(vec![good, bad_qty, bad_customer]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.dropped, 2);
    }

    #[test]
    fn test_output_preserves_input_order() {
        let mut first = raw_row();
        first.invoice_no = "536365".to_string();
        let mut second = raw_row();
        second.invoice_no = "536366".to_string();

        let result = sanitize(vec![first, second]);
        assert_eq!(result.rows[0].invoice_no, "536365");
        assert_eq!(result.rows[1].invoice_no, "536366");
    }
}
