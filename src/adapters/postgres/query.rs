//! Ad-hoc query execution
//!
//! Executes a caller-supplied SQL statement against the primary sink and
//! returns column names plus rows as JSON values. This is the datastore
//! side of the ad-hoc querying boundary; generating the SQL (and the HTTP
//! layer in front of it) live elsewhere.

use crate::adapters::postgres::client::PostgresClient;
use crate::domain::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tokio_postgres::Row;

/// Columns and rows returned by one ad-hoc query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Execute a SQL statement and collect its result set
///
/// # Errors
///
/// Returns an error if the statement fails or times out.
pub async fn run_query(client: &PostgresClient, sql: &str) -> Result<QueryOutput> {
    tracing::info!(sql = sql, "Executing ad-hoc query");

    let rows = client.query(sql, &[]).await?;

    let columns: Vec<String> = rows
        .first()
        .map(|row| {
            row.columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect()
        })
        .unwrap_or_default();

    let rows: Vec<Vec<Value>> = rows.iter().map(row_values).collect();

    Ok(QueryOutput { columns, rows })
}

/// Convert one result row into JSON values, by column type
fn row_values(row: &Row) -> Vec<Value> {
    (0..row.columns().len())
        .map(|idx| column_value(row, idx))
        .collect()
}

fn column_value(row: &Row, idx: usize) -> Value {
    match row.columns()[idx].type_().name() {
        "int2" => row
            .get::<_, Option<i16>>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "int4" => row
            .get::<_, Option<i32>>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "int8" => row
            .get::<_, Option<i64>>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "float4" => row
            .get::<_, Option<f32>>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "float8" => row
            .get::<_, Option<f64>>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "bool" => row
            .get::<_, Option<bool>>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "timestamp" => row
            .get::<_, Option<NaiveDateTime>>(idx)
            .map(|ts| Value::from(ts.to_string()))
            .unwrap_or(Value::Null),
        "date" => row
            .get::<_, Option<NaiveDate>>(idx)
            .map(|d| Value::from(d.to_string()))
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<_, Option<String>>(idx)
            .ok()
            .flatten()
            .map(Value::from)
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_output_serializes() {
        let output = QueryOutput {
            columns: vec!["customer_id".to_string(), "country".to_string()],
            rows: vec![vec![Value::from(17850), Value::from("United Kingdom")]],
        };

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["columns"][0], "customer_id");
        assert_eq!(json["rows"][0][0], 17850);
    }
}
