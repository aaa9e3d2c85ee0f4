//! PostgreSQL row and statement models
//!
//! Maps source result rows to [`SourceRow`] and renders the SQL used by the
//! source and sink adapters. Table and column names are checked against
//! [`is_valid_identifier`] before they are interpolated.

use crate::config::schema::is_valid_identifier;
use crate::domain::{LiftError, Result, SourceRow};
use tokio_postgres::Row;

/// Columns selected from the source, in `SourceRow` field order
pub const SOURCE_COLUMNS: [&str; 9] = [
    "entry_date",
    "office_name",
    "office_code",
    "account_code",
    "account_name",
    "is_debit_natured",
    "opening_balance",
    "total_debit",
    "total_credit",
];

const DOCUMENT_SCHEMA: &str = include_str!("../../../migrations/001_document_collection.sql");

/// Build the paged source query
///
/// Parameters: `$1` window start date, `$2` offset, `$3` limit.
pub fn page_query_sql(table: &str, order_by: &[String]) -> Result<String> {
    ensure_identifier(table)?;
    if order_by.is_empty() {
        return Err(LiftError::Configuration(
            "Source ordering needs at least one column".to_string(),
        ));
    }
    for column in order_by {
        ensure_identifier(column)?;
    }

    Ok(format!(
        "SELECT {} FROM {table} \
         WHERE is_active = TRUE AND entry_date >= $1 \
         ORDER BY {} \
         OFFSET $2 LIMIT $3",
        SOURCE_COLUMNS.join(", "),
        order_by.join(", ")
    ))
}

/// DDL for the document collection
pub fn document_schema_sql(collection: &str) -> Result<String> {
    ensure_identifier(collection)?;
    Ok(DOCUMENT_SCHEMA
        .replace("{{collection}}", collection)
        .replace("{{index_prefix}}", &collection.replace('.', "_")))
}

/// Insert statement for one document
///
/// Parameters: `$1` id, `$2` dedup key, `$3` body, `$4` created_at,
/// `$5` updated_at.
pub fn insert_document_sql(collection: &str, skip_duplicates: bool) -> Result<String> {
    ensure_identifier(collection)?;
    let conflict = if skip_duplicates {
        " ON CONFLICT (dedup_key) DO NOTHING"
    } else {
        ""
    };
    Ok(format!(
        "INSERT INTO {collection} (id, dedup_key, body, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5){conflict}"
    ))
}

/// Count statement for the collection
pub fn count_documents_sql(collection: &str) -> Result<String> {
    ensure_identifier(collection)?;
    Ok(format!("SELECT COUNT(*) FROM {collection}"))
}

/// Decode one source result row
pub fn source_row_from_pg(row: &Row) -> Result<SourceRow> {
    Ok(SourceRow {
        entry_date: column(row, "entry_date")?,
        office_name: column(row, "office_name")?,
        office_code: column(row, "office_code")?,
        account_code: column(row, "account_code")?,
        account_name: column(row, "account_name")?,
        is_debit_natured: column(row, "is_debit_natured")?,
        opening_balance: column(row, "opening_balance")?,
        total_debit: column(row, "total_debit")?,
        total_credit: column(row, "total_credit")?,
    })
}

fn column<'a, T>(row: &'a Row, name: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|e| LiftError::Source(format!("Failed to decode column {name}: {e}")))
}

fn ensure_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(LiftError::Configuration(format!(
            "'{name}' is not a valid SQL identifier"
        )))
    }
}
