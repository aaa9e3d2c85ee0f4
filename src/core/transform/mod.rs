//! Row to document transformation
//!
//! Maps one relational ledger row to one sink document. The only computed
//! field is `saldo`, the signed closing balance:
//!
//! ```text
//! base  = opening_balance + total_debit - total_credit
//! saldo = base   if the account is debit-natured
//!       = -base  otherwise
//! ```
//!
//! # Examples
//!
//! ```
//! use chrono::{NaiveDate, Utc};
//! use ledgerlift::core::transform::apply_at;
//! use ledgerlift::domain::SourceRow;
//! use rust_decimal::Decimal;
//!
//! let row = SourceRow {
//!     entry_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
//!     office_name: "Head Office".to_string(),
//!     office_code: "HO01".to_string(),
//!     account_code: "2101".to_string(),
//!     account_name: "Customer deposits".to_string(),
//!     is_debit_natured: false,
//!     opening_balance: Decimal::new(100, 0),
//!     total_debit: Decimal::new(50, 0),
//!     total_credit: Decimal::new(20, 0),
//! };
//!
//! let document = apply_at(&row, Utc::now()).unwrap();
//! assert_eq!(document.saldo, Decimal::new(-130, 0));
//! ```

use crate::domain::{Batch, LedgerDocument, LiftError, Result, SourceRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Transform a row, stamping the current time
pub fn apply(row: &SourceRow) -> Result<LedgerDocument> {
    apply_at(row, Utc::now())
}

/// Transform a row with an explicit timestamp
///
/// `created_at` and `updated_at` are both set to `now`.
///
/// # Errors
///
/// Returns `LiftError::Transform` if the balance arithmetic overflows.
pub fn apply_at(row: &SourceRow, now: DateTime<Utc>) -> Result<LedgerDocument> {
    let saldo = saldo(row)?;

    Ok(LedgerDocument {
        entry_date: row.entry_date,
        office_name: row.office_name.clone(),
        office_code: row.office_code.clone(),
        account_code: row.account_code.clone(),
        account_name: row.account_name.clone(),
        is_debit_natured: row.is_debit_natured,
        opening_balance: row.opening_balance,
        total_debit: row.total_debit,
        total_credit: row.total_credit,
        saldo,
        created_at: now,
        updated_at: now,
    })
}

/// Transform every row of a batch, preserving order
///
/// All documents of one batch share a single timestamp.
pub fn transform_batch(batch: &Batch) -> Result<Vec<LedgerDocument>> {
    let now = Utc::now();
    batch.rows.iter().map(|row| apply_at(row, now)).collect()
}

fn saldo(row: &SourceRow) -> Result<Decimal> {
    let base = row
        .opening_balance
        .checked_add(row.total_debit)
        .and_then(|sum| sum.checked_sub(row.total_credit))
        .ok_or_else(|| {
            LiftError::Transform(format!(
                "Balance overflow for account {} at office {} on {}",
                row.account_code, row.office_code, row.entry_date
            ))
        })?;

    Ok(if row.is_debit_natured { base } else { -base })
}
