//! Ledger domain models
//!
//! Source rows as read from the relational ledger, the batches they travel
//! in, and the documents written to the sink.

use crate::domain::ids::DedupKey;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One ledger balance row read from the source
///
/// Immutable once read. `opening_balance`, `total_debit` and `total_credit`
/// are the inputs to the saldo computed by the transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    /// Balance date
    pub entry_date: NaiveDate,

    /// Office display name
    pub office_name: String,

    /// Office code
    pub office_code: String,

    /// Chart-of-accounts code
    pub account_code: String,

    /// Account display name
    pub account_name: String,

    /// Whether the account's natural balance grows with debits
    pub is_debit_natured: bool,

    /// Balance at the start of the period
    pub opening_balance: Decimal,

    /// Sum of debits in the period
    pub total_debit: Decimal,

    /// Sum of credits in the period
    pub total_credit: Decimal,
}

/// An ordered page of source rows
///
/// Never longer than the page size it was read with. A batch shorter than
/// the page size is the last one of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Offset the page was read from
    pub offset: u64,

    /// Rows in source order
    pub rows: Vec<SourceRow>,
}

impl Batch {
    /// Create a new batch
    pub fn new(offset: u64, rows: Vec<SourceRow>) -> Self {
        Self { offset, rows }
    }

    /// Number of rows in the batch
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether this batch signals that the source is exhausted
    pub fn is_last(&self, page_size: usize) -> bool {
        self.rows.len() < page_size
    }
}

/// Document written to the sink for one source row
///
/// Created by the transform, written once by the batch writer, never
/// mutated afterwards. The sink assigns its identifier at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    pub entry_date: NaiveDate,
    pub office_name: String,
    pub office_code: String,
    pub account_code: String,
    pub account_name: String,
    pub is_debit_natured: bool,
    pub opening_balance: Decimal,
    pub total_debit: Decimal,
    pub total_credit: Decimal,

    /// Sign-adjusted balance
    pub saldo: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerDocument {
    /// Content-derived key over the business fields
    ///
    /// Timestamps are excluded, so re-transforming the same row yields the
    /// same key.
    pub fn dedup_key(&self) -> DedupKey {
        let mut hasher = Sha256::new();
        for part in [
            self.entry_date.to_string(),
            self.office_code.clone(),
            self.office_name.clone(),
            self.account_code.clone(),
            self.account_name.clone(),
            self.is_debit_natured.to_string(),
            self.opening_balance.normalize().to_string(),
            self.total_debit.normalize().to_string(),
            self.total_credit.normalize().to_string(),
            self.saldo.normalize().to_string(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0x1f]);
        }

        DedupKey::from_digest(&hasher.finalize())
    }

    /// Whether two documents agree on every field except the timestamps
    pub fn same_content(&self, other: &LedgerDocument) -> bool {
        self.entry_date == other.entry_date
            && self.office_name == other.office_name
            && self.office_code == other.office_code
            && self.account_code == other.account_code
            && self.account_name == other.account_name
            && self.is_debit_natured == other.is_debit_natured
            && self.opening_balance == other.opening_balance
            && self.total_debit == other.total_debit
            && self.total_credit == other.total_credit
            && self.saldo == other.saldo
    }
}
