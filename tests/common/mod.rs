//! Shared fixtures for integration tests
//!
//! In-memory implementations of the source and sink traits with failure
//! injection and close counting.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use ledgerlift::adapters::database::{
    CommitResult, DocumentSink, LedgerSource, MigrationClients, PageQuery, PendingDocument,
};
use ledgerlift::config::LedgerliftConfig;
use ledgerlift::domain::{DocumentId, LedgerDocument, LiftError, Result, SourceRow};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// `count` distinct active rows dated within the last few days
pub fn ledger_rows(count: usize) -> Vec<SourceRow> {
    let today = Utc::now().date_naive();
    (0..count)
        .map(|i| SourceRow {
            entry_date: today - Duration::days((i % 7) as i64),
            office_name: format!("Office {}", i % 3),
            office_code: format!("OF{:02}", i % 3),
            account_code: format!("{:06}", i),
            account_name: format!("Account {i}"),
            is_debit_natured: i % 2 == 0,
            opening_balance: Decimal::new(10_000 + i as i64, 2),
            total_debit: Decimal::new(500, 2),
            total_credit: Decimal::new(250, 2),
        })
        .collect()
}

/// Ordered in-memory ledger
///
/// Serves `rows[offset..offset + limit]` for rows inside the window.
pub struct InMemoryLedger {
    rows: Vec<SourceRow>,
    pub queries: Mutex<Vec<PageQuery>>,
    pub closes: AtomicUsize,
    fail_at_offset: Mutex<Option<u64>>,
}

impl InMemoryLedger {
    pub fn new(rows: Vec<SourceRow>) -> Self {
        Self {
            rows,
            queries: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            fail_at_offset: Mutex::new(None),
        }
    }

    /// Every read at `offset` fails until cleared
    pub fn fail_at(&self, offset: Option<u64>) {
        *self.fail_at_offset.lock().unwrap() = offset;
    }

    pub fn offsets_read(&self) -> Vec<u64> {
        self.queries.lock().unwrap().iter().map(|q| q.offset).collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSource for InMemoryLedger {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<SourceRow>> {
        self.queries.lock().unwrap().push(*query);

        if *self.fail_at_offset.lock().unwrap() == Some(query.offset) {
            return Err(LiftError::Source(format!(
                "injected read failure at offset {}",
                query.offset
            )));
        }

        Ok(self
            .rows
            .iter()
            .filter(|row| row.entry_date >= query.window_start)
            .skip(query.offset as usize)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory document collection with transactional batch commits
pub struct InMemoryDocumentStore {
    documents: Mutex<Vec<(DocumentId, LedgerDocument)>>,
    keys: Mutex<HashSet<String>>,
    commits: AtomicUsize,
    fail_on_commit: Mutex<Option<usize>>,
    shutdown_after: Mutex<Option<(usize, watch::Sender<bool>)>>,
    pub closes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            keys: Mutex::new(HashSet::new()),
            commits: AtomicUsize::new(0),
            fail_on_commit: Mutex::new(None),
            shutdown_after: Mutex::new(None),
            closes: AtomicUsize::new(0),
        }
    }

    /// The `n`th commit call (1-based) fails and stores nothing
    pub fn fail_on_commit(&self, n: Option<usize>) {
        *self.fail_on_commit.lock().unwrap() = n;
    }

    /// Signal shutdown once `n` commits have succeeded
    pub fn shutdown_after(&self, n: usize, sender: watch::Sender<bool>) {
        *self.shutdown_after.lock().unwrap() = Some((n, sender));
    }

    pub fn documents(&self) -> Vec<LedgerDocument> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .map(|(_, d)| d.clone())
            .collect()
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    /// How many stored documents share `account_code`
    pub fn copies_of(&self, account_code: &str) -> usize {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, d)| d.account_code == account_code)
            .count()
    }

    pub fn commit_calls(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSink for InMemoryDocumentStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn commit_batch(&self, documents: Vec<PendingDocument>) -> Result<CommitResult> {
        let call = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_on_commit.lock().unwrap() == Some(call) {
            return Err(LiftError::Sink(format!("injected commit failure on call {call}")));
        }

        // Stage everything, then apply at once.
        let mut keys = self.keys.lock().unwrap();
        let mut staged_keys = HashSet::new();
        let mut staged = Vec::new();
        let mut result = CommitResult::empty();

        for document in documents {
            if let Some(key) = &document.dedup_key {
                let key = key.as_str().to_string();
                if keys.contains(&key) || !staged_keys.insert(key) {
                    result.duplicates_skipped += 1;
                    continue;
                }
            }
            let id = DocumentId::generate();
            result.written += 1;
            result.document_ids.push(id);
            staged.push((id, document.body));
        }

        keys.extend(staged_keys);
        self.documents.lock().unwrap().extend(staged);
        drop(keys);

        let mut hook = self.shutdown_after.lock().unwrap();
        if let Some((after, sender)) = hook.as_ref() {
            if call >= *after {
                let _ = sender.send(true);
                *hook = None;
            }
        }

        Ok(result)
    }

    async fn count_documents(&self) -> Result<u64> {
        Ok(self.document_count() as u64)
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Configuration pointing at `checkpoint` with no startup delay and fast retries
pub fn test_config(checkpoint: &Path, page_size: usize) -> LedgerliftConfig {
    let contents = format!(
        r#"
[source]
connection_string = "postgresql://reader:pw@ledger-db:5432/ledger"
lookback_days = 365

[sink]
connection_string = "postgresql://writer:pw@docs-db:5432/documents"

[migration]
page_size = {page_size}
startup_delay_secs = 0
checkpoint_path = "{}"

[migration.retry]
max_retries = 3
initial_delay_ms = 1
max_delay_ms = 5
backoff_multiplier = 2.0
"#,
        checkpoint.display()
    );
    let config: LedgerliftConfig = toml::from_str(&contents).expect("test config parses");
    config.validate().expect("test config is valid");
    config
}

/// Wrap shared source and sink handles in a fresh client guard
pub fn clients(
    ledger: &Arc<InMemoryLedger>,
    store: &Arc<InMemoryDocumentStore>,
) -> MigrationClients {
    MigrationClients::new(ledger.clone(), store.clone())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
