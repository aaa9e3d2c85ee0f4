//! Batch reader
//!
//! Turns a checkpoint into exactly one bounded page query against the
//! source. Transient failures are retried with exponential backoff.

use crate::adapters::database::traits::{LedgerSource, PageQuery};
use crate::config::schema::RetryConfig;
use crate::core::state::Checkpoint;
use crate::domain::{Batch, LiftError, Result, SourceRow};
use crate::log_retry_attempt;
use chrono::{Duration as DateDuration, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Reads one page per checkpoint
pub struct BatchReader {
    source: Arc<dyn LedgerSource>,
    page_size: usize,
    window_start: NaiveDate,
    retry: RetryConfig,
}

impl BatchReader {
    /// Create a reader whose window starts `lookback_days` before today
    ///
    /// The window is fixed for the lifetime of the reader.
    pub fn new(
        source: Arc<dyn LedgerSource>,
        page_size: usize,
        lookback_days: u32,
        retry: RetryConfig,
    ) -> Self {
        let window_start = Utc::now().date_naive() - DateDuration::days(i64::from(lookback_days));
        Self::with_window(source, page_size, window_start, retry)
    }

    /// Create a reader with an explicit window start
    pub fn with_window(
        source: Arc<dyn LedgerSource>,
        page_size: usize,
        window_start: NaiveDate,
        retry: RetryConfig,
    ) -> Self {
        Self {
            source,
            page_size,
            window_start,
            retry,
        }
    }

    /// Earliest entry date included in this run
    pub fn window_start(&self) -> NaiveDate {
        self.window_start
    }

    /// Read the page starting at `checkpoint.offset`
    ///
    /// # Errors
    ///
    /// Returns the last source error once retries are exhausted, or
    /// `LiftError::Validation` if the source returns more rows than asked for.
    pub async fn read(&self, checkpoint: &Checkpoint) -> Result<Batch> {
        let query = PageQuery {
            offset: checkpoint.offset,
            limit: self.page_size,
            window_start: self.window_start,
        };

        let rows = self.fetch_with_retry(&query).await?;

        if rows.len() > self.page_size {
            return Err(LiftError::Validation(format!(
                "Source returned {} rows for a page of {} at offset {}",
                rows.len(),
                self.page_size,
                query.offset
            )));
        }

        tracing::debug!(
            offset = query.offset,
            rows = rows.len(),
            window_start = %self.window_start,
            "Page read"
        );

        Ok(Batch::new(query.offset, rows))
    }

    async fn fetch_with_retry(&self, query: &PageQuery) -> Result<Vec<SourceRow>> {
        let max_attempts = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match self.source.fetch_page(query).await {
                Ok(rows) => return Ok(rows),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_attempts || !is_transient(&e) {
                        tracing::error!(
                            offset = query.offset,
                            attempts = attempt,
                            error = %e,
                            "Page read failed"
                        );
                        return Err(e);
                    }

                    let delay_ms = backoff_delay_ms(&self.retry, attempt);
                    log_retry_attempt!(attempt, max_attempts, delay_ms, e);

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based)
pub(crate) fn backoff_delay_ms(retry: &RetryConfig, attempt: usize) -> u64 {
    let exponent = attempt.saturating_sub(1) as i32;
    let delay = retry.initial_delay_ms as f64 * retry.backoff_multiplier.powi(exponent);
    if delay.is_finite() && delay < retry.max_delay_ms as f64 {
        delay as u64
    } else {
        retry.max_delay_ms
    }
}

fn is_transient(error: &LiftError) -> bool {
    matches!(
        error,
        LiftError::Source(_) | LiftError::Connection(_) | LiftError::Io(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use test_case::test_case;

    struct ScriptedSource {
        failures_before_success: usize,
        rows: usize,
        calls: AtomicUsize,
        queries: Mutex<Vec<PageQuery>>,
    }

    impl ScriptedSource {
        fn new(failures_before_success: usize, rows: usize) -> Self {
            Self {
                failures_before_success,
                rows,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    fn row() -> SourceRow {
        SourceRow {
            entry_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            office_name: "Head Office".to_string(),
            office_code: "HO01".to_string(),
            account_code: "1101".to_string(),
            account_name: "Cash".to_string(),
            is_debit_natured: true,
            opening_balance: Decimal::ZERO,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
        }
    }

    #[async_trait]
    impl LedgerSource for ScriptedSource {
        async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<SourceRow>> {
            self.queries.lock().unwrap().push(*query);
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err(LiftError::Source("connection reset".to_string()));
            }
            Ok(vec![row(); self.rows])
        }

        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        fn close(&self) {}
    }

    fn fast_retry(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        }
    }

    #[test_case(1, 1000 ; "first retry")]
    #[test_case(2, 2000 ; "second retry")]
    #[test_case(3, 4000 ; "third retry")]
    #[test_case(10, 30000 ; "capped")]
    fn test_backoff_delay(attempt: usize, expected: u64) {
        assert_eq!(backoff_delay_ms(&RetryConfig::default(), attempt), expected);
    }

    #[tokio::test]
    async fn test_read_issues_one_bounded_query() {
        let source = Arc::new(ScriptedSource::new(0, 3));
        let window = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
        let reader = BatchReader::with_window(source.clone(), 10, window, fast_retry(3));

        let batch = reader.read(&Checkpoint::new(20, 20)).await.unwrap();

        assert_eq!(batch.offset, 20);
        assert_eq!(batch.len(), 3);
        let queries = source.queries.lock().unwrap();
        assert_eq!(
            *queries,
            vec![PageQuery {
                offset: 20,
                limit: 10,
                window_start: window
            }]
        );
    }

    #[tokio::test]
    async fn test_window_is_lookback_from_today() {
        let source = Arc::new(ScriptedSource::new(0, 0));
        let reader = BatchReader::new(source, 10, 365, fast_retry(1));

        let expected = Utc::now().date_naive() - DateDuration::days(365);
        assert_eq!(reader.window_start(), expected);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let source = Arc::new(ScriptedSource::new(2, 1));
        let reader = BatchReader::new(source.clone(), 10, 365, fast_retry(3));

        let batch = reader.read(&Checkpoint::default()).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let source = Arc::new(ScriptedSource::new(5, 1));
        let reader = BatchReader::new(source.clone(), 10, 365, fast_retry(3));

        let err = reader.read(&Checkpoint::default()).await.unwrap_err();

        assert!(matches!(err, LiftError::Source(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_oversized_page_is_rejected() {
        let source = Arc::new(ScriptedSource::new(0, 11));
        let reader = BatchReader::new(source, 10, 365, fast_retry(1));

        let err = reader.read(&Checkpoint::default()).await.unwrap_err();
        assert!(matches!(err, LiftError::Validation(_)));
    }
}
