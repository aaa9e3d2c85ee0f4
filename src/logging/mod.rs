//! Logging and observability
//!
//! Structured logging via `tracing`, plus a couple of macros that keep the
//! field names of recurring events consistent across modules.
//!
//! # Example
//!
//! ```no_run
//! use ledgerlift::logging::init_logging;
//! use ledgerlift::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(offset = 200, "Resuming migration");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a committed batch together with the checkpoint it advanced to
///
/// # Example
///
/// ```no_run
/// use ledgerlift::log_batch_committed;
///
/// log_batch_committed!(100, 200, 200);
/// ```
#[macro_export]
macro_rules! log_batch_committed {
    ($batch_size:expr, $offset:expr, $total_migrated:expr) => {
        tracing::info!(
            batch_size = $batch_size,
            offset = $offset,
            total_migrated = $total_migrated,
            "Batch committed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use ledgerlift::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 2000u64, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
