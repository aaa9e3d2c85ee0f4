//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LedgerliftConfig;
use super::secret_string;
use crate::domain::errors::LiftError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LedgerliftConfig
/// 4. Applies environment variable overrides (LEDGERLIFT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `LiftError::Configuration` if the file is missing or unreadable,
/// a referenced variable is unset, the TOML is malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ledgerlift::config::loader::load_config;
///
/// let config = load_config("ledgerlift.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LedgerliftConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LiftError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LiftError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LedgerliftConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        LiftError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(
        path = %path.display(),
        source = %config.source.postgresql.connection_string_safe(),
        sink = %config.sink.postgresql.connection_string_safe(),
        page_size = config.migration.page_size,
        "Configuration loaded"
    );

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LiftError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LiftError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the LEDGERLIFT_* prefix
///
/// Variables follow `LEDGERLIFT_<SECTION>_<KEY>`, for example
/// `LEDGERLIFT_MIGRATION_PAGE_SIZE`. Unparseable numeric values are ignored.
fn apply_env_overrides(config: &mut LedgerliftConfig) {
    // Application
    if let Ok(val) = std::env::var("LEDGERLIFT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Source
    if let Ok(val) = std::env::var("LEDGERLIFT_SOURCE_CONNECTION_STRING") {
        config.source.postgresql.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_SOURCE_TABLE") {
        config.source.table = val;
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_SOURCE_LOOKBACK_DAYS") {
        if let Ok(days) = val.parse() {
            config.source.lookback_days = days;
        }
    }

    // Sink
    if let Ok(val) = std::env::var("LEDGERLIFT_SINK_CONNECTION_STRING") {
        config.sink.postgresql.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_SINK_COLLECTION") {
        config.sink.collection = val;
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_SINK_IDEMPOTENT_WRITES") {
        config.sink.idempotent_writes = val.parse().unwrap_or(false);
    }

    // Migration
    if let Ok(val) = std::env::var("LEDGERLIFT_MIGRATION_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.migration.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_MIGRATION_STARTUP_DELAY_SECS") {
        if let Ok(secs) = val.parse() {
            config.migration.startup_delay_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_MIGRATION_CHECKPOINT_PATH") {
        config.migration.checkpoint_path = PathBuf::from(val);
    }

    // Logging
    if let Ok(val) = std::env::var("LEDGERLIFT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LEDGERLIFT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[source]
connection_string = "postgresql://reader:pw@ledger-db:5432/ledger"

[sink]
connection_string = "postgresql://writer:pw@docs-db:5432/documents"
"#;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOADER_TEST_DSN", "postgresql://u:p@h/db");
        let input = "connection_string = \"${LOADER_TEST_DSN}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "connection_string = \"postgresql://u:p@h/db\"\n");
        std::env::remove_var("LOADER_TEST_DSN");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOADER_TEST_MISSING");
        let input = "connection_string = \"${LOADER_TEST_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LOADER_TEST_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LOADER_TEST_COMMENTED");
        let input = "# connection_string = \"${LOADER_TEST_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(LiftError::Configuration(_))));
    }

    #[test]
    fn test_load_config_minimal_uses_defaults() {
        let file = write_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.migration.page_size, 100);
        assert_eq!(config.source.lookback_days, 365);
        assert_eq!(config.source.table, "account_balances");
        assert_eq!(config.sink.collection, "saldo_documents");
        assert!(!config.sink.idempotent_writes);
        assert!(!config.application.dry_run);
    }

    #[test]
    fn test_load_config_rejects_invalid_page_size() {
        let contents = format!("{MINIMAL}\n[migration]\npage_size = 0\n");
        let file = write_config(&contents);
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_load_config_rejects_malformed_toml() {
        let file = write_config("[source\nconnection_string = ");
        assert!(matches!(
            load_config(file.path()),
            Err(LiftError::Configuration(_))
        ));
    }
}
