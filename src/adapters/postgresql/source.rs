//! PostgreSQL ledger source

use crate::adapters::database::traits::{LedgerSource, PageQuery};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{page_query_sql, source_row_from_pg};
use crate::config::schema::SourceConfig;
use crate::domain::{LiftError, Result, SourceRow};
use async_trait::async_trait;

/// Reads ledger balance rows page by page
pub struct PostgresLedgerSource {
    client: PostgreSQLClient,
    page_sql: String,
}

impl PostgresLedgerSource {
    /// Create a source for `config`
    ///
    /// The page query is rendered once up front.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let page_sql = page_query_sql(&config.table, &config.order_by)?;
        let client = PostgreSQLClient::new(config.postgresql.clone())?;

        tracing::debug!(sql = %page_sql, "Prepared source page query");

        Ok(Self { client, page_sql })
    }
}

#[async_trait]
impl LedgerSource for PostgresLedgerSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<SourceRow>> {
        let offset = i64::try_from(query.offset)
            .map_err(|_| LiftError::Validation(format!("Offset {} out of range", query.offset)))?;
        let limit = i64::try_from(query.limit)
            .map_err(|_| LiftError::Validation(format!("Limit {} out of range", query.limit)))?;

        let connection = self.client.get_connection().await?;
        let rows = connection
            .query(
                self.page_sql.as_str(),
                &[&query.window_start, &offset, &limit],
            )
            .await
            .map_err(|e| LiftError::Source(format!("Page query failed: {e}")))?;

        rows.iter().map(source_row_from_pg).collect()
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    fn close(&self) {
        self.client.close();
    }
}
