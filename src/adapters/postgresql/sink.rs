//! PostgreSQL document sink
//!
//! Documents are stored as JSONB bodies in a single collection table. A
//! batch is committed inside one transaction, so a failure at any row
//! leaves no trace of the batch.

use crate::adapters::database::traits::{CommitResult, DocumentSink, PendingDocument};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    count_documents_sql, document_schema_sql, insert_document_sql,
};
use crate::config::schema::SinkConfig;
use crate::domain::{DocumentId, LiftError, Result};
use async_trait::async_trait;

/// Writes ledger documents into a JSONB collection table
pub struct PostgresDocumentSink {
    client: PostgreSQLClient,
    collection: String,
    insert_sql: String,
}

impl PostgresDocumentSink {
    /// Create a sink for `config`
    pub fn new(config: &SinkConfig) -> Result<Self> {
        let insert_sql = insert_document_sql(&config.collection, config.idempotent_writes)?;
        let client = PostgreSQLClient::new(config.postgresql.clone())?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            insert_sql,
        })
    }
}

#[async_trait]
impl DocumentSink for PostgresDocumentSink {
    async fn ensure_schema(&self) -> Result<()> {
        let ddl = document_schema_sql(&self.collection)?;
        let connection = self.client.get_connection().await?;

        connection
            .batch_execute(&ddl)
            .await
            .map_err(|e| LiftError::Sink(format!("Failed to create collection: {e}")))?;

        tracing::info!(collection = %self.collection, "Document collection ready");
        Ok(())
    }

    async fn commit_batch(&self, documents: Vec<PendingDocument>) -> Result<CommitResult> {
        if documents.is_empty() {
            return Ok(CommitResult::empty());
        }

        let mut connection = self.client.get_connection().await?;
        let tx = connection
            .transaction()
            .await
            .map_err(|e| LiftError::Sink(format!("Failed to begin transaction: {e}")))?;

        let mut result = CommitResult::empty();
        for document in &documents {
            let id = DocumentId::generate();
            let body = serde_json::to_value(&document.body)?;
            let dedup_key = document.dedup_key.as_ref().map(|k| k.as_str());

            // Dropping `tx` on the error path rolls the batch back.
            let inserted = tx
                .execute(
                    self.insert_sql.as_str(),
                    &[
                        id.as_uuid(),
                        &dedup_key,
                        &body,
                        &document.body.created_at,
                        &document.body.updated_at,
                    ],
                )
                .await
                .map_err(|e| LiftError::Sink(format!("Insert failed: {e}")))?;

            if inserted == 0 {
                result.duplicates_skipped += 1;
            } else {
                result.written += 1;
                result.document_ids.push(id);
            }
        }

        tx.commit()
            .await
            .map_err(|e| LiftError::Sink(format!("Commit failed: {e}")))?;

        tracing::debug!(
            collection = %self.collection,
            written = result.written,
            duplicates_skipped = result.duplicates_skipped,
            "Batch transaction committed"
        );

        Ok(result)
    }

    async fn count_documents(&self) -> Result<u64> {
        let sql = count_documents_sql(&self.collection)?;
        let connection = self.client.get_connection().await?;

        let row = connection
            .query_one(sql.as_str(), &[])
            .await
            .map_err(|e| LiftError::Sink(format!("Count query failed: {e}")))?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| LiftError::Sink(format!("Failed to decode count: {e}")))?;

        Ok(count.max(0) as u64)
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    fn close(&self) {
        self.client.close();
    }
}
