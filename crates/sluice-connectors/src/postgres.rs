//! Analytics-database operations: truncate-and-COPY bulk loads and
//! transformation statements.

use std::path::Path;

use bytes::Bytes;
use futures_util::SinkExt;
use tokio_postgres::{Client, NoTls};

use sluice_types::ExecutionError;

/// Connect to the analytics database.
///
/// # Errors
///
/// Returns [`ExecutionError::Database`] when the connection cannot be
/// established.
pub async fn connect(url: &str) -> Result<Client, ExecutionError> {
    let (client, connection) = tokio_postgres::connect(url, NoTls)
        .await
        .map_err(|e| ExecutionError::Database(format!("connection failed: {e}")))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!("PostgreSQL connection error: {e}");
        }
    });

    Ok(client)
}

/// COPY statement matching the intermediate file convention bit for bit.
pub(crate) fn copy_statement(table: &str) -> String {
    format!("COPY {table} FROM STDIN WITH (FORMAT csv, DELIMITER '|', QUOTE '^', HEADER true)")
}

/// Truncate the target relation and repopulate it wholesale from the
/// intermediate file. DDL, truncate, and COPY run in one transaction: a
/// failed load leaves the relation fully truncated or fully reloaded,
/// never partially.
///
/// Table names come from operator-authored job files and are interpolated
/// as written.
///
/// # Errors
///
/// Returns [`ExecutionError::Io`] if the intermediate file cannot be read,
/// [`ExecutionError::Database`] on any statement or COPY failure.
pub async fn bulk_load(
    client: &mut Client,
    table: &str,
    ddl: Option<&str>,
    file: &Path,
) -> Result<u64, ExecutionError> {
    let data = std::fs::read(file)?;

    let tx = client
        .transaction()
        .await
        .map_err(|e| ExecutionError::Database(format!("begin failed: {e}")))?;

    if let Some(ddl) = ddl {
        tx.batch_execute(ddl)
            .await
            .map_err(|e| ExecutionError::Database(format!("ddl failed: {e}")))?;
    }

    tx.execute(&format!("TRUNCATE {table}"), &[])
        .await
        .map_err(|e| ExecutionError::Database(format!("truncate {table} failed: {e}")))?;

    let sink = tx
        .copy_in(&copy_statement(table))
        .await
        .map_err(|e| ExecutionError::Database(format!("COPY start failed: {e}")))?;
    let mut sink = Box::pin(sink);
    sink.send(Bytes::from(data))
        .await
        .map_err(|e| ExecutionError::Database(format!("COPY send failed: {e}")))?;
    let rows = sink
        .as_mut()
        .finish()
        .await
        .map_err(|e| ExecutionError::Database(format!("COPY finish failed: {e}")))?;

    tx.commit()
        .await
        .map_err(|e| ExecutionError::Database(format!("commit failed: {e}")))?;

    Ok(rows)
}

/// Execute a transformation statement against already-loaded data.
///
/// # Errors
///
/// Returns [`ExecutionError::Transform`] on statement failure.
pub async fn run_transform(client: &Client, query: &str) -> Result<(), ExecutionError> {
    client
        .batch_execute(query)
        .await
        .map_err(|e| ExecutionError::Transform(e.to_string()))
}
