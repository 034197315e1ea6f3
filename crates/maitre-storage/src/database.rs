// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: `Database` wraps a single `tokio_rusqlite::Connection`, query
//! modules accept `&Database` and go through `connection().call()`. Do NOT
//! create additional `Connection` instances for writes.

use std::path::Path;

use maitre_core::MaitreError;
use tracing::debug;

/// Convert a tokio-rusqlite error into `MaitreError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MaitreError {
    MaitreError::Storage { source: Box::new(e) }
}

/// Handle to the single-writer SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, MaitreError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| MaitreError::Storage { source: Box::new(e) })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| MaitreError::Storage { source: Box::new(e) })?;

        conn.call(move |conn| -> Result<(), MaitreError> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| MaitreError::Storage { source: Box::new(e) })?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(|e| MaitreError::Storage { source: Box::new(e) })?;
            crate::migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| MaitreError::Storage { source: Box::new(e) })?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection (single writer).
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), MaitreError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
