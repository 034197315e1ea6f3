// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit log.

use maitre_core::MaitreError;
use maitre_core::types::NewEventLog;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::fmt_ts;

/// Append an audit record. Records are never updated or deleted.
pub async fn append(db: &Database, entry: NewEventLog) -> Result<(), MaitreError> {
    let payload = match &entry.payload {
        Some(value) => Some(
            serde_json::to_string(value)
                .map_err(|e| MaitreError::Storage { source: Box::new(e) })?,
        ),
        None => None,
    };
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO event_log (event_type, created_at, mission_id, place_id, \
                 user_id, payload) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.event_type.to_string(),
                    fmt_ts(entry.created_at),
                    entry.mission_id,
                    entry.place_id,
                    entry.user_id,
                    payload,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
