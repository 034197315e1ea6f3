// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping helpers shared by the query modules.
//!
//! Timestamps are stored as UTC ISO-8601 text with millisecond precision so
//! that lexicographic `ORDER BY` matches chronological order. Enums are
//! stored as their strum string form.

use chrono::{DateTime, Utc};
use maitre_core::types::{CallButton, Mission, MissionStatus, MissionType, Place};
use rusqlite::Row;
use rusqlite::types::Type;

/// Storage timestamp format: `2026-01-01T12:34:56.789Z`.
pub const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Canonical mission column list; `mission_from_row` expects this order.
pub const MISSION_COLUMNS: &str = "id, mission_type, status, started_at, acknowledged_at, \
     finished_at, place_id, place_group_id, setup_id, assigned_user_id, source_decoded, \
     source_button, idle_time_seconds, mission_duration_seconds";

/// Format a timestamp for storage.
pub fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Format an optional timestamp for storage.
pub fn fmt_ts_opt(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(fmt_ts)
}

fn conv_err(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Parse a stored timestamp column.
pub fn ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conv_err(idx, e))
}

/// Parse an optional stored timestamp column.
pub fn opt_ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conv_err(idx, e))
    })
    .transpose()
}

fn mission_type_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<MissionType> {
    let raw: String = row.get(idx)?;
    raw.parse::<MissionType>().map_err(|e| conv_err(idx, e))
}

fn mission_status_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<MissionStatus> {
    let raw: String = row.get(idx)?;
    raw.parse::<MissionStatus>().map_err(|e| conv_err(idx, e))
}

/// Map a row selected with [`MISSION_COLUMNS`] into a [`Mission`].
pub fn mission_from_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
    Ok(Mission {
        id: row.get(0)?,
        mission_type: mission_type_col(row, 1)?,
        status: mission_status_col(row, 2)?,
        started_at: ts_col(row, 3)?,
        acknowledged_at: opt_ts_col(row, 4)?,
        finished_at: opt_ts_col(row, 5)?,
        place_id: row.get(6)?,
        place_group_id: row.get(7)?,
        setup_id: row.get(8)?,
        assigned_user_id: row.get(9)?,
        source_decoded: row.get(10)?,
        source_button: row.get(11)?,
        idle_time_seconds: row.get(12)?,
        mission_duration_seconds: row.get(13)?,
    })
}

/// Map a `call_buttons` row (id, device_code, button_id, label, place_id).
pub fn call_button_from_row(row: &Row<'_>) -> rusqlite::Result<CallButton> {
    Ok(CallButton {
        id: row.get(0)?,
        device_code: row.get(1)?,
        button_id: row.get(2)?,
        label: row.get(3)?,
        place_id: row.get(4)?,
    })
}

/// Map a `places` row (id, number, description, icon, place_group_id, setup_id, user_id).
pub fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get(0)?,
        number: row.get(1)?,
        description: row.get(2)?,
        icon: row.get(3)?,
        place_group_id: row.get(4)?,
        setup_id: row.get(5)?,
        user_id: row.get(6)?,
    })
}
