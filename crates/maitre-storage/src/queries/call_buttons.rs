// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-button registry operations.

use maitre_core::MaitreError;
use maitre_core::types::{CallButton, NewCallButton};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::call_button_from_row;

const COLUMNS: &str = "id, device_code, button_id, label, place_id";

/// Look up a call-button by its decoded device code.
pub async fn get_by_device_code(
    db: &Database,
    device_code: &str,
) -> Result<Option<CallButton>, MaitreError> {
    let device_code = device_code.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<CallButton>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM call_buttons WHERE device_code = ?1"
            ))?;
            match stmt.query_row(params![device_code], call_button_from_row) {
                Ok(button) => Ok(Some(button)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Register a call-button; `device_code` is unique.
pub async fn create(db: &Database, button: NewCallButton) -> Result<CallButton, MaitreError> {
    db.connection()
        .call(move |conn| -> Result<CallButton, rusqlite::Error> {
            conn.execute(
                "INSERT INTO call_buttons (device_code, button_id, label, place_id) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![button.device_code, button.button_id, button.label, button.place_id],
            )?;
            Ok(CallButton {
                id: conn.last_insert_rowid(),
                device_code: button.device_code,
                button_id: button.button_id,
                label: button.label,
                place_id: button.place_id,
            })
        })
        .await
        .map_err(map_tr_err)
}
