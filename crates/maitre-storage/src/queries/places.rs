// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Place lookups. Place provisioning is handled by external tooling; the
//! engine only reads places to resolve mission context.

use maitre_core::MaitreError;
use maitre_core::types::{Place, PlaceId};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::place_from_row;

const COLUMNS: &str = "id, number, description, icon, place_group_id, setup_id, user_id";

/// Fetch a place by id.
pub async fn get_place(db: &Database, id: PlaceId) -> Result<Option<Place>, MaitreError> {
    db.connection()
        .call(move |conn| -> Result<Option<Place>, rusqlite::Error> {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM places WHERE id = ?1"))?;
            match stmt.query_row(params![id], place_from_row) {
                Ok(place) => Ok(Some(place)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
pub(crate) async fn insert_place(db: &Database, place: &Place) {
    let place = place.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO places (id, number, description, icon, place_group_id, \
                 setup_id, user_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    place.id,
                    place.number,
                    place.description,
                    place.icon,
                    place.place_group_id,
                    place.setup_id,
                    place.user_id,
                ],
            )?;
            Ok(())
        })
        .await
        .unwrap();
}
