// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mission persistence operations.

use maitre_core::MaitreError;
use maitre_core::types::{
    Mission, MissionFilter, MissionHistory, MissionId, MissionStatus, MissionType, NewMission,
    PaymentCycle, PlaceId, UserId,
};
use rusqlite::{params, params_from_iter};

use crate::database::{Database, map_tr_err};
use crate::models::{MISSION_COLUMNS, fmt_ts, fmt_ts_opt, mission_from_row, ts_col};

/// Insert a new mission with STARTED status; returns it with its rowid.
pub async fn create_mission(db: &Database, mission: NewMission) -> Result<Mission, MaitreError> {
    db.connection()
        .call(move |conn| -> Result<Mission, rusqlite::Error> {
            conn.execute(
                "INSERT INTO missions (mission_type, status, started_at, place_id, \
                 place_group_id, setup_id, assigned_user_id, source_decoded, source_button, \
                 idle_time_seconds) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    mission.mission_type.to_string(),
                    MissionStatus::Started.to_string(),
                    fmt_ts(mission.started_at),
                    mission.place_id,
                    mission.place_group_id,
                    mission.setup_id,
                    mission.assigned_user_id,
                    mission.source_decoded,
                    mission.source_button,
                    mission.idle_time_seconds,
                ],
            )?;
            let id = conn.last_insert_rowid();
            Ok(Mission {
                id,
                mission_type: mission.mission_type,
                status: MissionStatus::Started,
                started_at: mission.started_at,
                acknowledged_at: None,
                finished_at: None,
                place_id: mission.place_id,
                place_group_id: mission.place_group_id,
                setup_id: mission.setup_id,
                assigned_user_id: mission.assigned_user_id,
                source_decoded: mission.source_decoded,
                source_button: mission.source_button,
                idle_time_seconds: mission.idle_time_seconds,
                mission_duration_seconds: None,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a mission by id.
pub async fn get_mission(db: &Database, id: MissionId) -> Result<Option<Mission>, MaitreError> {
    db.connection()
        .call(move |conn| -> Result<Option<Mission>, rusqlite::Error> {
            let mut stmt = conn
                .prepare(&format!("SELECT {MISSION_COLUMNS} FROM missions WHERE id = ?1"))?;
            match stmt.query_row(params![id], mission_from_row) {
                Ok(mission) => Ok(Some(mission)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Duplicate-suppression lookup: find a STARTED mission of `mission_type`,
/// scoped by whichever of `place_id`/`user_id` are supplied.
pub async fn find_started_mission(
    db: &Database,
    mission_type: MissionType,
    place_id: Option<PlaceId>,
    user_id: Option<UserId>,
) -> Result<Option<Mission>, MaitreError> {
    db.connection()
        .call(move |conn| -> Result<Option<Mission>, rusqlite::Error> {
            let mut sql = format!(
                "SELECT {MISSION_COLUMNS} FROM missions WHERE status = ? AND mission_type = ?"
            );
            let mut values: Vec<rusqlite::types::Value> = vec![
                MissionStatus::Started.to_string().into(),
                mission_type.to_string().into(),
            ];
            if let Some(place) = place_id {
                sql.push_str(" AND place_id = ?");
                values.push(place.into());
            }
            if let Some(user) = user_id {
                sql.push_str(" AND assigned_user_id = ?");
                values.push(user.into());
            }
            sql.push_str(" ORDER BY id LIMIT 1");

            let mut stmt = conn.prepare(&sql)?;
            match stmt.query_row(params_from_iter(values), mission_from_row) {
                Ok(mission) => Ok(Some(mission)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

fn update_statement(
    conn: &rusqlite::Connection,
    mission: &Mission,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE missions SET status = ?1, acknowledged_at = ?2, finished_at = ?3, \
         assigned_user_id = ?4, idle_time_seconds = ?5, mission_duration_seconds = ?6 \
         WHERE id = ?7",
        params![
            mission.status.to_string(),
            fmt_ts_opt(mission.acknowledged_at),
            fmt_ts_opt(mission.finished_at),
            mission.assigned_user_id,
            mission.idle_time_seconds,
            mission.mission_duration_seconds,
            mission.id,
        ],
    )?;
    Ok(())
}

/// Persist the mutable fields of a mission.
pub async fn update_mission(db: &Database, mission: &Mission) -> Result<(), MaitreError> {
    let mission = mission.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> { update_statement(conn, &mission) })
        .await
        .map_err(map_tr_err)
}

/// Persist a batch of missions inside one transaction.
pub async fn update_missions(db: &Database, missions: &[Mission]) -> Result<(), MaitreError> {
    let missions = missions.to_vec();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            for mission in &missions {
                update_statement(&tx, mission)?;
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// List missions matching the filter, newest first.
pub async fn list_missions(
    db: &Database,
    filter: &MissionFilter,
) -> Result<Vec<Mission>, MaitreError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<Mission>, rusqlite::Error> {
            let mut sql = format!("SELECT {MISSION_COLUMNS} FROM missions WHERE 1 = 1");
            let mut values: Vec<rusqlite::types::Value> = Vec::new();
            if let Some(status) = filter.status {
                sql.push_str(" AND status = ?");
                values.push(status.to_string().into());
            }
            if let Some(mission_type) = filter.mission_type {
                sql.push_str(" AND mission_type = ?");
                values.push(mission_type.to_string().into());
            }
            if let Some(place_id) = filter.place_id {
                sql.push_str(" AND place_id = ?");
                values.push(place_id.into());
            }
            sql.push_str(" ORDER BY started_at DESC, id DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), mission_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Snapshot the finished-mission history of a place for idle-time computation.
pub async fn place_history(
    db: &Database,
    place_id: PlaceId,
    mission_type: MissionType,
) -> Result<MissionHistory, MaitreError> {
    db.connection()
        .call(move |conn| -> Result<MissionHistory, rusqlite::Error> {
            let finished = MissionStatus::Finished.to_string();

            let mut last_finished = conn.prepare(
                "SELECT finished_at FROM missions WHERE place_id = ?1 AND mission_type = ?2 \
                 AND status = ?3 AND finished_at IS NOT NULL \
                 ORDER BY finished_at DESC LIMIT 1",
            )?;
            let order_finished = match last_finished.query_row(
                params![place_id, MissionType::Order.to_string(), finished],
                |row| ts_col(row, 0),
            ) {
                Ok(ts) => Some(ts),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e),
            };
            let same_type_finished = match last_finished.query_row(
                params![place_id, mission_type.to_string(), finished],
                |row| ts_col(row, 0),
            ) {
                Ok(ts) => Some(ts),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e),
            };

            let mut last_payment_stmt = conn.prepare(
                "SELECT started_at, finished_at FROM missions WHERE place_id = ?1 \
                 AND mission_type IN (?2, ?3) AND status = ?4 AND finished_at IS NOT NULL \
                 ORDER BY started_at DESC LIMIT 1",
            )?;
            let last_payment = match last_payment_stmt.query_row(
                params![
                    place_id,
                    MissionType::Payment.to_string(),
                    MissionType::PaymentEc.to_string(),
                    finished,
                ],
                |row| {
                    Ok(PaymentCycle {
                        started_at: ts_col(row, 0)?,
                        finished_at: ts_col(row, 1)?,
                    })
                },
            ) {
                Ok(cycle) => Some(cycle),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e),
            };

            Ok(MissionHistory {
                last_order_finished_at: order_finished,
                last_same_type_finished_at: same_type_finished,
                last_payment,
            })
        })
        .await
        .map_err(map_tr_err)
}
