// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementation of [`MissionRepository`].

use async_trait::async_trait;
use maitre_config::StorageConfig;
use maitre_core::MaitreError;
use maitre_core::traits::MissionRepository;
use maitre_core::types::{
    CallButton, Mission, MissionFilter, MissionHistory, MissionId, MissionType, NewCallButton,
    NewEventLog, NewMission, Place, PlaceId, UserId,
};

use crate::database::Database;
use crate::queries;

/// Repository adapter over the single-writer SQLite connection.
pub struct SqliteRepository {
    db: Database,
}

impl SqliteRepository {
    /// Open the configured database, running migrations if needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, MaitreError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self { db })
    }

    /// Wrap an already-open database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint and flush before shutdown.
    pub async fn close(&self) -> Result<(), MaitreError> {
        self.db.close().await
    }
}

#[async_trait]
impl MissionRepository for SqliteRepository {
    async fn find_started_mission(
        &self,
        mission_type: MissionType,
        place_id: Option<PlaceId>,
        user_id: Option<UserId>,
    ) -> Result<Option<Mission>, MaitreError> {
        queries::missions::find_started_mission(&self.db, mission_type, place_id, user_id).await
    }

    async fn get_mission(&self, id: MissionId) -> Result<Option<Mission>, MaitreError> {
        queries::missions::get_mission(&self.db, id).await
    }

    async fn get_place(&self, id: PlaceId) -> Result<Option<Place>, MaitreError> {
        queries::places::get_place(&self.db, id).await
    }

    async fn get_call_button_by_device_code(
        &self,
        device_code: &str,
    ) -> Result<Option<CallButton>, MaitreError> {
        queries::call_buttons::get_by_device_code(&self.db, device_code).await
    }

    async fn create_call_button(
        &self,
        call_button: NewCallButton,
    ) -> Result<CallButton, MaitreError> {
        queries::call_buttons::create(&self.db, call_button).await
    }

    async fn create_mission(&self, mission: NewMission) -> Result<Mission, MaitreError> {
        queries::missions::create_mission(&self.db, mission).await
    }

    async fn update_mission(&self, mission: &Mission) -> Result<(), MaitreError> {
        queries::missions::update_mission(&self.db, mission).await
    }

    async fn update_missions(&self, missions: &[Mission]) -> Result<(), MaitreError> {
        queries::missions::update_missions(&self.db, missions).await
    }

    async fn list_missions(&self, filter: &MissionFilter) -> Result<Vec<Mission>, MaitreError> {
        queries::missions::list_missions(&self.db, filter).await
    }

    async fn place_history(
        &self,
        place_id: PlaceId,
        mission_type: MissionType,
    ) -> Result<MissionHistory, MaitreError> {
        queries::missions::place_history(&self.db, place_id, mission_type).await
    }

    async fn append_event_log(&self, entry: NewEventLog) -> Result<(), MaitreError> {
        queries::event_log::append(&self.db, entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_from_config_and_exercise_trait() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("repo.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let repo = SqliteRepository::open(&config).await.unwrap();

        // Drive through the trait object to keep the adapter honest.
        let repo: &dyn MissionRepository = &repo;
        let created = repo
            .create_mission(NewMission {
                mission_type: MissionType::Assistance,
                started_at: Utc.with_ymd_and_hms(2026, 5, 1, 18, 30, 0).unwrap(),
                place_id: None,
                place_group_id: None,
                setup_id: None,
                assigned_user_id: None,
                source_decoded: Some("D00D1E".to_string()),
                source_button: Some(5),
                idle_time_seconds: None,
            })
            .await
            .unwrap();

        let found = repo
            .find_started_mission(MissionType::Assistance, None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.source_decoded.as_deref(), Some("D00D1E"));
    }
}
