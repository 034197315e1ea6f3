// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable store for missions, places, call-buttons, and event-log entries.

use async_trait::async_trait;

use crate::error::MaitreError;
use crate::types::{
    CallButton, Mission, MissionFilter, MissionHistory, MissionId, MissionType, NewCallButton,
    NewEventLog, NewMission, Place, PlaceId, UserId,
};

/// Persistence port for the mission lifecycle engine.
///
/// All operations are one logical statement or transaction against the
/// backing store; storage failures propagate unchanged to the engine.
#[async_trait]
pub trait MissionRepository: Send + Sync {
    /// Find a STARTED mission matching `mission_type` and whichever of
    /// `place_id`/`user_id` are supplied. Omitted filters match any value.
    ///
    /// This is the duplicate-suppression lookup: the find-then-insert pair
    /// in the engine is not atomic across calls.
    async fn find_started_mission(
        &self,
        mission_type: MissionType,
        place_id: Option<PlaceId>,
        user_id: Option<UserId>,
    ) -> Result<Option<Mission>, MaitreError>;

    /// Fetch a mission by id.
    async fn get_mission(&self, id: MissionId) -> Result<Option<Mission>, MaitreError>;

    /// Fetch a place by id.
    async fn get_place(&self, id: PlaceId) -> Result<Option<Place>, MaitreError>;

    /// Look up a call-button by its unique device code.
    async fn get_call_button_by_device_code(
        &self,
        device_code: &str,
    ) -> Result<Option<CallButton>, MaitreError>;

    /// Register a call-button (out-of-band provisioning or learning mode).
    async fn create_call_button(
        &self,
        call_button: NewCallButton,
    ) -> Result<CallButton, MaitreError>;

    /// Persist a new mission with STARTED status; returns it with its assigned id.
    async fn create_mission(&self, mission: NewMission) -> Result<Mission, MaitreError>;

    /// Persist the mutable fields of an existing mission.
    async fn update_mission(&self, mission: &Mission) -> Result<(), MaitreError>;

    /// Persist a batch of missions as a single transaction.
    ///
    /// Used by the batch cancel/finish operations: the whole batch is atomic
    /// at the storage boundary.
    async fn update_missions(&self, missions: &[Mission]) -> Result<(), MaitreError>;

    /// List missions matching the filter, newest first.
    async fn list_missions(&self, filter: &MissionFilter) -> Result<Vec<Mission>, MaitreError>;

    /// Snapshot the finished-mission history of a place for idle-time
    /// computation against missions of `mission_type` starting now.
    async fn place_history(
        &self,
        place_id: PlaceId,
        mission_type: MissionType,
    ) -> Result<MissionHistory, MaitreError>;

    /// Append an audit record to the event log.
    async fn append_event_log(&self, entry: NewEventLog) -> Result<(), MaitreError>;
}
