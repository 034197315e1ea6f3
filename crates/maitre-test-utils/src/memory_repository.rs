// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory repository for deterministic engine tests.
//!
//! Mirrors the semantics of the SQLite adapter, including the history
//! snapshot used for idle-time computation, without touching the filesystem.

use async_trait::async_trait;
use tokio::sync::Mutex;

use maitre_core::MaitreError;
use maitre_core::traits::MissionRepository;
use maitre_core::types::{
    CallButton, Mission, MissionFilter, MissionHistory, MissionId, MissionStatus, MissionType,
    NewCallButton, NewEventLog, NewMission, PaymentCycle, Place, PlaceId, UserId,
};

#[derive(Default)]
struct State {
    missions: Vec<Mission>,
    places: Vec<Place>,
    call_buttons: Vec<CallButton>,
    events: Vec<NewEventLog>,
    next_mission_id: MissionId,
    next_button_id: i64,
}

/// In-memory [`MissionRepository`] with seed and inspection helpers.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a place for lookups.
    pub async fn add_place(&self, place: Place) {
        self.state.lock().await.places.push(place);
    }

    /// Seed a pre-registered call-button.
    pub async fn add_call_button(&self, button: CallButton) {
        self.state.lock().await.call_buttons.push(button);
    }

    /// Insert a mission verbatim, bypassing the STARTED default. Useful for
    /// seeding finished history rows.
    pub async fn add_mission(&self, mission: Mission) {
        let mut state = self.state.lock().await;
        state.next_mission_id = state.next_mission_id.max(mission.id);
        state.missions.push(mission);
    }

    /// Snapshot of all stored missions.
    pub async fn missions(&self) -> Vec<Mission> {
        self.state.lock().await.missions.clone()
    }

    /// Snapshot of all registered call-buttons.
    pub async fn call_buttons(&self) -> Vec<CallButton> {
        self.state.lock().await.call_buttons.clone()
    }

    /// Snapshot of all appended event-log entries, in append order.
    pub async fn events(&self) -> Vec<NewEventLog> {
        self.state.lock().await.events.clone()
    }
}

#[async_trait]
impl MissionRepository for MemoryRepository {
    async fn find_started_mission(
        &self,
        mission_type: MissionType,
        place_id: Option<PlaceId>,
        user_id: Option<UserId>,
    ) -> Result<Option<Mission>, MaitreError> {
        let state = self.state.lock().await;
        Ok(state
            .missions
            .iter()
            .find(|m| {
                m.status == MissionStatus::Started
                    && m.mission_type == mission_type
                    && place_id.is_none_or(|p| m.place_id == Some(p))
                    && user_id.is_none_or(|u| m.assigned_user_id == Some(u))
            })
            .cloned())
    }

    async fn get_mission(&self, id: MissionId) -> Result<Option<Mission>, MaitreError> {
        let state = self.state.lock().await;
        Ok(state.missions.iter().find(|m| m.id == id).cloned())
    }

    async fn get_place(&self, id: PlaceId) -> Result<Option<Place>, MaitreError> {
        let state = self.state.lock().await;
        Ok(state.places.iter().find(|p| p.id == id).cloned())
    }

    async fn get_call_button_by_device_code(
        &self,
        device_code: &str,
    ) -> Result<Option<CallButton>, MaitreError> {
        let state = self.state.lock().await;
        Ok(state
            .call_buttons
            .iter()
            .find(|b| b.device_code == device_code)
            .cloned())
    }

    async fn create_call_button(
        &self,
        call_button: NewCallButton,
    ) -> Result<CallButton, MaitreError> {
        let mut state = self.state.lock().await;
        if state
            .call_buttons
            .iter()
            .any(|b| b.device_code == call_button.device_code)
        {
            return Err(MaitreError::Internal(format!(
                "duplicate device code {}",
                call_button.device_code
            )));
        }
        state.next_button_id += 1;
        let button = CallButton {
            id: state.next_button_id,
            device_code: call_button.device_code,
            button_id: call_button.button_id,
            label: call_button.label,
            place_id: call_button.place_id,
        };
        state.call_buttons.push(button.clone());
        Ok(button)
    }

    async fn create_mission(&self, mission: NewMission) -> Result<Mission, MaitreError> {
        let mut state = self.state.lock().await;
        state.next_mission_id += 1;
        let mission = Mission {
            id: state.next_mission_id,
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
        };
        state.missions.push(mission.clone());
        Ok(mission)
    }

    async fn update_mission(&self, mission: &Mission) -> Result<(), MaitreError> {
        let mut state = self.state.lock().await;
        match state.missions.iter_mut().find(|m| m.id == mission.id) {
            Some(stored) => {
                *stored = mission.clone();
                Ok(())
            }
            None => Err(MaitreError::Internal(format!(
                "mission {} not found",
                mission.id
            ))),
        }
    }

    async fn update_missions(&self, missions: &[Mission]) -> Result<(), MaitreError> {
        let mut state = self.state.lock().await;
        // All-or-nothing, like the SQL transaction.
        for mission in missions {
            if !state.missions.iter().any(|m| m.id == mission.id) {
                return Err(MaitreError::Internal(format!(
                    "mission {} not found",
                    mission.id
                )));
            }
        }
        for mission in missions {
            if let Some(stored) = state.missions.iter_mut().find(|m| m.id == mission.id) {
                *stored = mission.clone();
            }
        }
        Ok(())
    }

    async fn list_missions(&self, filter: &MissionFilter) -> Result<Vec<Mission>, MaitreError> {
        let state = self.state.lock().await;
        let mut out: Vec<Mission> = state
            .missions
            .iter()
            .filter(|m| {
                filter.status.is_none_or(|s| m.status == s)
                    && filter.mission_type.is_none_or(|t| m.mission_type == t)
                    && filter.place_id.is_none_or(|p| m.place_id == Some(p))
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn place_history(
        &self,
        place_id: PlaceId,
        mission_type: MissionType,
    ) -> Result<MissionHistory, MaitreError> {
        let state = self.state.lock().await;
        let finished_at_place = |wanted: &dyn Fn(&Mission) -> bool| {
            state
                .missions
                .iter()
                .filter(|m| {
                    m.place_id == Some(place_id)
                        && m.status == MissionStatus::Finished
                        && m.finished_at.is_some()
                        && wanted(m)
                })
                .collect::<Vec<_>>()
        };

        let last_order_finished_at = finished_at_place(&|m| m.mission_type == MissionType::Order)
            .into_iter()
            .filter_map(|m| m.finished_at)
            .max();
        let last_same_type_finished_at = finished_at_place(&|m| m.mission_type == mission_type)
            .into_iter()
            .filter_map(|m| m.finished_at)
            .max();
        let last_payment = finished_at_place(&|m| m.mission_type.is_payment())
            .into_iter()
            .max_by_key(|m| m.started_at)
            .and_then(|m| {
                m.finished_at.map(|finished_at| PaymentCycle {
                    started_at: m.started_at,
                    finished_at,
                })
            });

        Ok(MissionHistory {
            last_order_finished_at,
            last_same_type_finished_at,
            last_payment,
        })
    }

    async fn append_event_log(&self, entry: NewEventLog) -> Result<(), MaitreError> {
        self.state.lock().await.events.push(entry);
        Ok(())
    }
}
