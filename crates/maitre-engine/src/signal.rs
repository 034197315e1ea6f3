// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal routing: decoded call-button signals to mission starts.
//!
//! A decoded signal is `(device_code, button_number, timestamp)`. Known
//! devices map their button number to a mission type and start a mission;
//! unknown devices are either auto-registered (learning mode) or logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use maitre_core::MaitreError;
use maitre_core::traits::{MissionNotifier, MissionRepository};
use maitre_core::types::{EventType, MissionType, NewCallButton, NewEventLog};

use crate::lifecycle::{MissionEngine, MissionStartResult, StartMission};

/// Shared runtime-mutable learning-mode toggle.
///
/// Cloned handles observe each other's writes; external tooling flips the
/// flag while the router keeps running.
#[derive(Clone)]
pub struct LearningMode(Arc<AtomicBool>);

impl LearningMode {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

/// Static button-number dispatch; unmapped numbers fall back to ASSISTANCE.
pub fn button_mission_type(button_number: i64) -> MissionType {
    match button_number {
        1 => MissionType::Order,
        2 => MissionType::Payment,
        3 => MissionType::PaymentEc,
        4 => MissionType::Serve,
        _ => MissionType::Assistance,
    }
}

/// Maps decoded device signals to engine calls.
pub struct SignalRouter<R, N> {
    repository: Arc<R>,
    engine: Arc<MissionEngine<R, N>>,
    learning_mode: LearningMode,
}

impl<R, N> SignalRouter<R, N>
where
    R: MissionRepository,
    N: MissionNotifier,
{
    pub fn new(
        repository: Arc<R>,
        engine: Arc<MissionEngine<R, N>>,
        learning_mode: LearningMode,
    ) -> Self {
        Self {
            repository,
            engine,
            learning_mode,
        }
    }

    pub fn learning_mode(&self) -> &LearningMode {
        &self.learning_mode
    }

    /// Handle one decoded signal.
    ///
    /// Returns `None` when no mission was involved (unknown or freshly
    /// learned device), otherwise the engine's start result.
    pub async fn handle_signal(
        &self,
        device_code: &str,
        button_number: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<MissionStartResult>, MaitreError> {
        let Some(button) = self
            .repository
            .get_call_button_by_device_code(device_code)
            .await?
        else {
            if self.learning_mode.is_enabled() {
                self.learn_device(device_code, button_number, timestamp).await?;
            } else {
                warn!(device_code, button_number, "signal from unknown device");
                self.repository
                    .append_event_log(NewEventLog {
                        event_type: EventType::System,
                        created_at: timestamp,
                        mission_id: None,
                        place_id: None,
                        user_id: None,
                        payload: Some(json!({
                            "unknownCallButton": device_code,
                            "button": button_number,
                        })),
                    })
                    .await?;
            }
            return Ok(None);
        };

        // The place's assigned user participates in duplicate suppression:
        // the same button pressed at a reassigned place starts a new mission.
        let place_user = match button.place_id {
            Some(place_id) => self
                .repository
                .get_place(place_id)
                .await?
                .and_then(|place| place.user_id),
            None => None,
        };

        let result = self
            .engine
            .start_mission(StartMission {
                mission_type: button_mission_type(button_number),
                place_id: button.place_id,
                user_id: place_user,
                started_at: Some(timestamp),
                source_decoded: Some(device_code.to_string()),
                source_button: Some(button_number),
            })
            .await?;
        Ok(Some(result))
    }

    async fn learn_device(
        &self,
        device_code: &str,
        button_number: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), MaitreError> {
        let button = self
            .repository
            .create_call_button(NewCallButton {
                device_code: device_code.to_string(),
                button_id: device_code.to_string(),
                label: format!("New Button {device_code}"),
                place_id: None,
            })
            .await?;
        info!(device_code, call_button_id = button.id, "learned new call-button");
        self.repository
            .append_event_log(NewEventLog {
                event_type: EventType::System,
                created_at: timestamp,
                mission_id: None,
                place_id: None,
                user_id: None,
                payload: Some(json!({
                    "learnedCallButton": device_code,
                    "button": button_number,
                })),
            })
            .await
    }
}
