// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Maitre workspace.
//!
//! A *mission* is a tracked unit of requested service work at a *place*
//! (a table). Missions are created STARTED, move through ACKNOWLEDGED to
//! FINISHED, or are CANCELED, and are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier for a mission (storage-assigned rowid).
pub type MissionId = i64;
/// Identifier for a place (table).
pub type PlaceId = i64;
/// Identifier for a staff user.
pub type UserId = i64;

/// The kind of service work a mission represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionType {
    Order,
    Payment,
    PaymentEc,
    Service,
    Assistance,
    Serve,
    Kitchen,
    Clean,
    Ashtray,
    Buffet,
    Toiletpaper,
}

impl MissionType {
    /// True for the two payment variants, which share idle-time semantics.
    pub fn is_payment(self) -> bool {
        matches!(self, MissionType::Payment | MissionType::PaymentEc)
    }
}

/// Lifecycle state of a mission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Started,
    Acknowledged,
    Finished,
    Canceled,
}

impl MissionStatus {
    /// FINISHED and CANCELED are terminal; nothing transitions out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Finished | MissionStatus::Canceled)
    }
}

/// A tracked unit of requested/performed service work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub started_at: DateTime<Utc>,
    /// Set once on first acknowledgement; never moved afterwards.
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// Set once on the terminal transition (also reused as the cancel timestamp).
    pub finished_at: Option<DateTime<Utc>>,
    pub place_id: Option<PlaceId>,
    /// Snapshotted from the place at start time, not live-joined later.
    pub place_group_id: Option<i64>,
    /// Snapshotted from the place at start time.
    pub setup_id: Option<i64>,
    pub assigned_user_id: Option<UserId>,
    /// Raw device code of the originating call-button signal, if any.
    pub source_decoded: Option<String>,
    /// Raw button number of the originating signal, if any.
    pub source_button: Option<i64>,
    /// Holds "time since the prior related mission" at creation, and is
    /// overwritten with "staff response latency" on acknowledgement.
    pub idle_time_seconds: Option<i64>,
    pub mission_duration_seconds: Option<i64>,
}

/// Fields for creating a mission; the id and STARTED status are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewMission {
    pub mission_type: MissionType,
    pub started_at: DateTime<Utc>,
    pub place_id: Option<PlaceId>,
    pub place_group_id: Option<i64>,
    pub setup_id: Option<i64>,
    pub assigned_user_id: Option<UserId>,
    pub source_decoded: Option<String>,
    pub source_button: Option<i64>,
    pub idle_time_seconds: Option<i64>,
}

/// A physical table/location that call-buttons and a staff member bind to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub number: i64,
    pub description: String,
    pub icon: Option<String>,
    pub place_group_id: Option<i64>,
    pub setup_id: Option<i64>,
    /// Currently assigned staff member, if any.
    pub user_id: Option<UserId>,
}

impl Place {
    /// Human-readable label used in notifications.
    pub fn label(&self) -> String {
        format!("{} (#{})", self.description, self.number)
    }
}

/// Label for an optional place; missions without a place render as "Unassigned".
pub fn place_label(place: Option<&Place>) -> String {
    place.map(Place::label).unwrap_or_else(|| "Unassigned".to_string())
}

/// A physical call-button device, bound (or not yet bound) to a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallButton {
    pub id: i64,
    /// Unique external identifier decoded from the radio frame.
    pub device_code: String,
    pub button_id: String,
    pub label: String,
    /// None while the device is unbound (learning mode registrations).
    pub place_id: Option<PlaceId>,
}

/// Fields for registering a call-button.
#[derive(Debug, Clone)]
pub struct NewCallButton {
    pub device_code: String,
    pub button_id: String,
    pub label: String,
    pub place_id: Option<PlaceId>,
}

/// Kind of audit record in the append-only event log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum EventType {
    MissionCreated,
    MissionAcknowledged,
    MissionFinished,
    MissionCanceled,
    System,
}

/// An append-only audit record.
#[derive(Debug, Clone)]
pub struct NewEventLog {
    pub event_type: EventType,
    pub created_at: DateTime<Utc>,
    pub mission_id: Option<MissionId>,
    pub place_id: Option<PlaceId>,
    pub user_id: Option<UserId>,
    /// Free-form JSON context for entries with no mission (unknown/learned devices).
    pub payload: Option<serde_json::Value>,
}

/// Filter for mission listings; `None` fields match any value.
#[derive(Debug, Clone, Default)]
pub struct MissionFilter {
    pub status: Option<MissionStatus>,
    pub mission_type: Option<MissionType>,
    pub place_id: Option<PlaceId>,
}

/// Notification payload pushed to observers on mission creation and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub id: MissionId,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub started_at: DateTime<Utc>,
    pub place_id: Option<PlaceId>,
    pub place_label: String,
    pub source_decoded: Option<String>,
    pub source_button: Option<i64>,
}

/// A finished payment cycle at a place, used by the idle-time calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentCycle {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Baseline snapshot of a place's finished-mission history for idle-time
/// computation. Fetched by the repository, consumed by the pure calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionHistory {
    /// `finished_at` of the most recently finished ORDER mission at the place.
    pub last_order_finished_at: Option<DateTime<Utc>>,
    /// `finished_at` of the most recently finished mission of the same type.
    pub last_same_type_finished_at: Option<DateTime<Utc>>,
    /// The most recently started finished PAYMENT/PAYMENT_EC cycle.
    pub last_payment: Option<PaymentCycle>,
}
