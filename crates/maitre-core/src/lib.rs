// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Maitre service engine.
//!
//! This crate provides the domain types, error type, and collaborator traits
//! used throughout the Maitre workspace. The storage adapter and the mission
//! lifecycle engine both build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MaitreError;
pub use traits::{MissionNotifier, MissionRepository};
pub use types::{
    CallButton, EventType, Mission, MissionFilter, MissionHistory, MissionId, MissionStatus,
    MissionSummary, MissionType, NewCallButton, NewEventLog, NewMission, PaymentCycle, Place,
    PlaceId, UserId, place_label,
};
