// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mission lifecycle engine for Maitre.
//!
//! Turns decoded call-button signals into tracked missions, enforces the
//! at-most-one-started-mission dedupe rule, computes idle-time analytics,
//! and cascades SERVE missions after finished orders. Persistence and
//! notification live behind the `maitre-core` traits.

pub mod idle;
pub mod lifecycle;
pub mod notify;
pub mod signal;

pub use idle::compute_idle_seconds;
pub use lifecycle::{MissionEngine, MissionStartResult, StartMission};
pub use notify::LogNotifier;
pub use signal::{LearningMode, SignalRouter, button_mission_type};
