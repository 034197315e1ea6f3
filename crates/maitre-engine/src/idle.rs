// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idle-time computation.
//!
//! Pure function over a place's finished-mission history; the repository
//! supplies the [`MissionHistory`] snapshot, the engine stores the result on
//! the new mission.

use chrono::{DateTime, Utc};
use maitre_core::types::{MissionHistory, MissionType};

/// Seconds of idle time for a mission of `mission_type` starting at
/// `started_at`, given the place's history.
///
/// For PAYMENT/PAYMENT_EC the baseline is the most recently finished ORDER
/// at the place; no baseline means 0. For every other type the baseline is
/// the most recently finished mission of the same type; no baseline means
/// `None` (unset, distinct from zero), and an intervening payment cycle
/// forces 0. Results never go negative.
pub fn compute_idle_seconds(
    mission_type: MissionType,
    started_at: DateTime<Utc>,
    history: &MissionHistory,
) -> Option<i64> {
    if mission_type.is_payment() {
        let idle = match history.last_order_finished_at {
            Some(order_finished) => (started_at - order_finished).num_seconds().max(0),
            None => 0,
        };
        return Some(idle);
    }

    let previous_finished = history.last_same_type_finished_at?;
    let payment_intervened = history
        .last_payment
        .is_some_and(|cycle| cycle.started_at > previous_finished);
    if payment_intervened {
        return Some(0);
    }
    Some((started_at - previous_finished).num_seconds().max(0))
}
