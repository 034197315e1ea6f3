// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log-only notifier.
//!
//! Stands in for a real push transport: every notification lands in the
//! structured log stream instead of a websocket hub.

use async_trait::async_trait;
use tracing::info;

use maitre_core::MaitreError;
use maitre_core::traits::MissionNotifier;
use maitre_core::types::MissionSummary;

/// A [`MissionNotifier`] that emits tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl MissionNotifier for LogNotifier {
    async fn push_created(&self, summary: &MissionSummary) -> Result<(), MaitreError> {
        info!(
            mission_id = summary.id,
            mission_type = %summary.mission_type,
            place = %summary.place_label,
            "mission created"
        );
        Ok(())
    }

    async fn push_updated(&self, summary: &MissionSummary) -> Result<(), MaitreError> {
        info!(
            mission_id = summary.id,
            mission_type = %summary.mission_type,
            status = %summary.status,
            place = %summary.place_label,
            "mission updated"
        );
        Ok(())
    }
}
