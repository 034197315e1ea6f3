// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort push of mission events to observers.

use async_trait::async_trait;

use crate::error::MaitreError;
use crate::types::MissionSummary;

/// Notification port for mission lifecycle events.
///
/// Fire-and-forget from the engine's perspective: a delivery failure must
/// not roll back mission state that has already been committed. The actual
/// transport (websocket hub, message bus) lives behind this trait.
#[async_trait]
pub trait MissionNotifier: Send + Sync {
    /// Push a notification for a newly created mission.
    async fn push_created(&self, summary: &MissionSummary) -> Result<(), MaitreError>;

    /// Push a notification for an acknowledged/finished/canceled mission.
    async fn push_updated(&self, summary: &MissionSummary) -> Result<(), MaitreError>;
}
