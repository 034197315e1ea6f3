// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier mock that captures pushes for assertion in tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use maitre_core::MaitreError;
use maitre_core::traits::MissionNotifier;
use maitre_core::types::MissionSummary;

/// A captured notification push.
#[derive(Debug, Clone, PartialEq)]
pub enum Push {
    Created(MissionSummary),
    Updated(MissionSummary),
}

impl Push {
    pub fn summary(&self) -> &MissionSummary {
        match self {
            Push::Created(s) | Push::Updated(s) => s,
        }
    }
}

/// A [`MissionNotifier`] that records every push, with optional failure
/// injection to exercise delivery-error isolation.
#[derive(Default)]
pub struct RecordingNotifier {
    pushes: Mutex<Vec<Push>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent pushes fail with a `Notify` error.
    pub async fn fail_pushes(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    /// All recorded pushes, in delivery order.
    pub async fn pushes(&self) -> Vec<Push> {
        self.pushes.lock().await.clone()
    }

    /// Count of recorded creation pushes.
    pub async fn created_count(&self) -> usize {
        self.pushes
            .lock()
            .await
            .iter()
            .filter(|p| matches!(p, Push::Created(_)))
            .count()
    }

    /// Count of recorded update pushes.
    pub async fn updated_count(&self) -> usize {
        self.pushes
            .lock()
            .await
            .iter()
            .filter(|p| matches!(p, Push::Updated(_)))
            .count()
    }

    async fn push(&self, push: Push) -> Result<(), MaitreError> {
        if *self.failing.lock().await {
            return Err(MaitreError::notify("injected push failure"));
        }
        self.pushes.lock().await.push(push);
        Ok(())
    }
}

#[async_trait]
impl MissionNotifier for RecordingNotifier {
    async fn push_created(&self, summary: &MissionSummary) -> Result<(), MaitreError> {
        self.push(Push::Created(summary.clone())).await
    }

    async fn push_updated(&self, summary: &MissionSummary) -> Result<(), MaitreError> {
        self.push(Push::Updated(summary.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use maitre_core::types::{MissionStatus, MissionType};

    fn summary(id: i64) -> MissionSummary {
        MissionSummary {
            id,
            mission_type: MissionType::Order,
            status: MissionStatus::Started,
            started_at: Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap(),
            place_id: Some(1),
            place_label: "Table 1 (#1)".to_string(),
            source_decoded: None,
            source_button: None,
        }
    }

    #[tokio::test]
    async fn records_pushes_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.push_created(&summary(1)).await.unwrap();
        notifier.push_updated(&summary(1)).await.unwrap();

        let pushes = notifier.pushes().await;
        assert_eq!(pushes.len(), 2);
        assert!(matches!(pushes[0], Push::Created(_)));
        assert!(matches!(pushes[1], Push::Updated(_)));
        assert_eq!(notifier.created_count().await, 1);
        assert_eq!(notifier.updated_count().await, 1);
    }

    #[tokio::test]
    async fn failure_injection_rejects_pushes() {
        let notifier = RecordingNotifier::new();
        notifier.fail_pushes(true).await;
        assert!(notifier.push_created(&summary(1)).await.is_err());
        assert!(notifier.pushes().await.is_empty());

        notifier.fail_pushes(false).await;
        notifier.push_created(&summary(2)).await.unwrap();
        assert_eq!(notifier.created_count().await, 1);
    }
}
