// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mission lifecycle engine.
//!
//! Owns every state transition: start (with duplicate suppression and
//! idle-time computation), acknowledge, finish (with the SERVE cascade),
//! and the single/batch cancel operations. Each operation appends an audit
//! entry and pushes a notification; notifier failures are logged and never
//! roll back committed mission state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use maitre_core::MaitreError;
use maitre_core::traits::{MissionNotifier, MissionRepository};
use maitre_core::types::{
    EventType, Mission, MissionFilter, MissionId, MissionStatus, MissionSummary, MissionType,
    NewEventLog, NewMission, Place, PlaceId, UserId, place_label,
};

use crate::idle::compute_idle_seconds;

/// Parameters for starting a mission.
#[derive(Debug, Clone)]
pub struct StartMission {
    pub mission_type: MissionType,
    pub place_id: Option<PlaceId>,
    pub user_id: Option<UserId>,
    /// Defaults to now.
    pub started_at: Option<DateTime<Utc>>,
    pub source_decoded: Option<String>,
    pub source_button: Option<i64>,
}

impl StartMission {
    /// A start request with only a type; place, user, and source unset.
    pub fn of_type(mission_type: MissionType) -> Self {
        Self {
            mission_type,
            place_id: None,
            user_id: None,
            started_at: None,
            source_decoded: None,
            source_button: None,
        }
    }
}

/// Outcome of [`MissionEngine::start_mission`].
#[derive(Debug, Clone)]
pub struct MissionStartResult {
    pub mission: Mission,
    /// False when duplicate suppression returned an existing mission.
    pub created_new: bool,
}

/// The mission lifecycle engine.
pub struct MissionEngine<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    track_serve_mission: bool,
}

impl<R, N> MissionEngine<R, N>
where
    R: MissionRepository,
    N: MissionNotifier,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, track_serve_mission: bool) -> Self {
        Self {
            repository,
            notifier,
            track_serve_mission,
        }
    }

    /// Start a mission, or return the existing STARTED mission matching the
    /// dedupe key `(type, place_id?, user_id?)`.
    ///
    /// The find-then-insert pair is not atomic: two racing calls for the same
    /// key can both create a mission. Accepted as-is; callers that need
    /// stronger guarantees must serialize externally.
    pub async fn start_mission(
        &self,
        request: StartMission,
    ) -> Result<MissionStartResult, MaitreError> {
        let started_at = request.started_at.unwrap_or_else(Utc::now);

        if let Some(existing) = self
            .repository
            .find_started_mission(request.mission_type, request.place_id, request.user_id)
            .await?
        {
            debug!(
                mission_id = existing.id,
                mission_type = %request.mission_type,
                "duplicate signal suppressed"
            );
            return Ok(MissionStartResult {
                mission: existing,
                created_new: false,
            });
        }

        // An explicit place that does not resolve aborts the whole call.
        let place = match request.place_id {
            Some(place_id) => Some(
                self.repository
                    .get_place(place_id)
                    .await?
                    .ok_or(MaitreError::PlaceNotFound { place_id })?,
            ),
            None => None,
        };

        let assigned_user_id = request
            .user_id
            .or_else(|| place.as_ref().and_then(|p| p.user_id));

        let idle_time_seconds = match &place {
            Some(place) => {
                let history = self
                    .repository
                    .place_history(place.id, request.mission_type)
                    .await?;
                compute_idle_seconds(request.mission_type, started_at, &history)
            }
            None => None,
        };

        let mission = self
            .repository
            .create_mission(NewMission {
                mission_type: request.mission_type,
                started_at,
                place_id: place.as_ref().map(|p| p.id),
                place_group_id: place.as_ref().and_then(|p| p.place_group_id),
                setup_id: place.as_ref().and_then(|p| p.setup_id),
                assigned_user_id,
                source_decoded: request.source_decoded,
                source_button: request.source_button,
                idle_time_seconds,
            })
            .await?;

        self.log_mission_event(EventType::MissionCreated, &mission).await?;
        info!(
            mission_id = mission.id,
            mission_type = %mission.mission_type,
            place_id = mission.place_id,
            "mission started"
        );
        self.push_created(&mission, place.as_ref()).await;

        Ok(MissionStartResult {
            mission,
            created_new: true,
        })
    }

    /// Transition a mission to ACKNOWLEDGED.
    ///
    /// `acknowledged_at` is set once; repeated acknowledgement re-logs but
    /// does not move the timestamp. `idle_time_seconds` is overwritten with
    /// the response latency `acknowledged_at - started_at`. Terminal missions
    /// are returned unchanged.
    pub async fn acknowledge_mission(
        &self,
        mission_id: MissionId,
        user_id: Option<UserId>,
    ) -> Result<Option<Mission>, MaitreError> {
        let Some(mut mission) = self.repository.get_mission(mission_id).await? else {
            return Ok(None);
        };
        if mission.status.is_terminal() {
            return Ok(Some(mission));
        }

        mission.status = MissionStatus::Acknowledged;
        let acknowledged_at = *mission.acknowledged_at.get_or_insert_with(Utc::now);
        if user_id.is_some() {
            mission.assigned_user_id = user_id;
        }
        mission.idle_time_seconds =
            Some((acknowledged_at - mission.started_at).num_seconds().max(0));

        self.repository.update_mission(&mission).await?;
        self.log_mission_event(EventType::MissionAcknowledged, &mission).await?;
        self.push_updated(&mission).await;
        Ok(Some(mission))
    }

    /// Transition a mission to FINISHED.
    ///
    /// Valid from STARTED or ACKNOWLEDGED; any other state returns the
    /// mission unchanged. Finishing an ORDER at a place starts a SERVE
    /// mission on the same place when serve tracking is enabled.
    pub async fn finish_mission(
        &self,
        mission_id: MissionId,
        user_id: Option<UserId>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Mission>, MaitreError> {
        let Some(mut mission) = self.repository.get_mission(mission_id).await? else {
            return Ok(None);
        };
        if !matches!(
            mission.status,
            MissionStatus::Started | MissionStatus::Acknowledged
        ) {
            return Ok(Some(mission));
        }

        let finished_at = finished_at.unwrap_or_else(Utc::now);
        mission.status = MissionStatus::Finished;
        mission.finished_at = Some(finished_at);
        if user_id.is_some() {
            mission.assigned_user_id = user_id;
        }
        mission.mission_duration_seconds =
            Some((finished_at - mission.started_at).num_seconds().max(0));

        self.repository.update_mission(&mission).await?;
        self.log_mission_event(EventType::MissionFinished, &mission).await?;
        self.push_updated(&mission).await;

        if self.track_serve_mission
            && mission.mission_type == MissionType::Order
            && mission.place_id.is_some()
        {
            let cascade = self
                .start_mission(StartMission {
                    mission_type: MissionType::Serve,
                    place_id: mission.place_id,
                    user_id: mission.assigned_user_id,
                    started_at: Some(finished_at),
                    source_decoded: None,
                    source_button: None,
                })
                .await?;
            debug!(
                serve_mission_id = cascade.mission.id,
                created_new = cascade.created_new,
                "serve cascade after finished order"
            );
        }

        Ok(Some(mission))
    }

    /// Transition a mission to CANCELED.
    ///
    /// Valid only from STARTED; an ACKNOWLEDGED mission is returned
    /// unchanged. `finished_at` doubles as the cancellation timestamp.
    pub async fn cancel_mission(
        &self,
        mission_id: MissionId,
        canceled_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Mission>, MaitreError> {
        let Some(mut mission) = self.repository.get_mission(mission_id).await? else {
            return Ok(None);
        };
        if mission.status != MissionStatus::Started {
            return Ok(Some(mission));
        }

        cancel_in_place(&mut mission, canceled_at.unwrap_or_else(Utc::now));
        self.repository.update_mission(&mission).await?;
        self.log_mission_event(EventType::MissionCanceled, &mission).await?;
        self.push_updated(&mission).await;
        Ok(Some(mission))
    }

    /// Cancel every STARTED mission at a place as one batch. ACKNOWLEDGED
    /// missions at the place are left untouched. Returns the count.
    pub async fn cancel_place_missions(
        &self,
        place_id: PlaceId,
        canceled_at: Option<DateTime<Utc>>,
    ) -> Result<usize, MaitreError> {
        let filter = MissionFilter {
            status: Some(MissionStatus::Started),
            place_id: Some(place_id),
            ..Default::default()
        };
        self.cancel_batch(&filter, canceled_at).await
    }

    /// Cancel every STARTED mission system-wide (end-of-shift reset).
    pub async fn cancel_all_open_missions(
        &self,
        canceled_at: Option<DateTime<Utc>>,
    ) -> Result<usize, MaitreError> {
        let filter = MissionFilter {
            status: Some(MissionStatus::Started),
            ..Default::default()
        };
        self.cancel_batch(&filter, canceled_at).await
    }

    async fn cancel_batch(
        &self,
        filter: &MissionFilter,
        canceled_at: Option<DateTime<Utc>>,
    ) -> Result<usize, MaitreError> {
        let canceled_at = canceled_at.unwrap_or_else(Utc::now);
        let mut missions = self.repository.list_missions(filter).await?;
        if missions.is_empty() {
            return Ok(0);
        }
        for mission in &mut missions {
            cancel_in_place(mission, canceled_at);
        }
        self.repository.update_missions(&missions).await?;
        for mission in &missions {
            self.log_mission_event(EventType::MissionCanceled, mission).await?;
            self.push_updated(mission).await;
        }
        info!(count = missions.len(), "batch cancel committed");
        Ok(missions.len())
    }

    /// Finish every STARTED mission at a place as one batch, then run the
    /// SERVE cascade for each finished ORDER. ACKNOWLEDGED missions stay in
    /// flight; they represent work a staff member has already claimed.
    pub async fn finish_place_missions(
        &self,
        place_id: PlaceId,
        user_id: Option<UserId>,
        finished_at: Option<DateTime<Utc>>,
    ) -> Result<Vec<Mission>, MaitreError> {
        let finished_at = finished_at.unwrap_or_else(Utc::now);
        let mut missions = self
            .repository
            .list_missions(&MissionFilter {
                status: Some(MissionStatus::Started),
                place_id: Some(place_id),
                ..Default::default()
            })
            .await?;
        if missions.is_empty() {
            return Ok(missions);
        }
        for mission in &mut missions {
            mission.status = MissionStatus::Finished;
            mission.finished_at = Some(finished_at);
            if user_id.is_some() {
                mission.assigned_user_id = user_id;
            }
            mission.mission_duration_seconds =
                Some((finished_at - mission.started_at).num_seconds().max(0));
        }
        self.repository.update_missions(&missions).await?;
        for mission in &missions {
            self.log_mission_event(EventType::MissionFinished, mission).await?;
            self.push_updated(mission).await;
        }
        info!(place_id, count = missions.len(), "place missions finished");

        if self.track_serve_mission {
            for mission in &missions {
                if mission.mission_type == MissionType::Order {
                    self.start_mission(StartMission {
                        mission_type: MissionType::Serve,
                        place_id: Some(place_id),
                        user_id: mission.assigned_user_id,
                        started_at: Some(finished_at),
                        source_decoded: None,
                        source_button: None,
                    })
                    .await?;
                }
            }
        }

        Ok(missions)
    }

    /// Read-only: the STARTED missions at a place. No events, no pushes.
    pub async fn get_started_missions_by_place(
        &self,
        place_id: PlaceId,
    ) -> Result<Vec<Mission>, MaitreError> {
        self.repository
            .list_missions(&MissionFilter {
                status: Some(MissionStatus::Started),
                place_id: Some(place_id),
                ..Default::default()
            })
            .await
    }

    async fn log_mission_event(
        &self,
        event_type: EventType,
        mission: &Mission,
    ) -> Result<(), MaitreError> {
        self.repository
            .append_event_log(NewEventLog {
                event_type,
                created_at: Utc::now(),
                mission_id: Some(mission.id),
                place_id: mission.place_id,
                user_id: mission.assigned_user_id,
                payload: None,
            })
            .await
    }

    async fn summarize(&self, mission: &Mission, place: Option<&Place>) -> MissionSummary {
        let label = match place {
            Some(place) => place.label(),
            None => match mission.place_id {
                Some(place_id) => {
                    let fetched = self.repository.get_place(place_id).await.ok().flatten();
                    place_label(fetched.as_ref())
                }
                None => place_label(None),
            },
        };
        MissionSummary {
            id: mission.id,
            mission_type: mission.mission_type,
            status: mission.status,
            started_at: mission.started_at,
            place_id: mission.place_id,
            place_label: label,
            source_decoded: mission.source_decoded.clone(),
            source_button: mission.source_button,
        }
    }

    async fn push_created(&self, mission: &Mission, place: Option<&Place>) {
        let summary = self.summarize(mission, place).await;
        if let Err(e) = self.notifier.push_created(&summary).await {
            warn!(mission_id = mission.id, error = %e, "created push failed");
        }
    }

    async fn push_updated(&self, mission: &Mission) {
        let summary = self.summarize(mission, None).await;
        if let Err(e) = self.notifier.push_updated(&summary).await {
            warn!(mission_id = mission.id, error = %e, "update push failed");
        }
    }
}

fn cancel_in_place(mission: &mut Mission, canceled_at: DateTime<Utc>) {
    mission.status = MissionStatus::Canceled;
    mission.finished_at = Some(canceled_at);
    mission.mission_duration_seconds =
        Some((canceled_at - mission.started_at).num_seconds().max(0));
}
