// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maitre status` command implementation.
//!
//! Lists open (STARTED/ACKNOWLEDGED) missions grouped by place label.

use std::collections::{BTreeMap, HashMap};
use std::io::IsTerminal;

use chrono::{DateTime, Utc};
use serde::Serialize;

use maitre_core::MaitreError;
use maitre_core::traits::MissionRepository;
use maitre_core::types::{Mission, MissionFilter, MissionStatus, Place, PlaceId, place_label};

/// One open mission in the status listing.
#[derive(Debug, Serialize)]
pub struct MissionLine {
    pub id: i64,
    pub mission_type: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub idle_time_seconds: Option<i64>,
}

/// Open missions at one place, for `--json` mode.
#[derive(Debug, Serialize)]
pub struct PlaceGroup {
    pub place_label: String,
    pub missions: Vec<MissionLine>,
}

fn to_line(mission: &Mission) -> MissionLine {
    MissionLine {
        id: mission.id,
        mission_type: mission.mission_type.to_string(),
        status: mission.status.to_string(),
        started_at: mission.started_at,
        idle_time_seconds: mission.idle_time_seconds,
    }
}

async fn open_missions(repo: &dyn MissionRepository) -> Result<Vec<Mission>, MaitreError> {
    let mut open = repo
        .list_missions(&MissionFilter {
            status: Some(MissionStatus::Started),
            ..Default::default()
        })
        .await?;
    let acknowledged = repo
        .list_missions(&MissionFilter {
            status: Some(MissionStatus::Acknowledged),
            ..Default::default()
        })
        .await?;
    open.extend(acknowledged);
    Ok(open)
}

/// Group missions by place label, resolving each referenced place once.
async fn group_by_place(
    repo: &dyn MissionRepository,
    missions: Vec<Mission>,
) -> Result<Vec<PlaceGroup>, MaitreError> {
    let mut places: HashMap<PlaceId, Option<Place>> = HashMap::new();
    let mut groups: BTreeMap<String, Vec<MissionLine>> = BTreeMap::new();

    for mission in &missions {
        let place = match mission.place_id {
            Some(place_id) => {
                if !places.contains_key(&place_id) {
                    let fetched = repo.get_place(place_id).await?;
                    places.insert(place_id, fetched);
                }
                places[&place_id].clone()
            }
            None => None,
        };
        groups
            .entry(place_label(place.as_ref()))
            .or_default()
            .push(to_line(mission));
    }

    Ok(groups
        .into_iter()
        .map(|(place_label, missions)| PlaceGroup {
            place_label,
            missions,
        })
        .collect())
}

/// Run the `maitre status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(
    repo: &dyn MissionRepository,
    json: bool,
    plain: bool,
) -> Result<(), MaitreError> {
    let missions = open_missions(repo).await?;
    let groups = group_by_place(repo, missions).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&groups).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    print_groups(&groups, use_color);
    Ok(())
}

fn print_groups(groups: &[PlaceGroup], use_color: bool) {
    println!();
    println!("  maitre status");
    println!("  {}", "-".repeat(35));

    if groups.is_empty() {
        println!("    No open missions.");
        println!();
        return;
    }

    for group in groups {
        if use_color {
            use colored::Colorize;
            println!("    {}", group.place_label.bold());
        } else {
            println!("    {}", group.place_label);
        }
        for line in &group.missions {
            let idle = line
                .idle_time_seconds
                .map(|s| format!(" (idle {s}s)"))
                .unwrap_or_default();
            println!(
                "      #{} {} {}{}",
                line.id, line.mission_type, line.status, idle
            );
        }
    }
    println!();
}
