// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maitre reset` command implementation.
//!
//! Cancels every open mission in one batch, for end-of-shift cleanup.

use maitre_core::MaitreError;
use maitre_core::traits::{MissionNotifier, MissionRepository};
use maitre_engine::MissionEngine;

/// Run the `maitre reset` command.
pub async fn run_reset<R, N>(engine: &MissionEngine<R, N>) -> Result<(), MaitreError>
where
    R: MissionRepository,
    N: MissionNotifier,
{
    let count = engine.cancel_all_open_missions(None).await?;
    match count {
        0 => println!("maitre reset: no open missions"),
        1 => println!("maitre reset: canceled 1 mission"),
        n => println!("maitre reset: canceled {n} missions"),
    }
    Ok(())
}
