// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the mission lifecycle engine.

pub mod notifier;
pub mod repository;

pub use notifier::MissionNotifier;
pub use repository::MissionRepository;
