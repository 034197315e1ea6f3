// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Maitre integration tests.
//!
//! Provides in-memory adapter implementations for fast, deterministic,
//! CI-runnable tests without a database file.
//!
//! # Components
//!
//! - [`MemoryRepository`] - In-memory `MissionRepository` with seed helpers
//! - [`RecordingNotifier`] - `MissionNotifier` that captures pushes for assertion

pub mod memory_repository;
pub mod recording_notifier;

pub use memory_repository::MemoryRepository;
pub use recording_notifier::{Push, RecordingNotifier};
