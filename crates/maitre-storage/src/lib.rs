// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Maitre mission engine.
//!
//! One connection, one writer: everything funnels through tokio-rusqlite's
//! background thread, so concurrent engine operations serialize at the
//! storage boundary. Schema changes ship as embedded refinery migrations.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteRepository;
pub use database::Database;
