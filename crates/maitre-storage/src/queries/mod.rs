// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL query modules, one per table.

pub mod call_buttons;
pub mod event_log;
pub mod missions;
pub mod places;
