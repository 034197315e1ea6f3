// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Maitre service engine.

use thiserror::Error;

use crate::types::PlaceId;

/// The primary error type used across all Maitre traits and core operations.
#[derive(Debug, Error)]
pub enum MaitreError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Notifier delivery errors (transport failure, serialization).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A mission referenced an explicit place that does not exist.
    ///
    /// This aborts mission creation entirely; it is never silently ignored.
    #[error("place {place_id} was not found")]
    PlaceNotFound { place_id: PlaceId },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MaitreError {
    /// Helper for storage errors wrapping an arbitrary source.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }

    /// Helper for notifier errors without an underlying source.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
            source: None,
        }
    }
}
