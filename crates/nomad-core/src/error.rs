// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nomad compliance engine.

use thiserror::Error;

use crate::types::{Rejection, SegmentId};

/// The primary error type used across the Nomad crates.
///
/// Every variant is deterministic in its inputs; none of them are transient,
/// so callers should surface them rather than retry.
#[derive(Debug, Error)]
pub enum NomadError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A country code that is not two ASCII letters.
    #[error("invalid country code `{0}`: expected two ASCII letters")]
    InvalidCountryCode(String),

    /// A date string that could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date `{value}`: {reason}")]
    InvalidDate { value: String, reason: String },

    /// The proposed segment conflicts with the ledger or has a malformed range.
    #[error("segment rejected ({}): {}", .0.code, .0.message)]
    Rejected(Rejection),

    /// An edit or removal referenced a segment id that is not in the ledger.
    #[error("travel segment not found: {0}")]
    SegmentNotFound(SegmentId),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NomadError {
    /// Wrap any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }

    /// Returns the rejection if this error is an overlap or range rejection.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            _ => None,
        }
    }
}
