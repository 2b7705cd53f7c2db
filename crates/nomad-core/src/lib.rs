// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nomad travel compliance engine.
//!
//! This crate provides the domain types, the error type, and the
//! [`SegmentStore`] trait that storage backends implement. It performs no
//! I/O of its own.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NomadError;
pub use traits::SegmentStore;
pub use types::{
    ComplianceRule, ComplianceSnapshot, ComplianceStatus, Country, CountryCode, CurrentStay,
    Rejection, RejectionCode, SegmentDraft, SegmentId, TravelSegment, Verdict,
};
