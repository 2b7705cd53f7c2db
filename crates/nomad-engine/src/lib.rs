// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Travel ledger and compliance engine for Nomad.
//!
//! This crate provides:
//! - **Overlap validator**: decides whether a proposed segment may join the ledger
//! - **Segment ledger**: serialized validate-then-commit writes over a [`SegmentStore`]
//! - **Compliance**: rolling-window Schengen day counting for any reference date
//! - **Country registry**: code to name and Schengen membership lookup
//!
//! [`SegmentStore`]: nomad_core::SegmentStore

pub mod compliance;
pub mod engine;
pub mod ledger;
pub mod memory;
pub mod registry;
pub mod validator;

pub use engine::TravelEngine;
pub use ledger::{Accepted, LedgerTxn, SegmentLedger};
pub use memory::MemorySegmentStore;
pub use registry::{CountryInfo, CountryRegistry};
