// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the engine is built against.
//!
//! Implementations use `#[async_trait]` for dynamic dispatch compatibility.

pub mod store;

pub use store::SegmentStore;
