// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable store for one traveler's segments and derived country records.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::NomadError;
use crate::types::{Country, CountryCode, SegmentId, TravelSegment};

/// Persistence backend for the segment ledger.
///
/// The store is a dumb key-value collaborator: it never validates overlaps.
/// The ledger serializes every write through its commit lock, so
/// implementations only need to make each single call atomic.
#[async_trait]
pub trait SegmentStore: Send + Sync + 'static {
    /// Human-readable backend name, used in log fields.
    fn name(&self) -> &str;

    /// Prepare the backend (open connections, run migrations).
    async fn initialize(&self) -> Result<(), NomadError> {
        Ok(())
    }

    /// Flush pending writes and release resources.
    async fn close(&self) -> Result<(), NomadError> {
        Ok(())
    }

    /// All segments, in no particular order.
    async fn list_segments(&self) -> Result<Vec<TravelSegment>, NomadError>;

    async fn get_segment(&self, id: &SegmentId) -> Result<Option<TravelSegment>, NomadError>;

    /// Insert or fully replace the segment with `segment.id`.
    async fn put_segment(&self, segment: &TravelSegment) -> Result<(), NomadError>;

    /// Delete by id. Returns whether a segment was removed.
    async fn delete_segment(&self, id: &SegmentId) -> Result<bool, NomadError>;

    /// Segments whose closed range shares at least one day with `[start, end]`.
    ///
    /// Backends with an index should override this.
    async fn segments_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TravelSegment>, NomadError> {
        let mut segments = self.list_segments().await?;
        segments.retain(|s| s.intersects(start, end));
        Ok(segments)
    }

    async fn get_country(&self, code: &CountryCode) -> Result<Option<Country>, NomadError>;

    /// Insert the country if no record with its id exists yet.
    async fn put_country(&self, country: &Country) -> Result<(), NomadError>;

    /// All country records derived so far.
    async fn list_countries(&self) -> Result<Vec<Country>, NomadError>;
}
