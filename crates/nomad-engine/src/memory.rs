// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process segment store.
//!
//! Used by tests and by the CLI's `--ephemeral` mode. Contents are lost when
//! the store is dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use nomad_core::{Country, CountryCode, NomadError, SegmentId, SegmentStore, TravelSegment};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemorySegmentStore {
    segments: RwLock<HashMap<SegmentId, TravelSegment>>,
    countries: RwLock<HashMap<String, Country>>,
}

impl MemorySegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `segments`, bypassing validation.
    pub fn with_segments(segments: impl IntoIterator<Item = TravelSegment>) -> Self {
        let map = segments.into_iter().map(|s| (s.id.clone(), s)).collect();
        Self {
            segments: RwLock::new(map),
            countries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SegmentStore for MemorySegmentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_segments(&self) -> Result<Vec<TravelSegment>, NomadError> {
        Ok(self.segments.read().await.values().cloned().collect())
    }

    async fn get_segment(&self, id: &SegmentId) -> Result<Option<TravelSegment>, NomadError> {
        Ok(self.segments.read().await.get(id).cloned())
    }

    async fn put_segment(&self, segment: &TravelSegment) -> Result<(), NomadError> {
        self.segments
            .write()
            .await
            .insert(segment.id.clone(), segment.clone());
        Ok(())
    }

    async fn delete_segment(&self, id: &SegmentId) -> Result<bool, NomadError> {
        Ok(self.segments.write().await.remove(id).is_some())
    }

    async fn get_country(&self, code: &CountryCode) -> Result<Option<Country>, NomadError> {
        Ok(self
            .countries
            .read()
            .await
            .get(&Country::id_for(code))
            .cloned())
    }

    async fn put_country(&self, country: &Country) -> Result<(), NomadError> {
        self.countries
            .write()
            .await
            .entry(country.id.clone())
            .or_insert_with(|| country.clone());
        Ok(())
    }

    async fn list_countries(&self) -> Result<Vec<Country>, NomadError> {
        let mut countries: Vec<Country> = self.countries.read().await.values().cloned().collect();
        countries.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nomad_core::types::parse_date;

    fn segment(id: &str, start: &str, end: &str) -> TravelSegment {
        let now = Utc::now();
        TravelSegment {
            id: SegmentId::from(id),
            start_date: parse_date(start).unwrap(),
            end_date: parse_date(end).unwrap(),
            country_code: CountryCode::parse("FR").unwrap(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemorySegmentStore::new();
        let seg = segment("a", "2024-01-01", "2024-01-05");
        store.put_segment(&seg).await.unwrap();
        assert_eq!(store.get_segment(&seg.id).await.unwrap(), Some(seg.clone()));
        assert!(store.delete_segment(&seg.id).await.unwrap());
        assert!(!store.delete_segment(&seg.id).await.unwrap());
        assert!(store.list_segments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn segments_between_filters_by_intersection() {
        let store = MemorySegmentStore::with_segments([
            segment("a", "2024-01-01", "2024-01-05"),
            segment("b", "2024-02-01", "2024-02-05"),
        ]);
        let hits = store
            .segments_between(
                parse_date("2024-01-05").unwrap(),
                parse_date("2024-01-20").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, SegmentId::from("a"));
    }

    #[tokio::test]
    async fn put_country_keeps_first_record() {
        let store = MemorySegmentStore::new();
        let code = CountryCode::parse("FR").unwrap();
        store
            .put_country(&Country::new(code.clone(), "France", true))
            .await
            .unwrap();
        store
            .put_country(&Country::new(code.clone(), "Other", false))
            .await
            .unwrap();
        let stored = store.get_country(&code).await.unwrap().unwrap();
        assert_eq!(stored.name, "France");
        assert_eq!(store.list_countries().await.unwrap().len(), 1);
    }
}
