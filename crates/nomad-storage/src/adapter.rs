// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SegmentStore trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::debug;

use nomad_config::model::StorageConfig;
use nomad_core::{Country, CountryCode, NomadError, SegmentId, SegmentStore, TravelSegment};

use crate::database::Database;
use crate::queries;

/// SQLite-backed segment store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`SegmentStore::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`SegmentStore::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, NomadError> {
        self.db.get().ok_or_else(|| NomadError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl SegmentStore for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), NomadError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| NomadError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), NomadError> {
        if let Some(db) = self.db.get() {
            if self.config.wal_mode {
                db.checkpoint().await?;
                debug!("WAL checkpoint complete");
            }
        }
        Ok(())
    }

    // --- Segment operations ---

    async fn list_segments(&self) -> Result<Vec<TravelSegment>, NomadError> {
        queries::segments::list_segments(self.db()?).await
    }

    async fn get_segment(&self, id: &SegmentId) -> Result<Option<TravelSegment>, NomadError> {
        queries::segments::get_segment(self.db()?, id).await
    }

    async fn put_segment(&self, segment: &TravelSegment) -> Result<(), NomadError> {
        queries::segments::upsert_segment(self.db()?, segment).await
    }

    async fn delete_segment(&self, id: &SegmentId) -> Result<bool, NomadError> {
        queries::segments::delete_segment(self.db()?, id).await
    }

    async fn segments_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TravelSegment>, NomadError> {
        queries::segments::segments_between(self.db()?, start, end).await
    }

    // --- Country operations ---

    async fn get_country(&self, code: &CountryCode) -> Result<Option<Country>, NomadError> {
        queries::countries::get_country(self.db()?, code).await
    }

    async fn put_country(&self, country: &Country) -> Result<(), NomadError> {
        queries::countries::insert_country(self.db()?, country).await
    }

    async fn list_countries(&self) -> Result<Vec<Country>, NomadError> {
        queries::countries::list_countries(self.db()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SubsecRound, Utc};
    use nomad_core::types::parse_date;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn segment(id: &str, start: &str, end: &str, code: &str) -> TravelSegment {
        let now = Utc::now().trunc_subsecs(6);
        TravelSegment {
            id: SegmentId::from(id),
            start_date: parse_date(start).unwrap(),
            end_date: parse_date(end).unwrap(),
            country_code: CountryCode::parse(code).unwrap(),
            notes: Some("by train".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        let result = storage.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn queries_fail_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        let result = storage.list_segments().await;
        assert!(matches!(result, Err(NomadError::Storage { .. })));
    }

    #[tokio::test]
    async fn segment_round_trip_and_replace() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("segments.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let original = segment("s1", "2024-01-01", "2024-01-05", "FR");
        storage.put_segment(&original).await.unwrap();
        let loaded = storage.get_segment(&original.id).await.unwrap().unwrap();
        assert_eq!(loaded, original);

        let mut edited = original.clone();
        edited.end_date = parse_date("2024-01-09").unwrap();
        edited.notes = None;
        storage.put_segment(&edited).await.unwrap();

        let all = storage.list_segments().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].end_date, edited.end_date);
        assert_eq!(all[0].notes, None);

        assert!(storage.delete_segment(&original.id).await.unwrap());
        assert!(!storage.delete_segment(&original.id).await.unwrap());
        assert!(storage.get_segment(&original.id).await.unwrap().is_none());

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn segments_between_uses_closed_ranges() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("between.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        storage
            .put_segment(&segment("a", "2024-01-01", "2024-01-05", "FR"))
            .await
            .unwrap();
        storage
            .put_segment(&segment("b", "2024-01-10", "2024-01-12", "IT"))
            .await
            .unwrap();
        storage
            .put_segment(&segment("c", "2024-03-01", "2024-03-02", "US"))
            .await
            .unwrap();

        let hits = storage
            .segments_between(
                parse_date("2024-01-05").unwrap(),
                parse_date("2024-01-10").unwrap(),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = hits.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn countries_are_inserted_once() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("countries.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let code = CountryCode::parse("DE").unwrap();
        storage
            .put_country(&Country::new(code.clone(), "Germany", true))
            .await
            .unwrap();
        storage
            .put_country(&Country::new(code.clone(), "Renamed", false))
            .await
            .unwrap();

        let stored = storage.get_country(&code).await.unwrap().unwrap();
        assert_eq!(stored.id, "country-DE");
        assert_eq!(stored.name, "Germany");
        assert!(stored.is_schengen);
        assert_eq!(storage.list_countries().await.unwrap().len(), 1);
        assert!(
            storage
                .get_country(&CountryCode::parse("FR").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}
