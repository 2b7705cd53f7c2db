// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The engine running over a real SQLite file.

use std::sync::Arc;

use nomad_config::model::StorageConfig;
use nomad_core::types::parse_date;
use nomad_core::{
    ComplianceRule, ComplianceStatus, CountryCode, RejectionCode, SegmentDraft, SegmentStore,
};
use nomad_engine::{CountryRegistry, TravelEngine};
use nomad_storage::SqliteStorage;
use tempfile::tempdir;

async fn open_engine(path: &std::path::Path) -> TravelEngine {
    let store = SqliteStorage::new(StorageConfig {
        database_path: path.to_str().unwrap().to_string(),
        wal_mode: true,
    });
    store.initialize().await.unwrap();
    TravelEngine::new(
        Arc::new(store),
        Arc::new(CountryRegistry::builtin()),
        ComplianceRule::default(),
    )
}

fn draft(start: &str, end: &str, code: &str) -> SegmentDraft {
    SegmentDraft::new(
        parse_date(start).unwrap(),
        parse_date(end).unwrap(),
        CountryCode::parse(code).unwrap(),
    )
}

#[tokio::test]
async fn ledger_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let first_id = {
        let engine = open_engine(&path).await;
        let fr = engine
            .submit(draft("2024-01-01", "2024-01-10", "FR").with_notes("ski week"))
            .await
            .unwrap();
        engine
            .submit(draft("2024-02-01", "2024-02-05", "US"))
            .await
            .unwrap();
        engine.store().close().await.unwrap();
        fr.id
    };

    let engine = open_engine(&path).await;
    let segments = engine.segments_newest_first().await.unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].id, first_id);
    assert_eq!(segments[1].notes.as_deref(), Some("ski week"));

    let snap = engine
        .compute_compliance(parse_date("2024-02-10").unwrap())
        .await
        .unwrap();
    assert_eq!(snap.days_used, 10);
    assert_eq!(snap.status, ComplianceStatus::In);

    let countries = engine.store().list_countries().await.unwrap();
    let ids: Vec<&str> = countries.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["country-FR", "country-US"]);
}

#[tokio::test]
async fn overlaps_are_rejected_against_persisted_rows() {
    let dir = tempdir().unwrap();
    let engine = open_engine(&dir.path().join("overlap.db")).await;

    engine
        .submit(draft("2024-01-01", "2024-01-05", "FR"))
        .await
        .unwrap();
    engine
        .submit(draft("2024-01-05", "2024-01-10", "DE"))
        .await
        .unwrap();

    let err = engine
        .submit(draft("2024-01-04", "2024-01-06", "IT"))
        .await
        .unwrap_err();
    let rejection = err.rejection().unwrap();
    assert_eq!(rejection.code, RejectionCode::StartOverlap);
    assert_eq!(rejection.message, "start date overlaps with trip to France");
    assert_eq!(engine.segments_newest_first().await.unwrap().len(), 2);
}
