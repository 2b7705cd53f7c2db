// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Each handler runs one engine operation and hands the result to
//! [`Output`]. Errors propagate to `main`, which picks the exit status.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use nomad_config::NomadConfig;
use nomad_core::{NomadError, SegmentDraft, SegmentId, SegmentStore, Verdict};
use nomad_engine::{MemorySegmentStore, TravelEngine};
use nomad_storage::SqliteStorage;
use tracing::debug;

use crate::SegmentArgs;
use crate::output::Output;

/// Build the engine over the configured store, opening it first.
pub async fn open_engine(config: &NomadConfig, ephemeral: bool) -> Result<TravelEngine, NomadError> {
    let store: Arc<dyn SegmentStore> = if ephemeral {
        Arc::new(MemorySegmentStore::new())
    } else {
        Arc::new(SqliteStorage::new(config.storage.clone()))
    };
    store.initialize().await?;
    debug!(store = store.name(), "store ready");
    TravelEngine::from_config(config, store)
}

fn draft_from(args: SegmentArgs) -> SegmentDraft {
    let draft = SegmentDraft::new(args.start, args.end, args.country);
    match args.notes {
        Some(notes) => draft.with_notes(notes),
        None => draft,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn add(engine: &TravelEngine, args: SegmentArgs, out: &Output) -> Result<(), NomadError> {
    let segment = engine.submit(draft_from(args)).await?;
    out.segment_saved("added", &segment, engine.registry());
    Ok(())
}

pub async fn edit(
    engine: &TravelEngine,
    id: String,
    args: SegmentArgs,
    out: &Output,
) -> Result<(), NomadError> {
    let draft = draft_from(args).editing(SegmentId(id));
    let segment = engine.submit(draft).await?;
    out.segment_saved("updated", &segment, engine.registry());
    Ok(())
}

pub async fn remove(engine: &TravelEngine, id: String, out: &Output) -> Result<(), NomadError> {
    let id = SegmentId(id);
    if !engine.remove_segment(&id).await? {
        return Err(NomadError::SegmentNotFound(id));
    }
    out.segment_removed(&id);
    Ok(())
}

pub async fn list(engine: &TravelEngine, out: &Output) -> Result<(), NomadError> {
    let segments = engine.segments_newest_first().await?;
    out.segments(&segments, engine.registry());
    Ok(())
}

/// Validate only. A rejection is returned as an error so the exit status
/// matches `add`.
pub async fn check(
    engine: &TravelEngine,
    args: SegmentArgs,
    id: Option<String>,
    out: &Output,
) -> Result<(), NomadError> {
    let mut draft = draft_from(args);
    if let Some(id) = id {
        draft = draft.editing(SegmentId(id));
    }
    match engine.validate_segment(&draft).await? {
        Verdict::Accept => {
            out.accepted(&draft);
            Ok(())
        }
        Verdict::Reject(rejection) => Err(NomadError::Rejected(rejection)),
    }
}

pub async fn status(
    engine: &TravelEngine,
    config: &NomadConfig,
    date: Option<NaiveDate>,
    out: &Output,
) -> Result<(), NomadError> {
    let snapshot = engine.compute_compliance(date.unwrap_or_else(today)).await?;
    out.snapshot(&config.traveler.name, &snapshot);
    Ok(())
}

pub async fn where_am_i(
    engine: &TravelEngine,
    date: Option<NaiveDate>,
    out: &Output,
) -> Result<(), NomadError> {
    let date = date.unwrap_or_else(today);
    let stay = engine.current_stay(date).await?;
    out.current_stay(date, stay.as_ref());
    Ok(())
}

pub fn show_config(config: &NomadConfig, out: &Output) -> Result<(), NomadError> {
    let rendered = config
        .to_toml_string()
        .map_err(|e| NomadError::Config(format!("failed to render configuration: {e}")))?;
    out.config(config, &rendered);
    Ok(())
}
