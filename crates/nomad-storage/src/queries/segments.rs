// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Travel segment CRUD operations.

use chrono::NaiveDate;
use nomad_core::{NomadError, SegmentId, TravelSegment};
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};
use crate::queries::code_column;

const SELECT_COLUMNS: &str =
    "SELECT id, start_date, end_date, country_code, notes, created_at, updated_at \
     FROM travel_segments";

fn segment_from_row(row: &Row<'_>) -> rusqlite::Result<TravelSegment> {
    Ok(TravelSegment {
        id: SegmentId(row.get(0)?),
        start_date: row.get(1)?,
        end_date: row.get(2)?,
        country_code: code_column(row, 3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// All segments, ordered by start date.
pub async fn list_segments(db: &Database) -> Result<Vec<TravelSegment>, NomadError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY start_date, end_date, id"))?;
            let rows = stmt.query_map([], segment_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a segment by id.
pub async fn get_segment(
    db: &Database,
    id: &SegmentId,
) -> Result<Option<TravelSegment>, NomadError> {
    let id = id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            match stmt.query_row(params![id], segment_from_row) {
                Ok(segment) => Ok(Some(segment)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a segment, or fully replace the row with the same id.
pub async fn upsert_segment(db: &Database, segment: &TravelSegment) -> Result<(), NomadError> {
    let segment = segment.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO travel_segments
                     (id, start_date, end_date, country_code, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     start_date = excluded.start_date,
                     end_date = excluded.end_date,
                     country_code = excluded.country_code,
                     notes = excluded.notes,
                     created_at = excluded.created_at,
                     updated_at = excluded.updated_at",
                params![
                    segment.id.as_str(),
                    segment.start_date,
                    segment.end_date,
                    segment.country_code.as_str(),
                    segment.notes,
                    segment.created_at,
                    segment.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a segment. Returns whether a row was removed.
pub async fn delete_segment(db: &Database, id: &SegmentId) -> Result<bool, NomadError> {
    let id = id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute("DELETE FROM travel_segments WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Segments sharing at least one day with `[start, end]`, via the range index.
pub async fn segments_between(
    db: &Database,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<TravelSegment>, NomadError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE start_date <= ?2 AND end_date >= ?1 \
                 ORDER BY start_date, end_date, id"
            ))?;
            let rows = stmt.query_map(params![start, end], segment_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
