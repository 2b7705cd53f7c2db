// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod countries;
pub mod segments;

use nomad_core::CountryCode;
use rusqlite::Row;
use rusqlite::types::Type;

/// Read a country code column, failing the row if the stored value is malformed.
pub(crate) fn code_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<CountryCode> {
    let raw: String = row.get(idx)?;
    CountryCode::parse(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
