// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Country record operations.

use nomad_core::{Country, CountryCode, NomadError};
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};
use crate::queries::code_column;

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get(0)?,
        code: code_column(row, 1)?,
        name: row.get(2)?,
        is_schengen: row.get(3)?,
    })
}

pub async fn get_country(db: &Database, code: &CountryCode) -> Result<Option<Country>, NomadError> {
    let id = Country::id_for(code);
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, code, name, is_schengen FROM countries WHERE id = ?1",
                params![id],
                country_from_row,
            );
            match result {
                Ok(country) => Ok(Some(country)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a country unless a record with the same id already exists.
pub async fn insert_country(db: &Database, country: &Country) -> Result<(), NomadError> {
    let country = country.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO countries (id, code, name, is_schengen)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    country.id,
                    country.code.as_str(),
                    country.name,
                    country.is_schengen,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_countries(db: &Database) -> Result<Vec<Country>, NomadError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, code, name, is_schengen FROM countries ORDER BY code")?;
            let rows = stmt.query_map([], country_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
