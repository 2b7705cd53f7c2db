// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static country classification table.
//!
//! Maps a country code to its display name and Schengen membership. The
//! table is fixed once built; lookups of unknown codes never fail and
//! resolve to a non-Schengen entry named after the code itself.

use std::collections::HashMap;

use nomad_config::model::CountryEntry;
use nomad_core::{Country, CountryCode, NomadError};

/// Schengen members: (code, name).
const SCHENGEN: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("BG", "Bulgaria"),
    ("CH", "Switzerland"),
    ("CZ", "Czechia"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GR", "Greece"),
    ("HR", "Croatia"),
    ("HU", "Hungary"),
    ("IS", "Iceland"),
    ("IT", "Italy"),
    ("LI", "Liechtenstein"),
    ("LT", "Lithuania"),
    ("LU", "Luxembourg"),
    ("LV", "Latvia"),
    ("MT", "Malta"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("SE", "Sweden"),
    ("SI", "Slovenia"),
    ("SK", "Slovakia"),
];

/// Frequently visited countries outside the area, named for display.
const OTHER: &[(&str, &str)] = &[
    ("AD", "Andorra"),
    ("AE", "United Arab Emirates"),
    ("AL", "Albania"),
    ("AR", "Argentina"),
    ("AU", "Australia"),
    ("BA", "Bosnia and Herzegovina"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CL", "Chile"),
    ("CN", "China"),
    ("CO", "Colombia"),
    ("CY", "Cyprus"),
    ("EG", "Egypt"),
    ("GB", "United Kingdom"),
    ("GE", "Georgia"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IN", "India"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("MA", "Morocco"),
    ("MC", "Monaco"),
    ("MD", "Moldova"),
    ("ME", "Montenegro"),
    ("MK", "North Macedonia"),
    ("MX", "Mexico"),
    ("NZ", "New Zealand"),
    ("PE", "Peru"),
    ("RS", "Serbia"),
    ("SG", "Singapore"),
    ("SM", "San Marino"),
    ("TH", "Thailand"),
    ("TR", "Türkiye"),
    ("UA", "Ukraine"),
    ("US", "United States"),
    ("VA", "Vatican City"),
    ("VN", "Vietnam"),
    ("ZA", "South Africa"),
];

/// Name and classification for one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub name: String,
    pub is_schengen: bool,
}

/// Read-only code → country lookup.
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    entries: HashMap<CountryCode, CountryInfo>,
}

impl CountryRegistry {
    /// The built-in table.
    pub fn builtin() -> Self {
        let entries = SCHENGEN
            .iter()
            .map(|&(code, name)| (code, name, true))
            .chain(OTHER.iter().map(|&(code, name)| (code, name, false)))
            .filter_map(|(code, name, is_schengen)| {
                CountryCode::parse(code).ok().map(|code| {
                    (
                        code,
                        CountryInfo {
                            name: name.to_string(),
                            is_schengen,
                        },
                    )
                })
            })
            .collect();
        Self { entries }
    }

    /// An empty table: every lookup takes the unknown-code default.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The built-in table with configured entries layered on top.
    ///
    /// A configured entry replaces the built-in one for the same code.
    pub fn from_config(entries: &[CountryEntry]) -> Result<Self, NomadError> {
        let mut registry = Self::builtin();
        for entry in entries {
            let code = CountryCode::parse(&entry.code)?;
            registry.insert(code, entry.name.clone(), entry.schengen);
        }
        Ok(registry)
    }

    /// Add or replace one entry. Only used while building the table.
    pub fn insert(&mut self, code: CountryCode, name: impl Into<String>, is_schengen: bool) {
        self.entries.insert(
            code,
            CountryInfo {
                name: name.into(),
                is_schengen,
            },
        );
    }

    pub fn contains(&self, code: &CountryCode) -> bool {
        self.entries.contains_key(code)
    }

    /// Look up a code, defaulting unknown codes to a non-Schengen entry
    /// named after the code.
    pub fn lookup(&self, code: &CountryCode) -> CountryInfo {
        self.entries.get(code).cloned().unwrap_or_else(|| CountryInfo {
            name: code.to_string(),
            is_schengen: false,
        })
    }

    pub fn name_of(&self, code: &CountryCode) -> String {
        self.lookup(code).name
    }

    pub fn is_schengen(&self, code: &CountryCode) -> bool {
        self.entries.get(code).is_some_and(|info| info.is_schengen)
    }

    /// The country record the ledger denormalizes for `code`.
    pub fn country(&self, code: &CountryCode) -> Country {
        let info = self.lookup(code);
        Country::new(code.clone(), info.name, info.is_schengen)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
