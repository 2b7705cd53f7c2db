// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the engine, the store implementations, and the CLI.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::NomadError;

/// Unique identifier for a committed travel segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub String);

impl SegmentId {
    /// Generate a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SegmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// ISO 3166-1 alpha-2 country code, always stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse and normalize a country code.
    ///
    /// Surrounding whitespace is trimmed and letters are upper-cased. Anything
    /// other than exactly two ASCII letters is rejected.
    pub fn parse(raw: &str) -> Result<Self, NomadError> {
        let trimmed = raw.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NomadError::InvalidCountryCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = NomadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CountryCode {
    type Err = NomadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A country record as denormalized into the ledger on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Deterministic id derived from the code (`country-FR`).
    pub id: String,
    pub code: CountryCode,
    pub name: String,
    pub is_schengen: bool,
}

impl Country {
    /// Build the country record for `code`, deriving its id.
    pub fn new(code: CountryCode, name: impl Into<String>, is_schengen: bool) -> Self {
        Self {
            id: Self::id_for(&code),
            code,
            name: name.into(),
            is_schengen,
        }
    }

    /// The id every record for `code` carries, so repeated commits never
    /// create a second country row for the same code.
    pub fn id_for(code: &CountryCode) -> String {
        format!("country-{code}")
    }
}

/// A committed stay in one country over a closed range of whole days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelSegment {
    pub id: SegmentId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub country_code: CountryCode,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TravelSegment {
    /// Inclusive number of days covered by the segment.
    pub fn days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }

    /// Whether `date` falls inside the segment's closed range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the segment's closed range shares at least one day with `[start, end]`.
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}

/// A proposed create or edit, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDraft {
    /// `Some` when editing an existing segment, `None` when creating.
    pub id: Option<SegmentId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub country_code: CountryCode,
    pub notes: Option<String>,
}

impl SegmentDraft {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, country_code: CountryCode) -> Self {
        Self {
            id: None,
            start_date,
            end_date,
            country_code,
            notes: None,
        }
    }

    /// Build a draft from timestamps, discarding their time of day.
    pub fn from_timestamps<Tz: TimeZone>(
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
        country_code: CountryCode,
    ) -> Self {
        Self::new(whole_day(start), whole_day(end), country_code)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Mark this draft as a full replacement of the segment with `id`.
    pub fn editing(mut self, id: SegmentId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Why a candidate segment was refused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionCode {
    /// End date before start date.
    InvalidRange,
    /// One range fully contains the other.
    FullOverlap,
    /// The candidate starts inside an existing stay and runs past its end.
    StartOverlap,
    /// The candidate starts before an existing stay and ends inside it.
    EndOverlap,
}

/// Structured rejection returned by the overlap validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: RejectionCode,
    pub message: String,
    /// The first conflicting segment, absent for `INVALID_RANGE`.
    pub conflicting_id: Option<SegmentId>,
    pub conflicting_country: Option<CountryCode>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Outcome of validating a candidate segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Convert into a `Result`, turning a rejection into [`NomadError::Rejected`].
    pub fn into_result(self) -> Result<(), NomadError> {
        match self {
            Verdict::Accept => Ok(()),
            Verdict::Reject(r) => Err(NomadError::Rejected(r)),
        }
    }
}

/// Parameters of the rolling-window rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub quota_days: u32,
    pub window_days: u32,
}

impl Default for ComplianceRule {
    fn default() -> Self {
        Self {
            quota_days: 90,
            window_days: 180,
        }
    }
}

/// Whether the traveler may still be inside the area on the reference date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ComplianceStatus {
    In,
    Out,
}

/// Point-in-time answer to a compliance query. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Schengen days inside the window, capped at the quota.
    pub days_used: u32,
    /// Schengen days inside the window without the cap.
    pub days_present: u32,
    pub overstay_days: u32,
    pub days_remaining: u32,
    pub status: ComplianceStatus,
    pub quota_days: u32,
    pub window_days: u32,
}

/// Where the traveler is (or last was) on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStay {
    pub segment: TravelSegment,
    pub country_name: String,
    /// True when the segment covers the date; false when it ended earlier.
    pub ongoing: bool,
    /// Inclusive days from the segment start up to the date (or its end).
    pub days_so_far: i64,
}

/// Normalize a timestamp to its calendar day in its own time zone.
pub fn whole_day<Tz: TimeZone>(ts: &DateTime<Tz>) -> NaiveDate {
    ts.date_naive()
}

/// Inclusive day count of `[start, end]`; zero when `end < start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        0
    } else {
        (end - start).num_days() + 1
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, NomadError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| NomadError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
