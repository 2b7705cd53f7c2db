// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overlap validation for proposed travel segments.
//!
//! Two committed segments may share at most one calendar day, and only as a
//! transition day: the day one stay ends is the day the next one starts.
//! [`validate`] decides whether a candidate range keeps that invariant and,
//! if not, reports the first conflict in ascending start-date order.

use std::cmp::Ordering;

use chrono::NaiveDate;
use nomad_core::{Rejection, RejectionCode, SegmentId, TravelSegment, Verdict};

use crate::registry::CountryRegistry;

/// How a candidate range relates to one existing segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// No shared day.
    Disjoint,
    /// Exactly one shared day, where one range ends and the other starts.
    Transition,
    /// The candidate lies entirely within the existing segment.
    Inside,
    /// The existing segment lies entirely within the candidate.
    Contains,
    /// The candidate starts inside the existing segment and ends after it.
    StartsInside,
    /// The candidate starts before the existing segment and ends inside it.
    EndsInside,
}

/// Classify `[start, end]` against `[existing_start, existing_end]`.
///
/// The ranges touch when exactly one of `start == existing_end` and
/// `end == existing_start` holds; they then share only that day. The
/// relation is symmetric, so a single-day stay may sit on either side of a
/// transition. Two identical single-day ranges match at both ends and are
/// containment.
pub fn classify(
    start: NaiveDate,
    end: NaiveDate,
    existing_start: NaiveDate,
    existing_end: NaiveDate,
) -> Relation {
    if end < existing_start || start > existing_end {
        return Relation::Disjoint;
    }

    if (start == existing_end) != (end == existing_start) {
        return Relation::Transition;
    }

    if start >= existing_start && end <= existing_end {
        Relation::Inside
    } else if start <= existing_start && end >= existing_end {
        Relation::Contains
    } else if start > existing_start {
        Relation::StartsInside
    } else {
        Relation::EndsInside
    }
}

/// Decide whether a candidate range may join the ledger.
///
/// The segment whose id equals `excluding` is ignored, so an edited segment
/// is never compared with its own previous bounds. A malformed range is
/// rejected before any segment is looked at. A transition day already
/// shared by two segments cannot be claimed by a third.
pub fn validate(
    start: NaiveDate,
    end: NaiveDate,
    existing: &[TravelSegment],
    excluding: Option<&SegmentId>,
    registry: &CountryRegistry,
) -> Verdict {
    if end < start {
        return Verdict::Reject(Rejection {
            code: RejectionCode::InvalidRange,
            message: "end date before start date".to_string(),
            conflicting_id: None,
            conflicting_country: None,
        });
    }

    let mut ordered: Vec<&TravelSegment> = existing
        .iter()
        .filter(|s| excluding != Some(&s.id))
        .collect();
    ordered.sort_by(|a, b| chronological(a, b));

    let mut transition_days: Vec<NaiveDate> = Vec::with_capacity(2);
    for segment in ordered {
        let name = registry.name_of(&segment.country_code);
        let (code, message) = match classify(start, end, segment.start_date, segment.end_date) {
            Relation::Disjoint => continue,
            Relation::Transition => {
                let day = if start == segment.end_date { start } else { end };
                if !transition_days.contains(&day) {
                    transition_days.push(day);
                    continue;
                }
                (
                    RejectionCode::FullOverlap,
                    format!("transition day {day} is already shared with trip to {name}"),
                )
            }
            Relation::Inside => (
                RejectionCode::FullOverlap,
                format!("complete overlap with existing trip in {name}"),
            ),
            Relation::Contains => (
                RejectionCode::FullOverlap,
                format!("completely overlaps contained trip in {name}"),
            ),
            Relation::StartsInside => (
                RejectionCode::StartOverlap,
                format!("start date overlaps with trip to {name}"),
            ),
            Relation::EndsInside => (
                RejectionCode::EndOverlap,
                format!("end date overlaps with trip to {name}"),
            ),
        };

        return Verdict::Reject(Rejection {
            code,
            message,
            conflicting_id: Some(segment.id.clone()),
            conflicting_country: Some(segment.country_code.clone()),
        });
    }

    Verdict::Accept
}

/// Ascending by start date, then end date, then id.
pub fn chronological(a: &TravelSegment, b: &TravelSegment) -> Ordering {
    a.start_date
        .cmp(&b.start_date)
        .then(a.end_date.cmp(&b.end_date))
        .then_with(|| a.id.cmp(&b.id))
}
