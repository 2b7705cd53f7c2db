// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling-window compliance projection.
//!
//! [`compute`] is a pure function of the ledger contents, the reference
//! date, and the rule. Nothing is cached between calls, so any reference
//! date (past or future) can be queried after any sequence of edits.

use chrono::{Days, NaiveDate};
use nomad_core::{ComplianceRule, ComplianceSnapshot, ComplianceStatus, TravelSegment};
use tracing::debug;

use crate::registry::CountryRegistry;
use crate::validator::chronological;

/// Closed window `[reference - (window_days - 1), reference]`.
///
/// A zero-length window is treated as one day.
pub fn window_bounds(reference: NaiveDate, window_days: u32) -> (NaiveDate, NaiveDate) {
    let lookback = u64::from(window_days.max(1) - 1);
    let start = reference
        .checked_sub_days(Days::new(lookback))
        .unwrap_or(NaiveDate::MIN);
    (start, reference)
}

/// Count Schengen presence inside the window ending at `reference`.
///
/// Each calendar day is owned by the earliest segment (in start order)
/// that claims it, so a transition day counts once and only toward the
/// segment that ends on it. `days_used` is capped at the quota; the
/// uncapped count is kept in `days_present`.
pub fn compute(
    segments: &[TravelSegment],
    registry: &CountryRegistry,
    reference: NaiveDate,
    rule: ComplianceRule,
) -> ComplianceSnapshot {
    let (window_start, window_end) = window_bounds(reference, rule.window_days);

    let mut ordered: Vec<&TravelSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| chronological(a, b));

    let mut present: u32 = 0;
    let mut claimed_through: Option<NaiveDate> = None;

    for segment in ordered {
        let first_unclaimed = match claimed_through {
            Some(last) if last >= segment.start_date => match last.succ_opt() {
                Some(next) => next,
                None => continue,
            },
            _ => segment.start_date,
        };
        claimed_through = Some(match claimed_through {
            Some(last) => last.max(segment.end_date),
            None => segment.end_date,
        });

        if !registry.is_schengen(&segment.country_code) {
            continue;
        }

        let from = first_unclaimed.max(window_start);
        let to = segment.end_date.min(window_end);
        if from > to {
            continue;
        }
        let days = (to - from).num_days() + 1;
        present = present.saturating_add(u32::try_from(days).unwrap_or(u32::MAX));
    }

    let days_used = present.min(rule.quota_days);
    let snapshot = ComplianceSnapshot {
        reference_date: reference,
        window_start,
        window_end,
        days_used,
        days_present: present,
        overstay_days: present.saturating_sub(rule.quota_days),
        days_remaining: rule.quota_days.saturating_sub(days_used),
        status: if days_used < rule.quota_days {
            ComplianceStatus::In
        } else {
            ComplianceStatus::Out
        },
        quota_days: rule.quota_days,
        window_days: rule.window_days,
    };

    debug!(
        reference = %reference,
        days_used = snapshot.days_used,
        days_present = snapshot.days_present,
        status = %snapshot.status,
        "compliance computed"
    );

    snapshot
}
