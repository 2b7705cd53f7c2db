// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human and JSON rendering for command results.
//!
//! Results go to stdout. Errors and rejections go to stderr in human mode
//! and to stdout as JSON in `--json` mode, so scripts can parse them.

use std::io::IsTerminal;

use chrono::NaiveDate;
use colored::Colorize;
use nomad_config::NomadConfig;
use nomad_core::{
    ComplianceSnapshot, ComplianceStatus, CurrentStay, NomadError, Rejection, SegmentDraft,
    SegmentId, TravelSegment, Verdict,
};
use nomad_engine::CountryRegistry;
use serde::Serialize;

pub struct Output {
    json: bool,
    color: bool,
}

/// One row of `nomad list --json`.
#[derive(Debug, Serialize)]
struct SegmentView<'a> {
    #[serde(flatten)]
    segment: &'a TravelSegment,
    country_name: String,
    is_schengen: bool,
    days: i64,
}

impl<'a> SegmentView<'a> {
    fn new(segment: &'a TravelSegment, registry: &CountryRegistry) -> Self {
        let info = registry.lookup(&segment.country_code);
        Self {
            segment,
            country_name: info.name,
            is_schengen: info.is_schengen,
            days: segment.days(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorView {
    error: String,
}

impl Output {
    pub fn new(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    fn print_json<T: Serialize>(&self, value: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    pub fn segment_saved(&self, verb: &str, segment: &TravelSegment, registry: &CountryRegistry) {
        if self.json {
            self.print_json(&SegmentView::new(segment, registry));
            return;
        }
        let line = format!(
            "{verb} {} {} .. {} ({} days) {}",
            registry.name_of(&segment.country_code),
            segment.start_date,
            segment.end_date,
            segment.days(),
            segment.id,
        );
        if self.color {
            println!("{} {line}", "✓".green());
        } else {
            println!("[OK] {line}");
        }
    }

    pub fn segment_removed(&self, id: &SegmentId) {
        if self.json {
            self.print_json(&serde_json::json!({ "removed": true, "id": id }));
        } else {
            println!("removed {id}");
        }
    }

    pub fn segments(&self, segments: &[TravelSegment], registry: &CountryRegistry) {
        if self.json {
            let views: Vec<SegmentView<'_>> = segments
                .iter()
                .map(|s| SegmentView::new(s, registry))
                .collect();
            self.print_json(&views);
            return;
        }
        if segments.is_empty() {
            println!("no stays recorded");
            return;
        }
        for segment in segments {
            let info = registry.lookup(&segment.country_code);
            let marker = if info.is_schengen { "S" } else { " " };
            let name = if self.color && info.is_schengen {
                info.name.blue().to_string()
            } else {
                info.name
            };
            println!(
                "{} .. {}  {:>4}d  {marker} {} {name}  {}",
                segment.start_date,
                segment.end_date,
                segment.days(),
                segment.country_code,
                segment.id,
            );
            if let Some(notes) = &segment.notes {
                println!("    {notes}");
            }
        }
    }

    pub fn accepted(&self, draft: &SegmentDraft) {
        if self.json {
            self.print_json(&Verdict::Accept);
        } else {
            println!(
                "ok: {} {} .. {} can be recorded",
                draft.country_code, draft.start_date, draft.end_date
            );
        }
    }

    pub fn snapshot(&self, traveler: &str, snapshot: &ComplianceSnapshot) {
        if self.json {
            self.print_json(snapshot);
            return;
        }
        println!();
        println!("  {traveler} on {}", snapshot.reference_date);
        println!("  {}", "-".repeat(35));
        println!(
            "    Window:     {} .. {} ({} days)",
            snapshot.window_start, snapshot.window_end, snapshot.window_days
        );
        println!(
            "    Used:       {} / {}",
            snapshot.days_used, snapshot.quota_days
        );
        println!("    Remaining:  {}", snapshot.days_remaining);
        if snapshot.overstay_days > 0 {
            let over = format!("{} days over the limit", snapshot.overstay_days);
            if self.color {
                println!("    Overstay:   {}", over.red());
            } else {
                println!("    Overstay:   {over}");
            }
        }
        let status = match snapshot.status {
            ComplianceStatus::In => "In",
            ComplianceStatus::Out => "Out",
        };
        if self.color {
            let painted = match snapshot.status {
                ComplianceStatus::In => status.green(),
                ComplianceStatus::Out => status.red(),
            };
            println!("    Status:     {painted}");
        } else {
            println!("    Status:     {status}");
        }
        println!();
    }

    pub fn current_stay(&self, date: NaiveDate, stay: Option<&CurrentStay>) {
        if self.json {
            self.print_json(&stay);
            return;
        }
        match stay {
            Some(stay) if stay.ongoing => println!(
                "{date}: in {} since {} (day {})",
                stay.country_name, stay.segment.start_date, stay.days_so_far
            ),
            Some(stay) => println!(
                "{date}: last stay was {} until {} ({} days)",
                stay.country_name, stay.segment.end_date, stay.days_so_far
            ),
            None => println!("{date}: no stays recorded on or before this date"),
        }
    }

    pub fn config(&self, config: &NomadConfig, rendered: &str) {
        if self.json {
            self.print_json(config);
        } else {
            print!("{rendered}");
        }
    }

    pub fn rejection(&self, rejection: &Rejection) {
        if self.json {
            self.print_json(&Verdict::Reject(rejection.clone()));
            return;
        }
        if self.color {
            eprintln!("{} {rejection}", "rejected:".red().bold());
        } else {
            eprintln!("rejected: {rejection}");
        }
        if let Some(id) = &rejection.conflicting_id {
            eprintln!("  conflicts with {id}");
        }
    }

    pub fn error(&self, err: &NomadError) {
        if self.json {
            self.print_json(&ErrorView {
                error: err.to_string(),
            });
        } else if self.color {
            eprintln!("{} {err}", "error:".red().bold());
        } else {
            eprintln!("error: {err}");
        }
    }
}
