// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The travel engine: one traveler's ledger plus the queries over it.
//!
//! Collaborators are injected at construction. The engine holds no global
//! state and emits no change notifications; each command returns the value
//! it produced and the caller decides what to refresh.

use std::sync::Arc;

use chrono::NaiveDate;
use nomad_config::NomadConfig;
use nomad_core::{
    ComplianceRule, ComplianceSnapshot, CurrentStay, NomadError, SegmentDraft, SegmentId,
    SegmentStore, TravelSegment, Verdict,
};
use nomad_core::types::inclusive_days;

use crate::compliance;
use crate::ledger::{LedgerTxn, SegmentLedger};
use crate::registry::CountryRegistry;

pub struct TravelEngine {
    ledger: SegmentLedger,
    rule: ComplianceRule,
}

impl TravelEngine {
    pub fn new(
        store: Arc<dyn SegmentStore>,
        registry: Arc<CountryRegistry>,
        rule: ComplianceRule,
    ) -> Self {
        Self {
            ledger: SegmentLedger::new(store, registry),
            rule,
        }
    }

    /// Build an engine from loaded configuration over the given store.
    pub fn from_config(
        config: &NomadConfig,
        store: Arc<dyn SegmentStore>,
    ) -> Result<Self, NomadError> {
        let registry = CountryRegistry::from_config(&config.countries)?;
        Ok(Self::new(store, Arc::new(registry), config.compliance.rule()))
    }

    pub fn rule(&self) -> ComplianceRule {
        self.rule
    }

    pub fn registry(&self) -> &CountryRegistry {
        self.ledger.registry()
    }

    pub fn store(&self) -> &Arc<dyn SegmentStore> {
        self.ledger.store()
    }

    /// Advisory validation. Takes no lock and writes nothing.
    ///
    /// The result is always a verdict. A draft whose id is not in the ledger
    /// is checked as if it were new.
    pub async fn validate_segment(&self, draft: &SegmentDraft) -> Result<Verdict, NomadError> {
        self.ledger.check(draft).await
    }

    /// Open a write transaction for a validate-then-commit sequence.
    pub async fn begin(&self) -> LedgerTxn<'_> {
        self.ledger.begin().await
    }

    /// Validate and commit a create or edit atomically.
    pub async fn submit(&self, draft: SegmentDraft) -> Result<TravelSegment, NomadError> {
        self.ledger.submit(draft).await
    }

    pub async fn remove_segment(&self, id: &SegmentId) -> Result<bool, NomadError> {
        self.ledger.remove(id).await
    }

    pub async fn get_segment(&self, id: &SegmentId) -> Result<Option<TravelSegment>, NomadError> {
        self.ledger.get(id).await
    }

    /// All segments, most recent start first.
    pub async fn segments_newest_first(&self) -> Result<Vec<TravelSegment>, NomadError> {
        let mut segments = self.ledger.all().await?;
        segments.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.end_date.cmp(&a.end_date))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(segments)
    }

    /// Rolling-window compliance as of `reference`.
    pub async fn compute_compliance(
        &self,
        reference: NaiveDate,
    ) -> Result<ComplianceSnapshot, NomadError> {
        let segments = self.ledger.all().await?;
        Ok(compliance::compute(
            &segments,
            self.registry(),
            reference,
            self.rule,
        ))
    }

    /// Where the traveler is on `date`.
    ///
    /// Prefers a segment covering the date, taking the later arrival when a
    /// transition day is covered twice. Otherwise falls back to the most
    /// recent segment that ended before the date. `None` when the ledger has
    /// nothing on or before `date`.
    pub async fn current_stay(&self, date: NaiveDate) -> Result<Option<CurrentStay>, NomadError> {
        let segments = self.ledger.all().await?;

        let covering = segments
            .iter()
            .filter(|s| s.covers(date))
            .max_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));

        let stay = match covering {
            Some(segment) => Some((segment, true)),
            None => segments
                .iter()
                .filter(|s| s.end_date < date)
                .max_by(|a, b| a.end_date.cmp(&b.end_date).then_with(|| a.id.cmp(&b.id)))
                .map(|segment| (segment, false)),
        };

        Ok(stay.map(|(segment, ongoing)| {
            let until = if ongoing { date } else { segment.end_date };
            CurrentStay {
                country_name: self.registry().name_of(&segment.country_code),
                days_so_far: inclusive_days(segment.start_date, until),
                ongoing,
                segment: segment.clone(),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySegmentStore;
    use nomad_core::types::parse_date;
    use nomad_core::{ComplianceStatus, CountryCode};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn engine() -> TravelEngine {
        TravelEngine::new(
            Arc::new(MemorySegmentStore::new()),
            Arc::new(CountryRegistry::builtin()),
            ComplianceRule::default(),
        )
    }

    fn draft(start: &str, end: &str, code: &str) -> SegmentDraft {
        SegmentDraft::new(d(start), d(end), CountryCode::parse(code).unwrap())
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let engine = engine();
        engine.submit(draft("2024-01-01", "2024-01-05", "FR")).await.unwrap();
        engine.submit(draft("2024-03-01", "2024-03-05", "IT")).await.unwrap();
        engine.submit(draft("2024-02-01", "2024-02-05", "US")).await.unwrap();

        let starts: Vec<NaiveDate> = engine
            .segments_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.start_date)
            .collect();
        assert_eq!(starts, vec![d("2024-03-01"), d("2024-02-01"), d("2024-01-01")]);
    }

    #[tokio::test]
    async fn compliance_reflects_current_ledger() {
        let engine = engine();
        let fr = engine.submit(draft("2024-01-01", "2024-01-10", "FR")).await.unwrap();
        engine.submit(draft("2024-02-01", "2024-02-05", "US")).await.unwrap();

        let snap = engine.compute_compliance(d("2024-02-10")).await.unwrap();
        assert_eq!(snap.days_used, 10);
        assert_eq!(snap.status, ComplianceStatus::In);

        engine.remove_segment(&fr.id).await.unwrap();
        let snap = engine.compute_compliance(d("2024-02-10")).await.unwrap();
        assert_eq!(snap.days_used, 0);
    }

    #[tokio::test]
    async fn current_stay_prefers_the_later_arrival_on_a_transition_day() {
        let engine = engine();
        engine.submit(draft("2024-01-01", "2024-01-05", "FR")).await.unwrap();
        engine.submit(draft("2024-01-05", "2024-01-10", "DE")).await.unwrap();

        let stay = engine.current_stay(d("2024-01-05")).await.unwrap().unwrap();
        assert_eq!(stay.country_name, "Germany");
        assert!(stay.ongoing);
        assert_eq!(stay.days_so_far, 1);

        let stay = engine.current_stay(d("2024-01-03")).await.unwrap().unwrap();
        assert_eq!(stay.country_name, "France");
        assert_eq!(stay.days_so_far, 3);
    }

    #[tokio::test]
    async fn current_stay_falls_back_to_last_finished_segment() {
        let engine = engine();
        engine.submit(draft("2024-01-01", "2024-01-05", "ES")).await.unwrap();

        let stay = engine.current_stay(d("2024-02-01")).await.unwrap().unwrap();
        assert!(!stay.ongoing);
        assert_eq!(stay.days_so_far, 5);

        assert!(engine.current_stay(d("2023-12-31")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn from_config_applies_rule_and_countries() {
        let config = nomad_config::load_config_from_str(
            r#"
[compliance]
quota_days = 10
window_days = 30

[[countries]]
code = "XK"
name = "Kosovo"
"#,
        )
        .unwrap();
        let engine =
            TravelEngine::from_config(&config, Arc::new(MemorySegmentStore::new())).unwrap();
        assert_eq!(engine.rule().quota_days, 10);
        assert_eq!(engine.rule().window_days, 30);
        assert_eq!(
            engine.registry().name_of(&CountryCode::parse("XK").unwrap()),
            "Kosovo"
        );
    }
}
