// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Segment ledger: validated writes over a [`SegmentStore`].
//!
//! All mutations go through a [`LedgerTxn`], which holds the ledger's commit
//! lock for its whole lifetime. Validation and commit therefore observe the
//! same ledger state, and two concurrent submissions can never both be
//! accepted against a state that admits only one of them.
//!
//! A successful [`LedgerTxn::accept`] yields an [`Accepted`] token that can
//! only be committed by the transaction that produced it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};
use nomad_core::{NomadError, SegmentDraft, SegmentId, SegmentStore, TravelSegment, Verdict};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::registry::CountryRegistry;
use crate::validator;

/// The committed set of segments plus the lock that serializes writes.
pub struct SegmentLedger {
    store: Arc<dyn SegmentStore>,
    registry: Arc<CountryRegistry>,
    commit_lock: Mutex<()>,
    next_txn: AtomicU64,
}

impl SegmentLedger {
    pub fn new(store: Arc<dyn SegmentStore>, registry: Arc<CountryRegistry>) -> Self {
        Self {
            store,
            registry,
            commit_lock: Mutex::new(()),
            next_txn: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn SegmentStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<CountryRegistry> {
        &self.registry
    }

    /// Every committed segment, in no particular order.
    pub async fn all(&self) -> Result<Vec<TravelSegment>, NomadError> {
        self.store.list_segments().await
    }

    pub async fn get(&self, id: &SegmentId) -> Result<Option<TravelSegment>, NomadError> {
        self.store.get_segment(id).await
    }

    /// Segments whose range shares at least one day with `[start, end]`.
    pub async fn candidates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TravelSegment>, NomadError> {
        self.store.segments_between(start, end).await
    }

    /// Start a write transaction, waiting for any in-flight one to finish.
    pub async fn begin(&self) -> LedgerTxn<'_> {
        let guard = self.commit_lock.lock().await;
        let serial = self.next_txn.fetch_add(1, Ordering::Relaxed);
        debug!(txn = serial, "ledger transaction started");
        LedgerTxn {
            ledger: self,
            _guard: guard,
            serial,
        }
    }

    /// Validate without taking the commit lock.
    ///
    /// The verdict reflects the ledger at the time of the call and may be
    /// stale by the time the caller acts on it. An id that is not in the
    /// ledger excludes nothing.
    pub async fn check(&self, draft: &SegmentDraft) -> Result<Verdict, NomadError> {
        self.validate_against_store(draft).await
    }

    /// Validate, then commit, under one transaction.
    pub async fn submit(&self, draft: SegmentDraft) -> Result<TravelSegment, NomadError> {
        let txn = self.begin().await;
        let accepted = txn.accept(draft).await?;
        txn.commit(accepted).await
    }

    /// Delete a segment by id. Returns whether anything was removed.
    pub async fn remove(&self, id: &SegmentId) -> Result<bool, NomadError> {
        let _guard = self.commit_lock.lock().await;
        let removed = self.store.delete_segment(id).await?;
        if removed {
            info!(segment_id = %id, "segment removed");
        } else {
            debug!(segment_id = %id, "remove requested for unknown segment");
        }
        Ok(removed)
    }

    async fn validate_against_store(&self, draft: &SegmentDraft) -> Result<Verdict, NomadError> {
        let neighbours = if draft.start_date <= draft.end_date {
            self.candidates(draft.start_date, draft.end_date).await?
        } else {
            Vec::new()
        };

        let verdict = validator::validate(
            draft.start_date,
            draft.end_date,
            &neighbours,
            draft.id.as_ref(),
            &self.registry,
        );

        match &verdict {
            Verdict::Accept => debug!(
                start = %draft.start_date,
                end = %draft.end_date,
                country = %draft.country_code,
                "segment accepted"
            ),
            Verdict::Reject(rejection) => warn!(
                start = %draft.start_date,
                end = %draft.end_date,
                country = %draft.country_code,
                code = %rejection.code,
                conflicting_id = rejection.conflicting_id.as_ref().map(|id| id.as_str()),
                "segment rejected: {}",
                rejection.message
            ),
        }

        Ok(verdict)
    }
}

/// A write transaction. Holds the commit lock until dropped or committed.
pub struct LedgerTxn<'a> {
    ledger: &'a SegmentLedger,
    _guard: MutexGuard<'a, ()>,
    serial: u64,
}

/// A draft that passed validation inside a specific transaction.
#[derive(Debug)]
pub struct Accepted {
    serial: u64,
    draft: SegmentDraft,
    previous: Option<TravelSegment>,
}

impl Accepted {
    pub fn draft(&self) -> &SegmentDraft {
        &self.draft
    }
}

impl LedgerTxn<'_> {
    /// Validate `draft` against the ledger as this transaction sees it.
    pub async fn validate(&self, draft: &SegmentDraft) -> Result<Verdict, NomadError> {
        self.ledger.validate_against_store(draft).await
    }

    /// Validate and, on acceptance, return a token for [`LedgerTxn::commit`].
    ///
    /// An edit of an id that is not in the ledger fails with
    /// [`NomadError::SegmentNotFound`]. A rejection is returned as
    /// [`NomadError::Rejected`].
    pub async fn accept(&self, draft: SegmentDraft) -> Result<Accepted, NomadError> {
        let previous = match &draft.id {
            Some(id) => Some(
                self.ledger
                    .get(id)
                    .await?
                    .ok_or_else(|| NomadError::SegmentNotFound(id.clone()))?,
            ),
            None => None,
        };
        self.validate(&draft).await?.into_result()?;
        Ok(Accepted {
            serial: self.serial,
            draft,
            previous,
        })
    }

    /// Persist an accepted draft and end the transaction.
    ///
    /// Creates get a fresh id; edits keep their id and original
    /// `created_at`. The country record for the segment's code is written
    /// if it does not exist yet.
    pub async fn commit(self, accepted: Accepted) -> Result<TravelSegment, NomadError> {
        if accepted.serial != self.serial {
            return Err(NomadError::Internal(format!(
                "accepted draft belongs to transaction {}, not {}",
                accepted.serial, self.serial
            )));
        }

        let now = Utc::now();
        let Accepted {
            draft, previous, ..
        } = accepted;
        let (id, created_at) = match (draft.id, previous) {
            (Some(id), Some(prev)) => (id, prev.created_at),
            (Some(id), None) => (id, now),
            (None, _) => (SegmentId::generate(), now),
        };

        let segment = TravelSegment {
            id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            country_code: draft.country_code,
            notes: draft.notes,
            created_at,
            updated_at: now,
        };

        let store = &self.ledger.store;
        if store.get_country(&segment.country_code).await?.is_none() {
            let country = self.ledger.registry.country(&segment.country_code);
            store.put_country(&country).await?;
            debug!(country_id = %country.id, name = %country.name, "country recorded");
        }
        store.put_segment(&segment).await?;

        info!(
            txn = self.serial,
            segment_id = %segment.id,
            country = %segment.country_code,
            start = %segment.start_date,
            end = %segment.end_date,
            "segment committed"
        );

        Ok(segment)
    }
}
