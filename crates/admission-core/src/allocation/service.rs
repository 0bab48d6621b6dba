use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{CandidateId, CourseId, CourseSeats};
use super::engine;
use super::repository::{
    AdmissionRepository, AllocatedSeatView, AllocationRecord, AllocationResultView, GateError,
    PublicationGate, PublicationStatus, RepositoryError, RulesStore, RulesStoreError,
};
use super::rules::{CategoryRules, RulesError};

/// Service composing the repository, rules store, and publication gate
/// around the allocation engine.
///
/// Callers are responsible for the single-writer region around
/// `run_allocation`: two concurrent runs over stale snapshots would
/// double-allocate seats.
pub struct AllocationService<R, S, G> {
    repository: Arc<R>,
    rules: Arc<S>,
    gate: Arc<G>,
}

/// Totals reported after a completed allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub allocated: usize,
    pub total_candidates: usize,
    pub rounds: u32,
}

impl<R, S, G> AllocationService<R, S, G>
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    pub fn new(repository: Arc<R>, rules: Arc<S>, gate: Arc<G>) -> Self {
        Self {
            repository,
            rules,
            gate,
        }
    }

    /// Run the allocation engine over a fresh candidate/course snapshot and
    /// persist the outcome, replacing any previous allocation set.
    pub fn run_allocation(&self) -> Result<AllocationSummary, AllocationServiceError> {
        let rules = self.rules.load()?;
        rules.validate()?;

        let candidates = self.repository.submitted_candidates()?;
        let course_records = self.repository.courses()?;

        let mut seats: BTreeMap<CourseId, CourseSeats> = course_records
            .iter()
            .map(|course| {
                (
                    course.id.clone(),
                    rules.seat_split(course.id.clone(), course.total_seats),
                )
            })
            .collect();

        info!(
            candidates = candidates.len(),
            courses = seats.len(),
            "starting allocation run"
        );

        let outcome = engine::allocate(&candidates, &mut seats);

        let allocated_at = Utc::now();
        let records = outcome
            .assignments
            .iter()
            .map(|(candidate_id, course_id)| AllocationRecord {
                candidate_id: *candidate_id,
                course_id: course_id.clone(),
                allocated_at,
            })
            .collect();

        self.repository.replace_allocations(records)?;
        self.repository
            .update_seat_matrix(seats.into_values().collect())?;

        let summary = AllocationSummary {
            allocated: outcome.assignments.len(),
            total_candidates: candidates.len(),
            rounds: outcome.rounds,
        };

        info!(
            allocated = summary.allocated,
            total_candidates = summary.total_candidates,
            rounds = summary.rounds,
            "allocation run complete"
        );

        Ok(summary)
    }

    pub fn rules(&self) -> Result<CategoryRules, AllocationServiceError> {
        Ok(self.rules.load()?)
    }

    /// Persist new reservation percentages after boundary validation.
    pub fn update_rules(&self, rules: CategoryRules) -> Result<(), AllocationServiceError> {
        rules.validate()?;
        self.rules.store(rules)?;
        Ok(())
    }

    /// Expose results to candidates, announcing the document verification
    /// date alongside.
    pub fn publish(&self, doc_verification_date: NaiveDate) -> Result<(), AllocationServiceError> {
        self.gate.set(PublicationStatus {
            published: true,
            doc_verification_date: Some(doc_verification_date),
        })?;
        info!(%doc_verification_date, "results published");
        Ok(())
    }

    pub fn unpublish(&self) -> Result<(), AllocationServiceError> {
        self.gate.set(PublicationStatus::unpublished())?;
        info!("results unpublished");
        Ok(())
    }

    pub fn publication_status(&self) -> Result<PublicationStatus, AllocationServiceError> {
        Ok(self.gate.status()?)
    }

    /// Candidate-facing result lookup, refused while results are
    /// unpublished.
    pub fn result_for(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<AllocationResultView, AllocationServiceError> {
        let status = self.gate.status()?;
        if !status.published {
            return Err(AllocationServiceError::ResultsNotPublished);
        }

        let allocation = match self.repository.allocation_for(candidate_id)? {
            Some(record) => {
                let course_name = self
                    .repository
                    .courses()?
                    .into_iter()
                    .find(|course| course.id == record.course_id)
                    .map(|course| course.name)
                    .unwrap_or_default();

                Some(AllocatedSeatView {
                    course_id: record.course_id,
                    course_name,
                    allocated_at: record.allocated_at,
                })
            }
            None => None,
        };

        Ok(AllocationResultView {
            candidate_id: *candidate_id,
            allocation,
            doc_verification_date: status.doc_verification_date,
        })
    }

    /// Ungated admin lookup of a candidate's current assignment.
    pub fn allocation_for(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<AllocationRecord>, AllocationServiceError> {
        Ok(self.repository.allocation_for(candidate_id)?)
    }

    /// Final per-course counters from the most recent run, for the admin
    /// seat-matrix view.
    pub fn seat_matrix(&self) -> Result<Vec<CourseSeats>, AllocationServiceError> {
        Ok(self.repository.seat_matrix()?)
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    RulesStore(#[from] RulesStoreError),
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("results not published yet")]
    ResultsNotPublished,
}
