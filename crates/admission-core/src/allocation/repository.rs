use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Candidate, CandidateId, CourseId, CourseRecord, CourseSeats};
use super::rules::CategoryRules;

/// One persisted seat assignment. A run replaces the whole set, so records
/// never survive across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub candidate_id: CandidateId,
    pub course_id: CourseId,
    pub allocated_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations must hand out candidates with a submitted application
/// only, each with a unique exam rank and an ordered preference list.
pub trait AdmissionRepository: Send + Sync {
    fn submitted_candidates(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn courses(&self) -> Result<Vec<CourseRecord>, RepositoryError>;
    /// Full replace of the allocation set, not a merge.
    fn replace_allocations(&self, records: Vec<AllocationRecord>) -> Result<(), RepositoryError>;
    fn update_seat_matrix(&self, seats: Vec<CourseSeats>) -> Result<(), RepositoryError>;
    fn seat_matrix(&self) -> Result<Vec<CourseSeats>, RepositoryError>;
    fn allocation_for(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<AllocationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Source of the configured reservation percentages.
pub trait RulesStore: Send + Sync {
    fn load(&self) -> Result<CategoryRules, RulesStoreError>;
    fn store(&self, rules: CategoryRules) -> Result<(), RulesStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RulesStoreError {
    #[error("category rules not configured")]
    Missing,
    #[error("rules store unavailable: {0}")]
    Unavailable(String),
}

/// Whether candidates may read their allocation, plus the document
/// verification date announced alongside published results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationStatus {
    pub published: bool,
    pub doc_verification_date: Option<NaiveDate>,
}

impl PublicationStatus {
    pub const fn unpublished() -> Self {
        Self {
            published: false,
            doc_verification_date: None,
        }
    }
}

/// Boolean gate controlling result exposure; the engine has no awareness of
/// it.
pub trait PublicationGate: Send + Sync {
    fn status(&self) -> Result<PublicationStatus, GateError>;
    fn set(&self, status: PublicationStatus) -> Result<(), GateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("publication gate unavailable: {0}")]
    Unavailable(String),
}

/// Candidate-facing view of a published result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResultView {
    pub candidate_id: CandidateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<AllocatedSeatView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_verification_date: Option<NaiveDate>,
}

/// The course a candidate was seated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedSeatView {
    pub course_id: CourseId,
    pub course_name: String,
    pub allocated_at: DateTime<Utc>,
}
