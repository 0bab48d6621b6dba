//! Seat allocation for the admission portal: domain snapshots, reservation
//! rules, the merit-sweep engine, collaborator ports, and the service and
//! router that tie them together.
//!
//! The engine itself is pure computation over call-scoped snapshots; all
//! persistence and the publication gate live behind the port traits so the
//! whole pipeline can be exercised with in-memory fixtures.

pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Candidate, CandidateId, Category, CourseId, CourseRecord, CourseSeats};
pub use engine::{allocate, AllocationOutcome};
pub use repository::{
    AdmissionRepository, AllocatedSeatView, AllocationRecord, AllocationResultView, GateError,
    PublicationGate, PublicationStatus, RepositoryError, RulesStore, RulesStoreError,
};
pub use router::admission_router;
pub use rules::{CategoryRules, RulesError};
pub use service::{AllocationService, AllocationServiceError, AllocationSummary};
