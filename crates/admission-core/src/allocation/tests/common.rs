use std::sync::{Arc, Mutex};

use crate::allocation::domain::{
    Candidate, CandidateId, Category, CourseId, CourseRecord, CourseSeats,
};
use crate::allocation::repository::{
    AdmissionRepository, AllocationRecord, GateError, PublicationGate, PublicationStatus,
    RepositoryError, RulesStore, RulesStoreError,
};
use crate::allocation::rules::CategoryRules;
use crate::allocation::service::AllocationService;

pub(super) fn candidate(
    id: u64,
    rank: u32,
    category: Category,
    preferences: &[&str],
) -> Candidate {
    Candidate {
        id: CandidateId(id),
        rank,
        category,
        preferences: preferences.iter().copied().map(CourseId::new).collect(),
    }
}

pub(super) fn course(code: &str, name: &str, total_seats: u32) -> CourseRecord {
    CourseRecord {
        id: CourseId::new(code),
        name: name.to_string(),
        total_seats,
    }
}

/// Bare seat counters for engine-level tests that bypass rule derivation.
pub(super) fn seats(code: &str, general: u32, sc: u32, st: u32, obc: u32, ews: u32) -> CourseSeats {
    let available = general + sc + st + obc + ews;
    CourseSeats {
        course_id: CourseId::new(code),
        total_seats: available,
        general,
        sc,
        st,
        obc,
        ews,
        available,
    }
}

pub(super) fn sc_only_rules() -> CategoryRules {
    CategoryRules {
        sc: 20,
        st: 0,
        obc: 0,
        ews: 0,
    }
}

#[derive(Default)]
struct MemoryState {
    candidates: Vec<Candidate>,
    courses: Vec<CourseRecord>,
    allocations: Vec<AllocationRecord>,
    seat_matrix: Vec<CourseSeats>,
}

/// In-memory repository mirroring the single-writer transaction the real
/// store would provide.
#[derive(Default)]
pub(super) struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub(super) fn seeded(candidates: Vec<Candidate>, courses: Vec<CourseRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                candidates,
                courses,
                ..MemoryState::default()
            }),
        }
    }

    pub(super) fn allocations(&self) -> Vec<AllocationRecord> {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .allocations
            .clone()
    }
}

impl AdmissionRepository for MemoryRepository {
    fn submitted_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .expect("repository mutex poisoned")
            .candidates
            .clone())
    }

    fn courses(&self) -> Result<Vec<CourseRecord>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .expect("repository mutex poisoned")
            .courses
            .clone())
    }

    fn replace_allocations(&self, records: Vec<AllocationRecord>) -> Result<(), RepositoryError> {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .allocations = records;
        Ok(())
    }

    fn update_seat_matrix(&self, seats: Vec<CourseSeats>) -> Result<(), RepositoryError> {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .seat_matrix = seats;
        Ok(())
    }

    fn seat_matrix(&self) -> Result<Vec<CourseSeats>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .expect("repository mutex poisoned")
            .seat_matrix
            .clone())
    }

    fn allocation_for(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<AllocationRecord>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .expect("repository mutex poisoned")
            .allocations
            .iter()
            .find(|record| record.candidate_id == *candidate_id)
            .cloned())
    }
}

/// Repository stub that fails every call, for error-path handler tests.
pub(super) struct UnavailableRepository;

impl AdmissionRepository for UnavailableRepository {
    fn submitted_candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("db offline".to_string()))
    }

    fn courses(&self) -> Result<Vec<CourseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("db offline".to_string()))
    }

    fn replace_allocations(&self, _records: Vec<AllocationRecord>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("db offline".to_string()))
    }

    fn update_seat_matrix(&self, _seats: Vec<CourseSeats>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("db offline".to_string()))
    }

    fn seat_matrix(&self) -> Result<Vec<CourseSeats>, RepositoryError> {
        Err(RepositoryError::Unavailable("db offline".to_string()))
    }

    fn allocation_for(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Option<AllocationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("db offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryRulesStore {
    rules: Mutex<Option<CategoryRules>>,
}

impl MemoryRulesStore {
    pub(super) fn with_rules(rules: CategoryRules) -> Self {
        Self {
            rules: Mutex::new(Some(rules)),
        }
    }
}

impl RulesStore for MemoryRulesStore {
    fn load(&self) -> Result<CategoryRules, RulesStoreError> {
        self.rules
            .lock()
            .expect("rules mutex poisoned")
            .ok_or(RulesStoreError::Missing)
    }

    fn store(&self, rules: CategoryRules) -> Result<(), RulesStoreError> {
        *self.rules.lock().expect("rules mutex poisoned") = Some(rules);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryGate {
    status: Mutex<Option<PublicationStatus>>,
}

impl PublicationGate for MemoryGate {
    fn status(&self) -> Result<PublicationStatus, GateError> {
        Ok(self
            .status
            .lock()
            .expect("gate mutex poisoned")
            .unwrap_or(PublicationStatus::unpublished()))
    }

    fn set(&self, status: PublicationStatus) -> Result<(), GateError> {
        *self.status.lock().expect("gate mutex poisoned") = Some(status);
        Ok(())
    }
}

pub(super) type MemoryService = AllocationService<MemoryRepository, MemoryRulesStore, MemoryGate>;

pub(super) fn service(
    candidates: Vec<Candidate>,
    courses: Vec<CourseRecord>,
    rules: CategoryRules,
) -> (MemoryService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded(candidates, courses));
    let service = AllocationService::new(
        repository.clone(),
        Arc::new(MemoryRulesStore::with_rules(rules)),
        Arc::new(MemoryGate::default()),
    );
    (service, repository)
}

/// The worked single-course scenario: ten seats, 20% SC reservation, three
/// candidates chasing the same course.
pub(super) fn example_scenario() -> (Vec<Candidate>, Vec<CourseRecord>, CategoryRules) {
    let candidates = vec![
        candidate(1, 1, Category::Sc, &["CSE"]),
        candidate(2, 2, Category::General, &["CSE"]),
        candidate(3, 3, Category::Sc, &["CSE"]),
    ];
    let courses = vec![course("CSE", "Computer Science", 10)];
    (candidates, courses, sc_only_rules())
}
