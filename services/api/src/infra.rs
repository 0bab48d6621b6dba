use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use admission_core::allocation::{
    AdmissionRepository, AllocationRecord, Candidate, CandidateId, Category, CategoryRules,
    CourseId, CourseRecord, CourseSeats, GateError, PublicationGate, PublicationStatus,
    RepositoryError, RulesStore, RulesStoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct RepositoryState {
    candidates: Vec<Candidate>,
    courses: Vec<CourseRecord>,
    allocations: Vec<AllocationRecord>,
    seat_matrix: Vec<CourseSeats>,
}

/// Single-process stand-in for the portal database. The mutex doubles as the
/// single-writer region around an allocation run.
#[derive(Default)]
pub(crate) struct InMemoryAdmissionRepository {
    state: Mutex<RepositoryState>,
}

impl InMemoryAdmissionRepository {
    pub(crate) fn seeded(candidates: Vec<Candidate>, courses: Vec<CourseRecord>) -> Self {
        Self {
            state: Mutex::new(RepositoryState {
                candidates,
                courses,
                ..RepositoryState::default()
            }),
        }
    }
}

impl AdmissionRepository for InMemoryAdmissionRepository {
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

#[derive(Default)]
pub(crate) struct InMemoryRulesStore {
    rules: Mutex<Option<CategoryRules>>,
}

impl InMemoryRulesStore {
    pub(crate) fn with_rules(rules: CategoryRules) -> Self {
        Self {
            rules: Mutex::new(Some(rules)),
        }
    }
}

impl RulesStore for InMemoryRulesStore {
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
pub(crate) struct InMemoryPublicationGate {
    status: Mutex<Option<PublicationStatus>>,
}

impl PublicationGate for InMemoryPublicationGate {
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

pub(crate) fn default_category_rules() -> CategoryRules {
    CategoryRules {
        sc: 15,
        st: 7,
        obc: 27,
        ews: 10,
    }
}

/// Parse a `CODE=SEATS` or `CODE:Name=SEATS` course flag.
pub(crate) fn parse_course_spec(raw: &str) -> Result<CourseRecord, String> {
    let (head, seats) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CODE=SEATS or CODE:Name=SEATS, got '{raw}'"))?;

    let total_seats = seats
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("seat count '{seats}' is not a number"))?;

    let (code, name) = match head.split_once(':') {
        Some((code, name)) => (code.trim(), name.trim()),
        None => (head.trim(), head.trim()),
    };
    if code.is_empty() {
        return Err(format!("course code missing in '{raw}'"));
    }

    Ok(CourseRecord {
        id: CourseId::new(code),
        name: name.to_string(),
        total_seats,
    })
}

pub(crate) fn sample_courses() -> Vec<CourseRecord> {
    vec![
        CourseRecord {
            id: CourseId::new("CSE"),
            name: "Computer Science".to_string(),
            total_seats: 4,
        },
        CourseRecord {
            id: CourseId::new("ECE"),
            name: "Electronics".to_string(),
            total_seats: 3,
        },
        CourseRecord {
            id: CourseId::new("MECH"),
            name: "Mechanical".to_string(),
            total_seats: 3,
        },
    ]
}

pub(crate) fn sample_candidates() -> Vec<Candidate> {
    let candidate = |id: u64, rank: u32, category: Category, preferences: &[&str]| Candidate {
        id: CandidateId(id),
        rank,
        category,
        preferences: preferences.iter().copied().map(CourseId::new).collect(),
    };

    vec![
        candidate(101, 1, Category::General, &["CSE", "ECE"]),
        candidate(102, 2, Category::Sc, &["CSE", "MECH"]),
        candidate(103, 3, Category::Obc, &["CSE", "ECE", "MECH"]),
        candidate(104, 4, Category::General, &["CSE", "ECE"]),
        candidate(105, 5, Category::Ews, &["ECE", "CSE"]),
        candidate(106, 6, Category::General, &["CSE", "MECH"]),
        candidate(107, 7, Category::St, &["ECE", "MECH"]),
        candidate(108, 8, Category::General, &["CSE"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_course_spec_with_and_without_name() {
        let bare = parse_course_spec("CSE=60").expect("bare spec");
        assert_eq!(bare.id, CourseId::new("CSE"));
        assert_eq!(bare.name, "CSE");
        assert_eq!(bare.total_seats, 60);

        let named = parse_course_spec("ECE:Electronics=30").expect("named spec");
        assert_eq!(named.name, "Electronics");
        assert_eq!(named.total_seats, 30);
    }

    #[test]
    fn sample_data_builds_preference_lists() {
        let candidates = sample_candidates();
        assert_eq!(candidates.len(), 8);

        let first = &candidates[0];
        assert_eq!(first.id, CandidateId(101));
        assert_eq!(
            first.preferences,
            vec![CourseId::new("CSE"), CourseId::new("ECE")]
        );

        let course_ids: Vec<_> = sample_courses().into_iter().map(|course| course.id).collect();
        for candidate in &candidates {
            assert!(candidate.preferences.iter().all(|id| course_ids.contains(id)));
        }
    }

    #[test]
    fn rejects_malformed_course_specs() {
        assert!(parse_course_spec("CSE").is_err());
        assert!(parse_course_spec("CSE=lots").is_err());
        assert!(parse_course_spec("=10").is_err());
    }
}
