use std::collections::BTreeMap;

use super::domain::{Candidate, CandidateId, Category, CourseId, CourseSeats};

/// Result of one allocation run: the candidate-to-course assignment and the
/// number of merit sweeps performed before reaching the fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub assignments: BTreeMap<CandidateId, CourseId>,
    pub rounds: u32,
}

/// Iterative merit-sweep allocation with category-then-general fallback and
/// blanket end-of-round spillover of reserved seats into the general pool.
///
/// Mutates `courses` in place and performs no I/O. Unknown preference course
/// ids and exhausted seats are skipped per preference, never fatal. An
/// assignment, once recorded, is final for the run. Candidates are processed
/// in merit order; ties on `rank` break on candidate id ascending.
pub fn allocate(
    candidates: &[Candidate],
    courses: &mut BTreeMap<CourseId, CourseSeats>,
) -> AllocationOutcome {
    let mut assignments: BTreeMap<CandidateId, CourseId> = BTreeMap::new();
    let mut rounds = 0;

    loop {
        rounds += 1;
        let mut changed = false;

        // Re-sorted fresh each round: spillover shifts capacities between
        // rounds, so any cached ordering would be stale.
        let mut queue: Vec<&Candidate> = candidates
            .iter()
            .filter(|candidate| !assignments.contains_key(&candidate.id))
            .collect();
        queue.sort_by_key(|candidate| (candidate.rank, candidate.id));

        for candidate in queue {
            for preference in &candidate.preferences {
                let Some(course) = courses.get_mut(preference) else {
                    continue;
                };
                if course.available == 0 {
                    continue;
                }

                let seated = (candidate.category.is_reserved()
                    && course.take(candidate.category))
                    || course.take(Category::General);

                if seated {
                    assignments.insert(candidate.id, preference.clone());
                    changed = true;
                    break;
                }
            }
        }

        // Blanket conversion: every seat still reserved after the sweep
        // joins the general pool, whether or not that category had takers.
        for course in courses.values_mut() {
            if course.reserved_remaining() > 0 {
                course.spill_reserved_into_general();
            }
        }

        if !changed {
            break;
        }
    }

    AllocationOutcome {
        assignments,
        rounds,
    }
}
