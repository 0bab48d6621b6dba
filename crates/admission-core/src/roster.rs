//! Candidate roster import from the admin CSV export.
//!
//! Expected columns: `Candidate ID`, `Exam Rank`, `Category`, `Preferences`
//! with preferences as pipe-separated course codes in priority order, e.g.
//! `CSE|ECE|MECH`.

use std::io::Read;

use serde::Deserialize;

use crate::allocation::domain::{Candidate, CandidateId, Category, CourseId};

pub const MAX_PREFERENCES: usize = 3;

/// Errors raised while reading a roster export.
#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("candidate {candidate_id}: unknown category '{value}'")]
    UnknownCategory { candidate_id: u64, value: String },
    #[error("candidate {candidate_id}: between 1 and {MAX_PREFERENCES} preferences required, found {found}")]
    PreferenceCount { candidate_id: u64, found: usize },
    #[error("candidate {candidate_id}: duplicate preference '{course}'")]
    DuplicatePreference { candidate_id: u64, course: String },
    #[error("duplicate candidate id {candidate_id}")]
    DuplicateCandidate { candidate_id: u64 },
    #[error("candidates {first} and {second} share exam rank {rank}")]
    DuplicateRank { rank: u32, first: u64, second: u64 },
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Candidate ID")]
    candidate_id: u64,
    #[serde(rename = "Exam Rank")]
    exam_rank: u32,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Preferences")]
    preferences: String,
}

/// Parse a roster export into engine-ready candidate snapshots.
///
/// Rank uniqueness is enforced here because it is a precondition of the
/// allocation engine, which assumes distinct ranks.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<Candidate>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candidates: Vec<Candidate> = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        let candidate = candidate_from_row(row)?;

        if let Some(existing) = candidates.iter().find(|c| c.id == candidate.id) {
            return Err(RosterImportError::DuplicateCandidate {
                candidate_id: existing.id.0,
            });
        }
        if let Some(existing) = candidates.iter().find(|c| c.rank == candidate.rank) {
            return Err(RosterImportError::DuplicateRank {
                rank: candidate.rank,
                first: existing.id.0,
                second: candidate.id.0,
            });
        }

        candidates.push(candidate);
    }

    Ok(candidates)
}

fn candidate_from_row(row: RosterRow) -> Result<Candidate, RosterImportError> {
    let category =
        Category::parse(&row.category).ok_or_else(|| RosterImportError::UnknownCategory {
            candidate_id: row.candidate_id,
            value: row.category.clone(),
        })?;

    let mut preferences: Vec<CourseId> = Vec::new();
    for code in row
        .preferences
        .split('|')
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        let course = CourseId::new(code);
        if preferences.contains(&course) {
            return Err(RosterImportError::DuplicatePreference {
                candidate_id: row.candidate_id,
                course: code.to_string(),
            });
        }
        preferences.push(course);
    }

    if preferences.is_empty() || preferences.len() > MAX_PREFERENCES {
        return Err(RosterImportError::PreferenceCount {
            candidate_id: row.candidate_id,
            found: preferences.len(),
        });
    }

    Ok(Candidate {
        id: CandidateId(row.candidate_id),
        rank: row.exam_rank,
        category,
        preferences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Candidate ID,Exam Rank,Category,Preferences\n";

    fn parse(rows: &str) -> Result<Vec<Candidate>, RosterImportError> {
        parse_roster(Cursor::new(format!("{HEADER}{rows}")))
    }

    #[test]
    fn parses_candidates_with_ordered_preferences() {
        let candidates = parse("101,5,OBC,CSE|ECE\n102,2,GENERAL,ECE\n").expect("roster parses");

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, CandidateId(101));
        assert_eq!(candidates[0].rank, 5);
        assert_eq!(candidates[0].category, Category::Obc);
        assert_eq!(
            candidates[0].preferences,
            vec![CourseId::new("CSE"), CourseId::new("ECE")]
        );
        assert_eq!(candidates[1].category, Category::General);
    }

    #[test]
    fn accepts_gen_shorthand_and_mixed_case_categories() {
        let candidates = parse("1,1,gen,CSE\n2,2,sc,CSE\n").expect("roster parses");
        assert_eq!(candidates[0].category, Category::General);
        assert_eq!(candidates[1].category, Category::Sc);
    }

    #[test]
    fn rejects_unknown_category() {
        let error = parse("7,1,NRI,CSE\n").expect_err("category rejected");
        match error {
            RosterImportError::UnknownCategory {
                candidate_id,
                value,
            } => {
                assert_eq!(candidate_id, 7);
                assert_eq!(value, "NRI");
            }
            other => panic!("expected unknown category, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_and_oversized_preference_lists() {
        assert!(matches!(
            parse("1,1,SC,\n"),
            Err(RosterImportError::PreferenceCount { found: 0, .. })
        ));
        assert!(matches!(
            parse("1,1,SC,A|B|C|D\n"),
            Err(RosterImportError::PreferenceCount { found: 4, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_preferences() {
        let error = parse("3,1,EWS,CSE|CSE\n").expect_err("duplicate rejected");
        assert!(matches!(
            error,
            RosterImportError::DuplicatePreference { candidate_id: 3, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_candidate_ids_and_ranks() {
        assert!(matches!(
            parse("1,1,SC,CSE\n1,2,SC,CSE\n"),
            Err(RosterImportError::DuplicateCandidate { candidate_id: 1 })
        ));
        assert!(matches!(
            parse("1,3,SC,CSE\n2,3,ST,CSE\n"),
            Err(RosterImportError::DuplicateRank {
                rank: 3,
                first: 1,
                second: 2
            })
        ));
    }
}
