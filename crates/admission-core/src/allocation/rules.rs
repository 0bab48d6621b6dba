use serde::{Deserialize, Serialize};

use super::domain::{CourseId, CourseSeats};

/// Reservation percentages applied to every course's total capacity.
///
/// The implicit general share is `100 - (sc + st + obc + ews)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub sc: u8,
    pub st: u8,
    pub obc: u8,
    pub ews: u8,
}

/// Validation errors raised at the rules-store boundary.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("reserved percentages sum to {sum}%, exceeding 100%")]
    ReservedExceedsWhole { sum: u16 },
    #[error("{category} percentage {value}% is above 100%")]
    PercentageOutOfRange { category: &'static str, value: u8 },
}

impl CategoryRules {
    /// Reject rule sets that would derive a negative general pool. Decided
    /// policy: reject at the boundary, never clamp, never check inside the
    /// engine.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (category, value) in [
            ("SC", self.sc),
            ("ST", self.st),
            ("OBC", self.obc),
            ("EWS", self.ews),
        ] {
            if value > 100 {
                return Err(RulesError::PercentageOutOfRange { category, value });
            }
        }

        let sum = self.reserved_sum();
        if sum > 100 {
            return Err(RulesError::ReservedExceedsWhole { sum });
        }
        Ok(())
    }

    pub fn reserved_sum(&self) -> u16 {
        u16::from(self.sc) + u16::from(self.st) + u16::from(self.obc) + u16::from(self.ews)
    }

    /// Derive the per-category seat counters for a course. Each reserved
    /// share floors; general absorbs the remainder so the five counters
    /// always total exactly `total_seats`.
    pub fn seat_split(&self, course_id: CourseId, total_seats: u32) -> CourseSeats {
        // Widened so percentage * total_seats cannot overflow for any u32
        // capacity; the floored share always fits back into u32.
        let share =
            |percentage: u8| (u64::from(total_seats) * u64::from(percentage) / 100) as u32;

        let sc = share(self.sc);
        let st = share(self.st);
        let obc = share(self.obc);
        let ews = share(self.ews);
        let general = total_seats - (sc + st + obc + ews);

        CourseSeats {
            course_id,
            total_seats,
            general,
            sc,
            st,
            obc,
            ews,
            available: total_seats,
        }
    }
}
