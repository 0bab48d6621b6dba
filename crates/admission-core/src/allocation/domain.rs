use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

/// Course identifier; the portal uses course codes such as `CSE` or `ECE`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

/// Reservation classification determining eligibility for reserved seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    General,
    Sc,
    St,
    Obc,
    Ews,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::General => "GENERAL",
            Category::Sc => "SC",
            Category::St => "ST",
            Category::Obc => "OBC",
            Category::Ews => "EWS",
        }
    }

    /// Whether the category draws from a reserved seat pool before general.
    pub const fn is_reserved(self) -> bool {
        !matches!(self, Category::General)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GENERAL" | "GEN" => Some(Category::General),
            "SC" => Some(Category::Sc),
            "ST" => Some(Category::St),
            "OBC" => Some(Category::Obc),
            "EWS" => Some(Category::Ews),
            _ => None,
        }
    }
}

/// Merit-ranked candidate snapshot consumed by the allocation engine.
///
/// Constructed fresh from the repository at the start of each run and never
/// mutated by the engine. `rank` is unique across one run; preference order
/// encodes strict priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub rank: u32,
    pub category: Category,
    pub preferences: Vec<CourseId>,
}

/// Repository-side course row: capacity is fixed at course creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: CourseId,
    pub name: String,
    pub total_seats: u32,
}

/// Mutable per-course seat counters, the engine's working state.
///
/// Invariant after every mutation: `available` equals the sum of the five
/// category counters, and that sum never exceeds `total_seats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSeats {
    pub course_id: CourseId,
    pub total_seats: u32,
    pub general: u32,
    pub sc: u32,
    pub st: u32,
    pub obc: u32,
    pub ews: u32,
    pub available: u32,
}

impl CourseSeats {
    pub fn remaining(&self, category: Category) -> u32 {
        match category {
            Category::General => self.general,
            Category::Sc => self.sc,
            Category::St => self.st,
            Category::Obc => self.obc,
            Category::Ews => self.ews,
        }
    }

    /// Consume one seat from the given category pool. Returns `false` when
    /// the pool is empty; counters are untouched in that case.
    pub fn take(&mut self, category: Category) -> bool {
        let counter = match category {
            Category::General => &mut self.general,
            Category::Sc => &mut self.sc,
            Category::St => &mut self.st,
            Category::Obc => &mut self.obc,
            Category::Ews => &mut self.ews,
        };

        if *counter == 0 {
            return false;
        }

        *counter -= 1;
        self.available -= 1;
        true
    }

    /// Sum of the four reserved-category counters.
    pub fn reserved_remaining(&self) -> u32 {
        self.sc + self.st + self.obc + self.ews
    }

    /// End-of-round spillover: fold every remaining reserved seat into the
    /// general pool. Irreversible within a run; `available` is unchanged.
    pub fn spill_reserved_into_general(&mut self) {
        self.general += self.reserved_remaining();
        self.sc = 0;
        self.st = 0;
        self.obc = 0;
        self.ews = 0;
    }

    pub fn counter_sum(&self) -> u32 {
        self.general + self.reserved_remaining()
    }
}
