//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - read from the flat-file store
//! - passed through the distribution engine
//! - exported to CSV/JSON

use serde::{Deserialize, Serialize};

/// Lowest valid predicted score.
pub const SCORE_MIN: f64 = 0.0;
/// Highest valid predicted score.
pub const SCORE_MAX: f64 = 100.0;

/// A student as stored, before any score is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    /// Academic level (ordinal, e.g. 1..=4).
    pub academic_level: u8,
}

/// A student with the predicted score the engine balances on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub academic_level: u8,
    pub predicted_score: f64,
    /// Quantile band of the predicted score within this run's roster.
    ///
    /// Informational only: placement order never looks at it.
    pub band: Option<Band>,
}

impl Student {
    pub fn from_record(record: &StudentRecord, predicted_score: f64) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            academic_level: record.academic_level,
            predicted_score,
            band: None,
        }
    }
}

/// A class section with a fixed seat count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub course_id: String,
    pub capacity: usize,
    /// Opaque label; not used when placing students.
    pub time_slot: String,
}

/// One recorded grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub student_id: String,
    pub course_id: String,
    pub semester: String,
    pub grade: f64,
}

/// Predicted-score quantile band, lowest (`E`) to highest (`A`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    E,
    D,
    C,
    B,
    A,
}

impl Band {
    /// Bands in ascending order. A run with fewer than five bands uses a prefix.
    pub const ALL: [Band; 5] = [Band::E, Band::D, Band::C, Band::B, Band::A];

    pub fn from_index(idx: usize) -> Option<Band> {
        Self::ALL.get(idx).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::E => "E",
            Band::D => "D",
            Band::C => "C",
            Band::B => "B",
            Band::A => "A",
        }
    }
}

/// The students placed in one section, in placement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRoster {
    pub section: Section,
    pub students: Vec<Student>,
}

impl SectionRoster {
    pub fn remaining(&self) -> usize {
        self.section.capacity.saturating_sub(self.students.len())
    }
}

/// Mapping from section to its assigned students.
///
/// Sections keep their canonical input order. Invariants:
/// every roster holds at most `capacity` students and no student appears twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub sections: Vec<SectionRoster>,
}

impl Assignment {
    /// One empty roster per section.
    pub fn empty(sections: &[Section]) -> Self {
        Self {
            sections: sections
                .iter()
                .map(|s| SectionRoster {
                    section: s.clone(),
                    students: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn get(&self, section_id: &str) -> Option<&SectionRoster> {
        self.sections.iter().find(|r| r.section.id == section_id)
    }

    pub fn assigned_count(&self) -> usize {
        self.sections.iter().map(|r| r.students.len()).sum()
    }

    /// Section id a student was placed in, if any.
    pub fn section_of(&self, student_id: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|r| r.students.iter().any(|s| s.id == student_id))
            .map(|r| r.section.id.as_str())
    }
}

/// Summary statistics over one section's predicted scores.
///
/// An empty section reports all zeros; `count == 0` means "no data", not a real zero score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionMetrics {
    pub average: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Statistics over every assigned student combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub average: f64,
    pub std_dev: f64,
    /// Highest minus lowest section average, over non-empty sections.
    pub spread: f64,
    pub total_assigned: usize,
}

/// A student that could not be placed because every section was full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityWarning {
    pub student_id: String,
    pub name: String,
}

impl std::fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "student {} ({}) was not assigned: no section has free capacity",
            self.student_id, self.name
        )
    }
}

/// Parameters of one distribution run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributeConfig {
    /// Seed for the roster shuffle. Same seed and inputs give the same assignment.
    pub seed: u64,
    /// Score used for students without a usable prediction.
    pub neutral_score: f64,
}

impl Default for DistributeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            neutral_score: (SCORE_MIN + SCORE_MAX) / 2.0,
        }
    }
}
