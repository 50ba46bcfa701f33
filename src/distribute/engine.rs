//! Greedy least-disruption placement of a roster into capacity-bounded sections.
//!
//! One run:
//! 1. validate sections and roster (`ConfigurationError` before anything is placed)
//! 2. attach predicted scores (missing or non-finite scores get the neutral score)
//! 3. label quantile bands (informational)
//! 4. shuffle the roster with the configured seed
//! 5. place each student in the open section whose average moves the least
//! 6. snapshot per-section and overall metrics
//!
//! Every run starts from a fresh, empty `Assignment`; nothing carries over between calls.

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::distribute::bands::assign_bands;
use crate::domain::{
    Assignment, CapacityWarning, DistributeConfig, OverallMetrics, Section, SectionMetrics,
    Student, StudentRecord,
};
use crate::error::ConfigurationError;
use crate::metrics::{SectionTally, overall_metrics, section_metrics};

/// Everything produced by one distribution run.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub assignment: Assignment,
    pub section_metrics: HashMap<String, SectionMetrics>,
    pub overall: OverallMetrics,
    /// Students left out because every section was full, in visit order.
    pub unassigned: Vec<CapacityWarning>,
    /// Students that were given the neutral score for lack of a usable prediction.
    pub fallback_scored: Vec<String>,
}

impl Distribution {
    pub fn metrics_for(&self, section_id: &str) -> SectionMetrics {
        self.section_metrics
            .get(section_id)
            .copied()
            .unwrap_or_default()
    }
}

/// Distribute `students` over `sections`, balancing average predicted score.
pub fn distribute(
    students: &[StudentRecord],
    sections: &[Section],
    predicted_scores: &HashMap<String, f64>,
    config: &DistributeConfig,
) -> Result<Distribution, ConfigurationError> {
    validate_sections(sections)?;
    validate_roster(students)?;

    let total_capacity = sections.iter().map(|s| s.capacity).fold(0usize, usize::saturating_add);
    info!(
        students = students.len(),
        sections = sections.len(),
        capacity = total_capacity,
        seed = config.seed,
        "starting distribution"
    );

    let (mut roster, fallback_scored) = attach_scores(students, predicted_scores, config);
    assign_bands(&mut roster);

    let mut rng = StdRng::seed_from_u64(config.seed);
    roster.shuffle(&mut rng);

    let mut assignment = Assignment::empty(sections);
    let mut tallies = vec![SectionTally::default(); sections.len()];
    let mut unassigned = Vec::new();

    for student in roster {
        let score = student.predicted_score;
        let target = least_disruptive_section(&assignment, &tallies, score)
            .or_else(|| first_open_section(&assignment));

        let Some(idx) = target else {
            warn!(
                student = %student.id,
                name = %student.name,
                "no section has free capacity; student left unassigned"
            );
            unassigned.push(CapacityWarning {
                student_id: student.id,
                name: student.name,
            });
            continue;
        };

        tallies[idx].add(score);
        let placed_in = &mut assignment.sections[idx];
        debug!(
            student = %student.id,
            section = %placed_in.section.id,
            score,
            section_average = tallies[idx].average(),
            "placed student"
        );
        placed_in.students.push(student);
    }

    let section_metrics = section_metrics(&assignment);
    let overall = overall_metrics(&assignment);

    info!(
        assigned = overall.total_assigned,
        unassigned = unassigned.len(),
        spread = overall.spread,
        "distribution complete"
    );

    Ok(Distribution {
        assignment,
        section_metrics,
        overall,
        unassigned,
        fallback_scored,
    })
}

fn validate_sections(sections: &[Section]) -> Result<(), ConfigurationError> {
    if sections.is_empty() {
        return Err(ConfigurationError::NoSections);
    }
    let mut seen = HashSet::new();
    for s in sections {
        if !seen.insert(s.id.as_str()) {
            return Err(ConfigurationError::DuplicateSection(s.id.clone()));
        }
    }
    if sections.iter().all(|s| s.capacity == 0) {
        return Err(ConfigurationError::NoCapacity);
    }
    Ok(())
}

fn validate_roster(students: &[StudentRecord]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for s in students {
        if !seen.insert(s.id.as_str()) {
            return Err(ConfigurationError::DuplicateStudent(s.id.clone()));
        }
    }
    Ok(())
}

fn attach_scores(
    students: &[StudentRecord],
    predicted_scores: &HashMap<String, f64>,
    config: &DistributeConfig,
) -> (Vec<Student>, Vec<String>) {
    let mut fallback = Vec::new();
    let roster = students
        .iter()
        .map(|record| {
            let score = match predicted_scores.get(&record.id) {
                Some(&s) if s.is_finite() => s,
                _ => {
                    warn!(
                        student = %record.id,
                        neutral = config.neutral_score,
                        "no usable predicted score; using neutral score"
                    );
                    fallback.push(record.id.clone());
                    config.neutral_score
                }
            };
            Student::from_record(record, score)
        })
        .collect();
    (roster, fallback)
}

/// Open section whose average is perturbed least by adding `score`.
///
/// Ties go to the earliest section in input order.
fn least_disruptive_section(
    assignment: &Assignment,
    tallies: &[SectionTally],
    score: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, roster) in assignment.sections.iter().enumerate() {
        if roster.remaining() == 0 {
            continue;
        }
        let diff = tallies[idx].perturbation(score);
        if best.is_none_or(|(_, min)| diff < min) {
            best = Some((idx, diff));
        }
    }
    best.filter(|(_, diff)| diff.is_finite()).map(|(idx, _)| idx)
}

fn first_open_section(assignment: &Assignment) -> Option<usize> {
    assignment.sections.iter().position(|r| r.remaining() > 0)
}
