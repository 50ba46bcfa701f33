//! Per-section and overall statistics over an assignment.
//!
//! Two views are provided:
//! - `SectionTally`: a running sum/count the engine updates on every placement,
//!   so each placement decision costs O(sections) instead of rescanning rosters.
//! - `section_metrics` / `overall_metrics`: full snapshots computed from the
//!   final rosters (two-pass statistics).

use std::collections::HashMap;

use crate::domain::{Assignment, OverallMetrics, SectionMetrics, Student};
use crate::math::{mean, std_dev};

/// Running totals for one section during a placement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionTally {
    pub sum: f64,
    pub count: usize,
}

impl SectionTally {
    /// Current average; 0 for an empty section.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Average after adding one more score.
    pub fn average_with(&self, score: f64) -> f64 {
        (self.sum + score) / (self.count + 1) as f64
    }

    /// How far the section average moves when `score` is added.
    pub fn perturbation(&self, score: f64) -> f64 {
        (self.average_with(score) - self.average()).abs()
    }

    pub fn add(&mut self, score: f64) {
        self.sum += score;
        self.count += 1;
    }
}

/// Metrics for a list of students. All zeros when the list is empty.
pub fn metrics_for(students: &[Student]) -> SectionMetrics {
    let scores: Vec<f64> = students.iter().map(|s| s.predicted_score).collect();
    let (Some(average), Some(std_dev)) = (mean(&scores), std_dev(&scores)) else {
        return SectionMetrics::default();
    };
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SectionMetrics {
        average,
        std_dev,
        min,
        max,
        count: scores.len(),
    }
}

/// Metrics for every section, keyed by section id (empty sections included).
pub fn section_metrics(assignment: &Assignment) -> HashMap<String, SectionMetrics> {
    assignment
        .sections
        .iter()
        .map(|r| (r.section.id.clone(), metrics_for(&r.students)))
        .collect()
}

/// Metrics over all assigned students, plus the spread of section averages.
pub fn overall_metrics(assignment: &Assignment) -> OverallMetrics {
    let all: Vec<f64> = assignment
        .sections
        .iter()
        .flat_map(|r| r.students.iter().map(|s| s.predicted_score))
        .collect();

    let averages: Vec<f64> = assignment
        .sections
        .iter()
        .filter(|r| !r.students.is_empty())
        .map(|r| metrics_for(&r.students).average)
        .collect();

    let spread = if averages.is_empty() {
        0.0
    } else {
        let hi = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lo = averages.iter().copied().fold(f64::INFINITY, f64::min);
        hi - lo
    };

    OverallMetrics {
        average: mean(&all).unwrap_or(0.0),
        std_dev: std_dev(&all).unwrap_or(0.0),
        spread,
        total_assigned: all.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Section, SectionRoster};

    fn student(id: &str, score: f64) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {id}"),
            academic_level: 1,
            predicted_score: score,
            band: None,
        }
    }

    fn roster(id: &str, capacity: usize, scores: &[f64]) -> SectionRoster {
        SectionRoster {
            section: Section {
                id: id.to_string(),
                course_id: "C1".to_string(),
                capacity,
                time_slot: String::new(),
            },
            students: scores
                .iter()
                .enumerate()
                .map(|(i, &s)| student(&format!("{id}-{i}"), s))
                .collect(),
        }
    }

    #[test]
    fn empty_section_is_all_zero() {
        let m = metrics_for(&[]);
        assert_eq!(m, SectionMetrics { average: 0.0, std_dev: 0.0, min: 0.0, max: 0.0, count: 0 });
    }

    #[test]
    fn section_metrics_basic() {
        let m = metrics_for(&[student("a", 60.0), student("b", 80.0)]);
        assert!((m.average - 70.0).abs() < 1e-12);
        assert!((m.std_dev - 10.0).abs() < 1e-12);
        assert_eq!(m.min, 60.0);
        assert_eq!(m.max, 80.0);
        assert_eq!(m.count, 2);
    }

    #[test]
    fn overall_spread_ignores_empty_sections() {
        let assignment = Assignment {
            sections: vec![
                roster("S1", 3, &[60.0, 80.0]),
                roster("S2", 3, &[]),
                roster("S3", 3, &[75.0]),
            ],
        };

        let overall = overall_metrics(&assignment);
        assert!((overall.spread - 5.0).abs() < 1e-12);
        assert_eq!(overall.total_assigned, 3);
        assert!((overall.average - 215.0 / 3.0).abs() < 1e-12);

        let per_section = section_metrics(&assignment);
        assert_eq!(per_section.len(), 3);
        assert_eq!(per_section["S2"], SectionMetrics::default());
    }

    #[test]
    fn overall_of_empty_assignment_is_zero() {
        let assignment = Assignment {
            sections: vec![roster("S1", 2, &[])],
        };
        assert_eq!(overall_metrics(&assignment), OverallMetrics::default());
    }

    #[test]
    fn tally_perturbation_matches_definition() {
        let mut tally = SectionTally::default();
        assert!((tally.perturbation(90.0) - 90.0).abs() < 1e-12);

        tally.add(90.0);
        tally.add(70.0);
        // (90 + 70 + 50) / 3 = 70, current 80
        assert!((tally.perturbation(50.0) - 10.0).abs() < 1e-12);
        assert!((tally.average() - 80.0).abs() < 1e-12);
    }
}
