//! Grade histories and the sliding feature window used by the predictor.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::GradeRecord;

/// Number of prior grades used as features.
pub const WINDOW: usize = 3;

/// Per-student grades in semester order.
///
/// Students keep the order in which they first appear in the grade table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeHistory {
    students: Vec<(String, Vec<f64>)>,
}

impl GradeHistory {
    pub fn from_records(records: &[GradeRecord]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut grouped: Vec<(String, Vec<&GradeRecord>)> = Vec::new();

        for r in records {
            let slot = *index.entry(r.student_id.as_str()).or_insert_with(|| {
                grouped.push((r.student_id.clone(), Vec::new()));
                grouped.len() - 1
            });
            grouped[slot].1.push(r);
        }

        let students = grouped
            .into_iter()
            .map(|(id, mut rows)| {
                // Stable: grades within one semester keep table order.
                rows.sort_by(|a, b| compare_semesters(&a.semester, &b.semester));
                (id, rows.iter().map(|r| r.grade).collect())
            })
            .collect();

        Self { students }
    }

    /// Grades for one student, oldest first. Empty if the student has none.
    pub fn grades_for(&self, student_id: &str) -> &[f64] {
        self.students
            .iter()
            .find(|(id, _)| id == student_id)
            .map(|(_, g)| g.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.students.iter().map(|(id, g)| (id.as_str(), g.as_slice()))
    }

}

/// Order semester labels: numeric labels first (by value), then the rest lexically.
pub fn compare_semesters(a: &str, b: &str) -> Ordering {
    match (semester_number(a), semester_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn semester_number(label: &str) -> Option<f64> {
    label.trim().parse::<f64>().ok()
}

/// Training examples: every grade preceded by a full window of prior grades.
pub fn training_examples(history: &GradeHistory) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut features = Vec::new();
    let mut targets = Vec::new();

    for (_, grades) in history.iter() {
        for i in WINDOW..grades.len() {
            features.push(grades[i - WINDOW..i].to_vec());
            targets.push(grades[i]);
        }
    }

    (features, targets)
}

/// Feature row for prediction: the last `WINDOW` grades, zero-padded on the left.
pub fn prediction_window(previous: &[f64]) -> Vec<f64> {
    let tail = &previous[previous.len().saturating_sub(WINDOW)..];
    let mut row = vec![0.0; WINDOW - tail.len()];
    row.extend_from_slice(tail);
    row
}
