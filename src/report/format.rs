//! Terminal formatting of distribution summaries and saved results.

use crate::distribute::Distribution;
use crate::domain::{DistributeConfig, SCORE_MAX};
use crate::io::export::ExportRow;
use crate::plot::{render_bar_chart, truncate};
use crate::predict::TrainReport;

/// Width of the bar area in results charts.
const BAR_WIDTH: usize = 40;

/// Format the full run summary (overall metrics + per-section table + warnings).
pub fn format_distribution_summary(distribution: &Distribution, config: &DistributeConfig) -> String {
    let mut out = String::new();
    let overall = &distribution.overall;

    out.push_str("=== roster - Distribution Summary ===\n");
    out.push_str(&format!("Seed: {}\n", config.seed));
    out.push_str(&format!(
        "Assigned: {} | Unassigned: {} | Sections: {}\n",
        overall.total_assigned,
        distribution.unassigned.len(),
        distribution.assignment.sections.len(),
    ));

    out.push_str("\nOverall metrics:\n");
    out.push_str(&format!("- average           : {:.2}\n", overall.average));
    out.push_str(&format!("- std dev           : {:.2}\n", overall.std_dev));
    out.push_str(&format!("- section avg spread: {:.2}\n", overall.spread));

    out.push_str("\nSection metrics:\n");
    out.push_str(
        format!(
            "{:<16} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
            "section", "students", "average", "std_dev", "min", "max", "capacity"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<16} {:-<9} {:-<8} {:-<8} {:-<8} {:-<8} {:-<8}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for roster in &distribution.assignment.sections {
        let m = distribution.metrics_for(&roster.section.id);
        out.push_str(&format!(
            "{:<16} {:>9} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8}\n",
            truncate(&roster.section.id, 16),
            m.count,
            m.average,
            m.std_dev,
            m.min,
            m.max,
            roster.section.capacity,
        ));
    }

    if !distribution.fallback_scored.is_empty() {
        out.push_str(&format!(
            "\nScored with the neutral value {:.0} (no usable prediction): {}\n",
            config.neutral_score,
            distribution.fallback_scored.join(", ")
        ));
    }

    if !distribution.unassigned.is_empty() {
        out.push_str("\nUnassigned (no free capacity):\n");
        for w in &distribution.unassigned {
            out.push_str(&format!("- {} ({})\n", w.student_id, w.name));
        }
    }

    out
}

/// Format the roster of every section (one line per student).
pub fn format_rosters(distribution: &Distribution) -> String {
    let mut out = String::new();
    for roster in &distribution.assignment.sections {
        out.push_str(&format!(
            "\nSection {} ({}, {}):\n",
            roster.section.id, roster.section.course_id, roster.section.time_slot
        ));
        if roster.students.is_empty() {
            out.push_str("  (empty)\n");
            continue;
        }
        for s in &roster.students {
            out.push_str(&format!(
                "  {:<12} {:<24} {:>7.2}  band {}\n",
                truncate(&s.id, 12),
                truncate(&s.name, 24),
                s.predicted_score,
                s.band.map(|b| b.label()).unwrap_or("-"),
            ));
        }
    }
    out
}

/// Per-section average predicted score from a saved export, with bars.
pub fn format_results(rows: &[ExportRow]) -> String {
    let mut sections: Vec<(String, f64, usize)> = Vec::new();
    for r in rows {
        match sections.iter_mut().find(|(id, _, _)| *id == r.section_id) {
            Some(entry) => {
                entry.1 += r.predicted_score;
                entry.2 += 1;
            }
            None => sections.push((r.section_id.clone(), r.predicted_score, 1)),
        }
    }

    let mut out = String::new();
    out.push_str(&format!("Results: {} assigned student(s)\n\n", rows.len()));
    if sections.is_empty() {
        out.push_str("(no assigned students)\n");
        return out;
    }

    out.push_str("Average predicted score per section:\n");
    let bars: Vec<(String, f64)> = sections
        .into_iter()
        .map(|(id, sum, n)| (format!("{id} (n={n})"), sum / n as f64))
        .collect();
    out.push_str(&render_bar_chart(&bars, SCORE_MAX, BAR_WIDTH));
    out
}

/// Format the outcome of a training run.
pub fn format_train_report(report: &TrainReport) -> String {
    let r2 = report
        .r2
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "n/a (held-out set too small or constant)".to_string());
    format!(
        "Grade predictor trained.\n- examples: train={} test={}\n- R² (held-out): {r2}\n",
        report.n_train, report.n_test
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::distribute::distribute;
    use crate::domain::{Section, StudentRecord};

    fn sample() -> Distribution {
        let students: Vec<StudentRecord> = (1..=3)
            .map(|i| StudentRecord { id: format!("s{i}"), name: format!("Name {i}"), academic_level: 1 })
            .collect();
        let scores: HashMap<String, f64> =
            [("s1", 90.0), ("s2", 40.0)].iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let sections = vec![
            Section { id: "A".into(), course_id: "M".into(), capacity: 1, time_slot: "t1".into() },
            Section { id: "B".into(), course_id: "M".into(), capacity: 1, time_slot: "t2".into() },
        ];
        distribute(&students, &sections, &scores, &DistributeConfig::default()).unwrap()
    }

    #[test]
    fn summary_lists_sections_fallbacks_and_unassigned() {
        let dist = sample();
        let text = format_distribution_summary(&dist, &DistributeConfig::default());
        assert!(text.contains("Assigned: 2 | Unassigned: 1 | Sections: 2"));
        assert!(text.contains("neutral value 50"));
        assert!(text.contains("s3"));
        assert!(text.contains("Unassigned (no free capacity):"));
        assert!(text.lines().any(|l| l.starts_with("A ")));
    }

    #[test]
    fn results_average_per_section() {
        let rows = vec![
            ExportRow {
                section_id: "A".into(),
                student_id: "1".into(),
                student_name: "x".into(),
                predicted_score: 60.0,
                section_average: 70.0,
                section_std_dev: 10.0,
            },
            ExportRow {
                section_id: "A".into(),
                student_id: "2".into(),
                student_name: "y".into(),
                predicted_score: 80.0,
                section_average: 70.0,
                section_std_dev: 10.0,
            },
        ];
        let text = format_results(&rows);
        assert!(text.contains("A (n=2)"));
        assert!(text.contains("70.00"));
        assert!(format_results(&[]).contains("(no assigned students)"));
    }

    #[test]
    fn train_report_handles_undefined_r2() {
        let text = format_train_report(&TrainReport { r2: None, n_train: 1, n_test: 1 });
        assert!(text.contains("n/a"));
    }
}
