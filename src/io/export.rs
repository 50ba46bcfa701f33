//! Export a distribution to CSV, and read it back for the results view.
//!
//! One row per assigned student; students left unassigned are not written.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distribute::Distribution;
use crate::error::AppError;

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub section_id: String,
    pub student_id: String,
    pub student_name: String,
    pub predicted_score: f64,
    pub section_average: f64,
    pub section_std_dev: f64,
}

/// Flatten a distribution: sections in input order, students in placement order.
pub fn export_rows(distribution: &Distribution) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(distribution.assignment.assigned_count());
    for roster in &distribution.assignment.sections {
        let metrics = distribution.metrics_for(&roster.section.id);
        for s in &roster.students {
            rows.push(ExportRow {
                section_id: roster.section.id.clone(),
                student_id: s.id.clone(),
                student_name: s.name.clone(),
                predicted_score: s.predicted_score,
                section_average: metrics.average,
                section_std_dev: metrics.std_dev,
            });
        }
    }
    rows
}

/// Write the distribution to a CSV file.
pub fn write_distribution_csv(path: &Path, distribution: &Distribution) -> Result<usize, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    let rows = export_rows(distribution);
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    if rows.is_empty() {
        // `serialize` writes the header with the first row; keep empty exports readable.
        writer
            .write_record([
                "section_id",
                "student_id",
                "student_name",
                "predicted_score",
                "section_average",
                "section_std_dev",
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    Ok(rows.len())
}

/// Read a previously written export.
pub fn read_distribution_csv(path: &Path) -> Result<Vec<ExportRow>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open results CSV '{}': {e}", path.display())))?;
    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize()
        .collect::<Result<Vec<ExportRow>, _>>()
        .map_err(|e| AppError::new(2, format!("Invalid results CSV '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::distribute::distribute;
    use crate::domain::{DistributeConfig, Section, StudentRecord};

    #[test]
    fn export_omits_unassigned_and_carries_section_stats() {
        let students: Vec<StudentRecord> = ["a", "b", "c"]
            .iter()
            .map(|id| StudentRecord { id: id.to_string(), name: id.to_uppercase(), academic_level: 1 })
            .collect();
        let scores: HashMap<String, f64> =
            [("a", 60.0), ("b", 80.0), ("c", 70.0)].iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let sections = vec![Section {
            id: "S1".into(),
            course_id: "M".into(),
            capacity: 2,
            time_slot: String::new(),
        }];

        let dist = distribute(&students, &sections, &scores, &DistributeConfig::default()).unwrap();
        let rows = export_rows(&dist);
        assert_eq!(rows.len(), 2);
        let m = dist.metrics_for("S1");
        assert!(rows.iter().all(|r| r.section_average == m.average && r.section_std_dev == m.std_dev));
        assert!(rows.iter().all(|r| r.student_id != dist.unassigned[0].student_id));

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        assert_eq!(write_distribution_csv(&path, &dist).unwrap(), 2);
        assert_eq!(read_distribution_csv(&path).unwrap(), rows);
    }
}
