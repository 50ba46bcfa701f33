//! CSV ingest and validation for the flat-file tables.
//!
//! Readers are header-driven:
//! - column order is free and header names are case-insensitive
//! - a UTF-8 BOM on the first header is ignored
//! - bad rows are skipped and reported as `RowError`s, never fatal
//! - a missing required column is fatal (exit code 2)

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{GradeRecord, SCORE_MAX, SCORE_MIN, Section, StudentRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Parsed rows plus whatever could not be parsed.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub rows: Vec<T>,
    pub row_errors: Vec<RowError>,
}

pub fn read_students(path: &Path) -> Result<Table<StudentRecord>, AppError> {
    read_table(path, &["student_id", "name", "academic_level"], |record, headers| {
        let id = get_required(record, headers, "student_id")?.to_string();
        let name = get_required(record, headers, "name")?.to_string();
        let level = parse_level(get_required(record, headers, "academic_level")?)
            .map_err(|e| (Some(id.clone()), e))?;
        Ok(StudentRecord {
            id,
            name,
            academic_level: level,
        })
    })
}

pub fn read_sections(path: &Path) -> Result<Table<Section>, AppError> {
    read_table(
        path,
        &["section_id", "course_id", "capacity", "time_slot"],
        |record, headers| {
            let id = get_required(record, headers, "section_id")?.to_string();
            let course_id = get_required(record, headers, "course_id")?.to_string();
            let capacity = parse_capacity(get_required(record, headers, "capacity")?)
                .map_err(|e| (Some(id.clone()), e))?;
            let time_slot = get_optional(record, headers, "time_slot")
                .unwrap_or_default()
                .to_string();
            Ok(Section {
                id,
                course_id,
                capacity,
                time_slot,
            })
        },
    )
}

pub fn read_grades(path: &Path) -> Result<Table<GradeRecord>, AppError> {
    read_table(
        path,
        &["student_id", "course_id", "semester", "grade"],
        |record, headers| {
            let student_id = get_required(record, headers, "student_id")?.to_string();
            let course_id = get_required(record, headers, "course_id")?.to_string();
            let semester = get_required(record, headers, "semester")?.to_string();
            let grade = parse_grade(get_required(record, headers, "grade")?)
                .map_err(|e| (Some(student_id.clone()), e))?;
            Ok(GradeRecord {
                student_id,
                course_id,
                semester,
                grade,
            })
        },
    )
}

type RowResult<T> = Result<T, (Option<String>, String)>;

fn read_table<T>(
    path: &Path,
    required: &[&str],
    parse: impl Fn(&StringRecord, &HashMap<String, usize>) -> RowResult<T>,
) -> Result<Table<T>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(
                2,
                format!("Missing required column `{name}` in '{}'", path.display()),
            ));
        }
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err((id, message)) => row_errors.push(RowError { line, id, message }),
        }
    }

    Ok(Table { rows, row_errors })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> RowResult<&'a str> {
    get_optional(record, header_map, name)
        .ok_or_else(|| (None, format!("Missing required value: `{name}`")))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an academic level. Accepts `2` as well as `2.0` (spreadsheet float columns).
pub fn parse_level(s: &str) -> Result<u8, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `academic_level` '{s}'."))?;
    if v.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&v) {
        return Err(format!("Invalid `academic_level` '{s}'."));
    }
    Ok(v as u8)
}

/// Parse a seat capacity (non-negative integer, `30.0` accepted).
pub fn parse_capacity(s: &str) -> Result<usize, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `capacity` '{s}'."))?;
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
        return Err(format!("Invalid `capacity` '{s}' (must be a non-negative integer)."));
    }
    Ok(v as usize)
}

/// Parse a grade in `[0, 100]`.
pub fn parse_grade(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `grade` '{s}'."))?;
    if !v.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&v) {
        return Err(format!("Invalid `grade` '{s}' (must be within 0..=100)."));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_sections_with_reordered_columns_and_bom() {
        let f = write_tmp("\u{feff}Capacity,section_id,time_slot,course_id\n30,S1,Mon 9:00,MATH\n25.0,S2,,MATH\n");
        let table = read_sections(f.path()).unwrap();
        assert!(table.row_errors.is_empty());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].capacity, 30);
        assert_eq!(table.rows[1].capacity, 25);
        assert_eq!(table.rows[1].time_slot, "");
    }

    #[test]
    fn bad_rows_are_reported_and_skipped() {
        let f = write_tmp("student_id,course_id,semester,grade\na,C,1,90\nb,C,1,140\nc,C,,70\n");
        let table = read_grades(f.path()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.row_errors.len(), 2);
        assert_eq!(table.row_errors[0].line, 3);
        assert_eq!(table.row_errors[0].id.as_deref(), Some("b"));
        assert_eq!(table.row_errors[1].line, 4);
    }

    #[test]
    fn missing_column_is_fatal() {
        let f = write_tmp("student_id,name\na,Alice\n");
        let err = read_students(f.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn numeric_parsers() {
        assert_eq!(parse_level("3.0"), Ok(3));
        assert!(parse_level("2.5").is_err());
        assert!(parse_capacity("-1").is_err());
        assert_eq!(parse_capacity("0"), Ok(0));
        assert!(parse_grade("100.5").is_err());
    }
}
