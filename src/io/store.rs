//! Flat-file storage of students, grades and sections.
//!
//! Layout of a data directory:
//!
//! ```text
//! <dir>/students.csv                  student_id,name,academic_level
//! <dir>/grades.csv                    student_id,course_id,semester,grade
//! <dir>/sections.csv                  section_id,course_id,capacity,time_slot
//! <dir>/models/grade_predictor.json   fitted predictor (see `model_file`)
//! <dir>/distribution_results.csv      last distribution export
//! ```

use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{GradeRecord, SCORE_MAX, SCORE_MIN, Section, StudentRecord};
use crate::error::AppError;
use crate::io::ingest::{RowError, read_grades, read_sections, read_students};
use crate::predict::GradeHistory;

const STUDENTS_HEADER: [&str; 3] = ["student_id", "name", "academic_level"];
const GRADES_HEADER: [&str; 4] = ["student_id", "course_id", "semester", "grade"];
const SECTIONS_HEADER: [&str; 4] = ["section_id", "course_id", "capacity", "time_slot"];

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a data directory, creating it and any missing table files.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let store = Self { dir: dir.into() };
        create_dir_all(&store.dir).map_err(|e| {
            AppError::new(2, format!("Failed to create data dir '{}': {e}", store.dir.display()))
        })?;

        init_table(&store.students_path(), &STUDENTS_HEADER)?;
        init_table(&store.grades_path(), &GRADES_HEADER)?;
        init_table(&store.sections_path(), &SECTIONS_HEADER)?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn students_path(&self) -> PathBuf {
        self.dir.join("students.csv")
    }

    pub fn grades_path(&self) -> PathBuf {
        self.dir.join("grades.csv")
    }

    pub fn sections_path(&self) -> PathBuf {
        self.dir.join("sections.csv")
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join("models").join("grade_predictor.json")
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join("distribution_results.csv")
    }

    pub fn add_student(&self, student: &StudentRecord) -> Result<(), AppError> {
        require_non_empty("student id", &student.id)?;
        require_non_empty("student name", &student.name)?;
        if self.all_students()?.iter().any(|s| s.id == student.id) {
            return Err(AppError::new(2, format!("Student '{}' already exists.", student.id)));
        }
        append_row(
            &self.students_path(),
            &[
                student.id.clone(),
                student.name.clone(),
                student.academic_level.to_string(),
            ],
        )?;
        info!(student = %student.id, "added student");
        Ok(())
    }

    pub fn add_grade(&self, grade: &GradeRecord) -> Result<(), AppError> {
        require_non_empty("student id", &grade.student_id)?;
        require_non_empty("course id", &grade.course_id)?;
        require_non_empty("semester", &grade.semester)?;
        if !(SCORE_MIN..=SCORE_MAX).contains(&grade.grade) {
            return Err(AppError::new(2, format!("Grade {} is outside 0..=100.", grade.grade)));
        }
        append_row(
            &self.grades_path(),
            &[
                grade.student_id.clone(),
                grade.course_id.clone(),
                grade.semester.clone(),
                grade.grade.to_string(),
            ],
        )?;
        info!(student = %grade.student_id, semester = %grade.semester, "added grade");
        Ok(())
    }

    pub fn add_section(&self, section: &Section) -> Result<(), AppError> {
        require_non_empty("section id", &section.id)?;
        require_non_empty("course id", &section.course_id)?;
        if section.capacity == 0 {
            return Err(AppError::new(2, "Section capacity must be at least 1."));
        }
        if self.all_sections()?.iter().any(|s| s.id == section.id) {
            return Err(AppError::new(2, format!("Section '{}' already exists.", section.id)));
        }
        append_row(
            &self.sections_path(),
            &[
                section.id.clone(),
                section.course_id.clone(),
                section.capacity.to_string(),
                section.time_slot.clone(),
            ],
        )?;
        info!(section = %section.id, capacity = section.capacity, "added section");
        Ok(())
    }

    pub fn all_students(&self) -> Result<Vec<StudentRecord>, AppError> {
        let table = read_students(&self.students_path())?;
        report_row_errors("students", &table.row_errors);
        Ok(table.rows)
    }

    pub fn all_sections(&self) -> Result<Vec<Section>, AppError> {
        let table = read_sections(&self.sections_path())?;
        report_row_errors("sections", &table.row_errors);
        Ok(table.rows)
    }

    pub fn all_grades(&self) -> Result<Vec<GradeRecord>, AppError> {
        let table = read_grades(&self.grades_path())?;
        report_row_errors("grades", &table.row_errors);
        Ok(table.rows)
    }

    pub fn grade_history(&self) -> Result<GradeHistory, AppError> {
        Ok(GradeHistory::from_records(&self.all_grades()?))
    }
}

fn init_table(path: &Path, header: &[&str]) -> Result<(), AppError> {
    if path.exists() {
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    writer
        .write_record(header)
        .and_then(|_| writer.flush().map_err(csv::Error::from))
        .map_err(|e| AppError::new(2, format!("Failed to write header to '{}': {e}", path.display())))?;
    debug!(path = %path.display(), "initialized table");
    Ok(())
}

fn append_row(path: &Path, fields: &[String]) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}' for append: {e}", path.display())))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer
        .write_record(fields)
        .and_then(|_| writer.flush().map_err(csv::Error::from))
        .map_err(|e| AppError::new(2, format!("Failed to append to '{}': {e}", path.display())))?;
    Ok(())
}

fn require_non_empty(what: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::new(2, format!("The {what} must not be empty.")));
    }
    Ok(())
}

fn report_row_errors(table: &str, errors: &[RowError]) {
    for e in errors {
        warn!(
            table,
            line = e.line,
            id = e.id.as_deref().unwrap_or(""),
            "skipped row: {}",
            e.message
        );
    }
}
