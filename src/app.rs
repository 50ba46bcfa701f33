//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and resolves the data directory
//! - parses CLI arguments
//! - appends records to the store
//! - trains / queries the grade predictor
//! - runs the distribution and prints reports

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::cli::{AddGradeArgs, AddSectionArgs, AddStudentArgs, Cli, Command, DistributeArgs, ResultsArgs};
use crate::domain::{DistributeConfig, GradeRecord, Section, StudentRecord};
use crate::error::AppError;
use crate::io::{Store, read_distribution_csv};

pub mod pipeline;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "ROSTER_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

/// Entry point for the `roster` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let store = Store::open(resolve_data_dir(cli.data_dir.clone()))?;
    debug!(data_dir = %store.dir().display(), "opened store");

    match cli.command {
        Command::AddStudent(args) => handle_add_student(&store, args),
        Command::AddGrade(args) => handle_add_grade(&store, args),
        Command::AddSection(args) => handle_add_section(&store, args),
        Command::Train => handle_train(&store),
        Command::Predict(args) => handle_predict(&store, &args.student),
        Command::Distribute(args) => handle_distribute(&store, args),
        Command::Results(args) => handle_results(&store, args),
    }
}

/// `--data-dir` wins over `ROSTER_DATA_DIR`, which wins over `./data`.
pub fn resolve_data_dir(cli_value: Option<PathBuf>) -> PathBuf {
    cli_value
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn handle_add_student(store: &Store, args: AddStudentArgs) -> Result<(), AppError> {
    store.add_student(&StudentRecord {
        id: args.id.trim().to_string(),
        name: args.name.trim().to_string(),
        academic_level: args.level,
    })?;
    println!("Student '{}' added.", args.id.trim());
    Ok(())
}

fn handle_add_grade(store: &Store, args: AddGradeArgs) -> Result<(), AppError> {
    let student_id = args.student.trim().to_string();
    if !store.all_students()?.iter().any(|s| s.id == student_id) {
        return Err(AppError::new(2, format!("Unknown student '{student_id}'.")));
    }
    store.add_grade(&GradeRecord {
        student_id: student_id.clone(),
        course_id: args.course.trim().to_string(),
        semester: args.semester.trim().to_string(),
        grade: args.grade,
    })?;
    println!("Grade {} recorded for '{student_id}'.", args.grade);
    Ok(())
}

fn handle_add_section(store: &Store, args: AddSectionArgs) -> Result<(), AppError> {
    store.add_section(&Section {
        id: args.id.trim().to_string(),
        course_id: args.course.trim().to_string(),
        capacity: args.capacity as usize,
        time_slot: args.time_slot.trim().to_string(),
    })?;
    println!("Section '{}' added.", args.id.trim());
    Ok(())
}

fn handle_train(store: &Store) -> Result<(), AppError> {
    let report = pipeline::run_training(store)?;
    println!("{}", crate::report::format_train_report(&report));
    Ok(())
}

fn handle_predict(store: &Store, student_id: &str) -> Result<(), AppError> {
    let score = pipeline::run_prediction(store, student_id)?;
    println!("Predicted score for '{student_id}': {score:.2}");
    Ok(())
}

fn handle_distribute(store: &Store, args: DistributeArgs) -> Result<(), AppError> {
    let config = DistributeConfig {
        seed: args.seed,
        ..DistributeConfig::default()
    };
    let run = pipeline::run_distribution(store, &config, args.export.as_deref())?;

    println!(
        "{}",
        crate::report::format_distribution_summary(&run.distribution, &config)
    );
    if args.show_rosters {
        println!("{}", crate::report::format_rosters(&run.distribution));
    }
    println!(
        "Exported {} row(s) to {}",
        run.exported_rows,
        run.export_path.display()
    );
    Ok(())
}

fn handle_results(store: &Store, args: ResultsArgs) -> Result<(), AppError> {
    let path = args.file.unwrap_or_else(|| store.results_path());
    if !path.exists() {
        return Err(AppError::new(
            2,
            format!(
                "No distribution results at '{}'. Run `roster distribute` first.",
                path.display()
            ),
        ));
    }
    let rows = read_distribution_csv(&path)?;
    println!("{}", crate::report::format_results(&rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/srv/roster")));
        assert_eq!(dir, PathBuf::from("/srv/roster"));
    }
}
