//! Command-line parsing for the section balancer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! engine, predictor and storage code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Balanced assignment of students to class sections")]
pub struct Cli {
    /// Data directory holding the CSV tables (overrides `ROSTER_DATA_DIR`).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a student record.
    AddStudent(AddStudentArgs),
    /// Record a grade for a student.
    AddGrade(AddGradeArgs),
    /// Add a class section.
    AddSection(AddSectionArgs),
    /// Fit the grade predictor on the recorded grade history and save it.
    Train,
    /// Print the predicted score for one student.
    Predict(PredictArgs),
    /// Score every student, distribute them over the sections, and export the result.
    Distribute(DistributeArgs),
    /// Show per-section averages from a previous export.
    Results(ResultsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AddStudentArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub name: String,

    /// Academic level (1-4).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub level: u8,
}

#[derive(Debug, Args, Clone)]
pub struct AddGradeArgs {
    /// Student id the grade belongs to.
    #[arg(long)]
    pub student: String,

    #[arg(long)]
    pub course: String,

    /// Semester label; numeric labels sort numerically.
    #[arg(long)]
    pub semester: String,

    /// Grade in 0..=100.
    #[arg(long)]
    pub grade: f64,
}

#[derive(Debug, Args, Clone)]
pub struct AddSectionArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub course: String,

    /// Number of seats (1-100).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub capacity: u32,

    #[arg(long, default_value = "")]
    pub time_slot: String,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Student id to predict for.
    #[arg(long)]
    pub student: String,
}

#[derive(Debug, Args, Clone)]
pub struct DistributeArgs {
    /// Seed for the roster shuffle (same seed and data give the same assignment).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export CSV path (default: `<data-dir>/distribution_results.csv`).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Also print every section's roster.
    #[arg(long)]
    pub show_rosters: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ResultsArgs {
    /// Export CSV to read (default: `<data-dir>/distribution_results.csv`).
    #[arg(long, value_name = "CSV")]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_distribute_with_global_data_dir() {
        let cli = Cli::parse_from(["roster", "distribute", "--seed", "7", "--data-dir", "/tmp/x"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Command::Distribute(args) => {
                assert_eq!(args.seed, 7);
                assert!(args.export.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_capacity_section() {
        let res = Cli::try_parse_from([
            "roster", "add-section", "--id", "A", "--course", "M", "--capacity", "0",
        ]);
        assert!(res.is_err());
    }
}
