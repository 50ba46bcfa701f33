use roster_balance::app::pipeline::{ScoreSource, run_distribution, run_prediction, run_training};
use roster_balance::domain::{DistributeConfig, GradeRecord, Section, StudentRecord};
use roster_balance::io::{Store, read_distribution_csv};

fn seed_store(store: &Store) {
    let history: [(&str, &[f64]); 5] = [
        ("s1", &[55.0, 60.0, 65.0, 70.0, 75.0]),
        ("s2", &[80.0, 82.0, 84.0, 86.0]),
        ("s3", &[40.0, 50.0, 45.0, 55.0, 60.0]),
        ("s4", &[90.0]),
        ("s5", &[]),
    ];

    for (i, (id, grades)) in history.iter().enumerate() {
        store
            .add_student(&StudentRecord {
                id: id.to_string(),
                name: format!("Student {id}"),
                academic_level: (i % 4 + 1) as u8,
            })
            .unwrap();
        for (sem, g) in grades.iter().enumerate() {
            store
                .add_grade(&GradeRecord {
                    student_id: id.to_string(),
                    course_id: "MATH".into(),
                    semester: (sem + 1).to_string(),
                    grade: *g,
                })
                .unwrap();
        }
    }

    for (id, cap) in [("A", 2), ("B", 2)] {
        store
            .add_section(&Section {
                id: id.into(),
                course_id: "MATH".into(),
                capacity: cap,
                time_slot: "Wed 12:00".into(),
            })
            .unwrap();
    }
}

#[test]
fn train_distribute_and_export() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path().join("data")).unwrap();
    seed_store(&store);

    let report = run_training(&store).unwrap();
    assert_eq!(report.n_train + report.n_test, 5);
    assert!(store.model_path().exists());

    let predicted = run_prediction(&store, "s1").unwrap();
    assert!((0.0..=100.0).contains(&predicted));

    let run = run_distribution(&store, &DistributeConfig::default(), None).unwrap();
    assert_eq!(run.scores.sources["s1"], ScoreSource::Model);
    assert_eq!(run.scores.sources["s4"], ScoreSource::GradeMean);
    assert_eq!(run.scores.values["s4"], 90.0);
    assert_eq!(run.scores.sources["s5"], ScoreSource::Neutral);

    // 4 seats for 5 students.
    assert_eq!(run.distribution.assignment.assigned_count(), 4);
    assert_eq!(run.distribution.unassigned.len(), 1);

    let rows = read_distribution_csv(&run.export_path).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(run.exported_rows, 4);
    assert!(rows.iter().all(|r| r.student_id != run.distribution.unassigned[0].student_id));
}

#[test]
fn distribute_without_model_uses_grade_means() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    seed_store(&store);

    let export = tmp.path().join("custom.csv");
    let run = run_distribution(&store, &DistributeConfig::default(), Some(&export)).unwrap();
    assert_eq!(run.export_path, export);
    assert_eq!(run.scores.sources["s1"], ScoreSource::GradeMean);
    assert_eq!(run.scores.values["s1"], 65.0);
}

#[test]
fn unreadable_model_falls_back_to_grade_means() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    seed_store(&store);

    std::fs::create_dir_all(store.model_path().parent().unwrap()).unwrap();
    std::fs::write(store.model_path(), "{not json").unwrap();

    let run = run_distribution(&store, &DistributeConfig::default(), None).unwrap();
    assert_eq!(run.scores.sources["s1"], ScoreSource::GradeMean);
    assert_eq!(run.scores.values["s1"], 65.0);
    assert_eq!(run.distribution.assignment.assigned_count(), 4);

    // Predicting a single student still reports the broken file.
    let err = run_prediction(&store, "s1").unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn prediction_without_model_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    seed_store(&store);

    let err = run_prediction(&store, "s1").unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn distribute_without_sections_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    store
        .add_student(&StudentRecord { id: "x".into(), name: "X".into(), academic_level: 1 })
        .unwrap();

    let err = run_distribution(&store, &DistributeConfig::default(), None).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(!store.results_path().exists());
}
