//! End-to-end runs over files on disk.

use anyhow::Result;
use hierarchical_bayes::{
    classify, load_test_instances, load_training_model, nbayes, BayesError, DatasetProfile,
    NaiveBayesClassifier, TestSet, TrainedModel,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TRAIN: &str = "\
% toy hierarchy
@relation toy
@attribute colour {0,1,2}
@attribute size {0,1}
@attribute class {A.1,A.2,B.1}
@data
0,0,A.1
0,0,A.1
0,1,A.1
1,1,A.2
1,1,A.2
1,0,A.2
2,0,B.1
2,1,B.1
";

const TEST: &str = "\
@relation toy
@attribute colour {0,1,2}
@attribute size {0,1}
@attribute class {A.1,A.2,B.1}
@data
0,0,A.1
1,1,A.2
2,0,B.1
";

fn write_pair(dir: &TempDir) -> Result<(PathBuf, PathBuf)> {
    let train = dir.path().join("train.arff");
    let test = dir.path().join("test.arff");
    fs::write(&train, TRAIN)?;
    fs::write(&test, TEST)?;
    Ok((train, test))
}

#[test]
fn nbayes_scores_perfect_leaf_predictions() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (train, test) = write_pair(&dir)?;
    let out = dir.path().join("out.txt");

    let hf = nbayes(true, true, &train, &test, Some(&out))?;
    assert_eq!(hf, 100.0);

    let report = fs::read_to_string(&out)?;
    assert!(report.starts_with("Example 0 (A.1) -> A.1\n"));
    assert!(report.contains("Example 2 (B.1) -> B.1\n"));
    assert!(report.ends_with("hF = 100\n"));
    Ok(())
}

#[test]
fn profile_matches_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (train, test) = write_pair(&dir)?;

    let profile = DatasetProfile::from_paths(&train, &test)?;
    assert_eq!(profile.num_training_examples, 8);
    assert_eq!(profile.num_test_examples, 3);
    assert_eq!(profile.num_attributes, 3);
    Ok(())
}

#[test]
fn missing_file_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.arff");

    let err = TrainedModel::from_path(&missing, 3, 8, false).unwrap_err();
    match err {
        BayesError::FileUnreadable { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_training_data_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let train = dir.path().join("train.arff");
    let test = dir.path().join("test.arff");
    fs::write(&train, "@attribute a {0}\n@attribute class {A}\n@data\n")?;
    fs::write(&test, TEST)?;

    let err = DatasetProfile::from_paths(&train, &test).unwrap_err();
    match err {
        BayesError::EmptyDataset { path } => assert_eq!(path, train),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn predictions_csv_round_trips_through_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let model = load_training_model(TRAIN, 3, 8, true)?;
    let test = load_test_instances(TEST, 3, 3)?;
    let evaluation = NaiveBayesClassifier::prepare(&model, true).evaluate(&test);

    let csv_path = dir.path().join("predictions.csv");
    evaluation.write_predictions_csv(&csv_path)?;

    let mut reader = csv::Reader::from_path(&csv_path)?;
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], ["1", "A.2", "A.2"]);
    Ok(())
}

#[test]
fn all_wrong_predictions_score_zero() -> Result<()> {
    let model = load_training_model(TRAIN, 3, 8, true)?;
    // Every true label lives under a root the model never predicts.
    let test = load_test_instances("@data\n0,0,C.1\n2,1,D\n", 2, 3)?;

    let metrics = classify(&model, &test, true, None)?;
    assert_eq!(metrics.precision, 0.0);
    assert_eq!(metrics.recall, 0.0);
    assert_eq!(metrics.f_measure, 0.0);
    Ok(())
}

#[test]
fn independent_runs_on_separate_threads_agree() -> Result<()> {
    let expected = {
        let model = load_training_model(TRAIN, 3, 8, false)?;
        let test = load_test_instances(TEST, 3, 3)?;
        classify(&model, &test, true, None)?
    };

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| -> hierarchical_bayes::Result<_> {
                    let model = load_training_model(TRAIN, 3, 8, false)?;
                    let test: TestSet = load_test_instances(TEST, 3, 3)?;
                    classify(&model, &test, true, None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result?, expected);
    }
    Ok(())
}
