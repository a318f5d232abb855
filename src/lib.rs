//! Naive Bayes classification over a dot-delimited class hierarchy.
//!
//! Training text is indexed per class and per ancestor pseudo-class, every
//! registered class gets a usefulness weight from the hierarchy shape, and
//! predictions are scored with hierarchical precision, recall and F.

pub mod arff;
pub mod bayes;
pub mod config;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod path;
pub mod report;
pub mod schema;
pub mod test_set;
pub mod training;
pub mod usefulness;

pub use arff::DatasetProfile;
pub use bayes::{classify, Evaluation, NaiveBayesClassifier, Prediction};
pub use config::RunConfig;
pub use error::{BayesError, Result};
pub use frequency::HierarchicalFrequencyTable;
pub use metrics::HierarchicalMetrics;
pub use path::ClassPath;
pub use schema::AttributeSchema;
pub use test_set::{load_test_instances, TestInstance, TestSet};
pub use training::{load_training_model, TrainedModel};
pub use usefulness::ClassRegistry;

use std::path::Path;

/// Trains on `training`, classifies `test` and returns the hierarchical F.
///
/// Counts come from [`DatasetProfile::from_paths`]. When `result` is given the
/// per-instance report is written there.
pub fn nbayes<P: AsRef<Path>>(
    leaf_only: bool,
    use_usefulness: bool,
    training: P,
    test: P,
    result: Option<P>,
) -> Result<f64> {
    let profile = DatasetProfile::from_paths(&training, &test)?;

    let model = TrainedModel::from_path(
        training,
        profile.num_attributes,
        profile.num_training_examples,
        leaf_only,
    )?;
    let test_set = TestSet::from_path(test, profile.num_test_examples, profile.num_attributes)?;

    let evaluation = NaiveBayesClassifier::prepare(&model, use_usefulness).evaluate(&test_set);
    if let Some(result) = result {
        report::write_report_file(&evaluation, result)?;
    }

    Ok(evaluation.metrics.f_measure)
}
