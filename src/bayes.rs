use crate::error::Result;
use crate::metrics::{HierarchicalMetrics, Overlap, OverlapAccumulator};
use crate::path::ClassPath;
use crate::report;
use crate::test_set::{TestInstance, TestSet};
use crate::training::TrainedModel;
use std::io::Write;
use tracing::{debug, info};

/// Precomputed log10 terms for one registered class.
#[derive(Debug, Clone)]
struct ClassTerms<'a> {
    class: &'a ClassPath,
    log_prior: f64,
    log_usefulness: f64,
    // One entry per flat attribute-value slot of the schema.
    log_likelihoods: Vec<f64>,
}

/// Scores test instances against every registered class of a trained model.
///
/// All log terms are computed once in [`NaiveBayesClassifier::prepare`]; the
/// classifier only borrows the model, so each run owns its own instance.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier<'a> {
    model: &'a TrainedModel,
    classes: Vec<ClassTerms<'a>>,
    smoothing: f64,
    use_usefulness: bool,
}

impl<'a> NaiveBayesClassifier<'a> {
    pub fn prepare(model: &'a TrainedModel, use_usefulness: bool) -> Self {
        let table = model.table();
        let schema = model.schema();
        let num_examples = model.num_training_examples() as f64;

        // Stand-in for any zero frequency, including every term of an unseen class.
        let smoothing = (1.0 / num_examples).log10();

        let classes = model
            .registry()
            .iter()
            .map(|(class, usefulness)| {
                let total = table.total_count(class);

                let log_prior = if total == 0 {
                    f64::NEG_INFINITY
                } else {
                    (total as f64 / num_examples).log10()
                };

                let mut log_likelihoods = Vec::with_capacity(schema.flat_size());
                for attribute in 0..schema.num_scored() {
                    for value in 0..schema.domain_size(attribute) as u32 {
                        let freq = table.frequency_of(class, attribute, value);
                        log_likelihoods.push(if freq == 0 || total == 0 {
                            smoothing
                        } else {
                            (freq as f64 / total as f64).log10()
                        });
                    }
                }

                ClassTerms {
                    class,
                    log_prior,
                    log_usefulness: usefulness.log10(),
                    log_likelihoods,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            classes = classes.len(),
            smoothing, use_usefulness, "prepared classifier"
        );

        NaiveBayesClassifier {
            model,
            classes,
            smoothing,
            use_usefulness,
        }
    }

    /// The value substituted for zero frequencies: `log10(1 / n)`.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Log10 score of `values` under `class`, or `None` if the class is not registered.
    pub fn score(&self, values: &[u32], class: &ClassPath) -> Option<f64> {
        self.classes
            .iter()
            .find(|terms| terms.class == class)
            .map(|terms| self.score_terms(values, terms))
    }

    fn score_terms(&self, values: &[u32], terms: &ClassTerms) -> f64 {
        let schema = self.model.schema();

        let mut score = terms.log_prior;
        if self.use_usefulness {
            score += terms.log_usefulness;
        }

        for (attribute, &value) in values.iter().enumerate().take(schema.num_scored()) {
            score += match schema.slot(attribute, value) {
                Some(slot) => terms.log_likelihoods[slot],
                None => self.smoothing,
            };
        }

        score
    }

    /// Given attribute values, picks the best scoring class.
    ///
    /// Ties keep the class registered first. When no class scores above
    /// negative infinity the empty path is returned.
    pub fn predict_one(&self, values: &[u32]) -> ClassPath {
        let (best_class, _) = self.classes.iter().fold(
            (None, f64::NEG_INFINITY),
            |(best_class, best_score), terms| {
                let score = self.score_terms(values, terms);
                if score > best_score {
                    (Some(terms.class), score)
                } else {
                    (best_class, best_score)
                }
            },
        );

        best_class.cloned().unwrap_or_else(ClassPath::empty)
    }

    /// Classifies every instance and aggregates the hierarchical metrics.
    pub fn evaluate(&self, test_set: &TestSet) -> Evaluation {
        let mut accumulator = OverlapAccumulator::default();

        let predictions = test_set
            .instances()
            .iter()
            .enumerate()
            .map(|(index, TestInstance { values, class })| {
                let predicted = self.predict_one(values);
                accumulator.add(Overlap::between(&predicted, class));
                Prediction {
                    index,
                    truth: class.clone(),
                    predicted,
                }
            })
            .collect();

        let metrics = accumulator.metrics();
        info!(
            instances = accumulator.instances,
            h_precision = metrics.precision,
            h_recall = metrics.recall,
            h_f = metrics.f_measure,
            "evaluated test set"
        );

        Evaluation {
            predictions,
            accumulator,
            metrics,
        }
    }
}

/// One classified test instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub index: usize,
    pub truth: ClassPath,
    pub predicted: ClassPath,
}

/// Predictions of a run together with their aggregate metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub predictions: Vec<Prediction>,
    pub accumulator: OverlapAccumulator,
    pub metrics: HierarchicalMetrics,
}

/// Classifies `test_set` with `model` and optionally writes the per-instance report.
pub fn classify(
    model: &TrainedModel,
    test_set: &TestSet,
    use_usefulness: bool,
    report: Option<&mut dyn Write>,
) -> Result<HierarchicalMetrics> {
    let classifier = NaiveBayesClassifier::prepare(model, use_usefulness);
    let evaluation = classifier.evaluate(test_set);

    if let Some(writer) = report {
        report::write_report(&evaluation, writer)?;
    }

    Ok(evaluation.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_set::load_test_instances;
    use crate::training::load_training_model;

    const TRAIN: &str = "\
@attribute a1 {0,1}
@attribute a2 {0,1}
@attribute class {A.1,A.2,B}
@data
0,0,A.1
0,0,A.1
0,1,A.1
1,1,A.2
1,1,A.2
1,0,A.2
";

    fn model() -> TrainedModel {
        load_training_model(TRAIN, 3, 6, false).unwrap()
    }

    #[test]
    fn unseen_class_uses_smoothing_everywhere() {
        let model = model();
        let classifier = NaiveBayesClassifier::prepare(&model, false);
        let expected = (1.0f64 / 6.0).log10();
        assert_eq!(classifier.smoothing(), expected);

        let b = classifier
            .classes
            .iter()
            .find(|terms| terms.class.to_string() == "B")
            .unwrap();
        assert_eq!(b.log_prior, f64::NEG_INFINITY);
        assert!(b.log_likelihoods.iter().all(|&l| l == expected));
    }

    #[test]
    fn zero_frequency_is_smoothed() {
        let model = model();
        let classifier = NaiveBayesClassifier::prepare(&model, false);
        let a1 = ClassPath::parse("A.1");

        // A.1 never has a1 == 1
        let expected = (3.0f64 / 6.0).log10() + (1.0f64 / 6.0).log10() + (2.0f64 / 3.0).log10();
        let score = classifier.score(&[1, 0], &a1).unwrap();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn predicts_leaf_matching_attributes() {
        let model = model();
        let classifier = NaiveBayesClassifier::prepare(&model, true);
        assert_eq!(classifier.predict_one(&[0, 0]).to_string(), "A.1");
        assert_eq!(classifier.predict_one(&[1, 1]).to_string(), "A.2");
    }

    #[test]
    fn without_usefulness_the_parent_wins() {
        let model = model();
        let classifier = NaiveBayesClassifier::prepare(&model, false);
        // "A" covers every example, so its prior of 1 outweighs the leaves here.
        assert_eq!(classifier.predict_one(&[0, 1]).to_string(), "A");

        let weighted = NaiveBayesClassifier::prepare(&model, true);
        assert_eq!(weighted.predict_one(&[0, 1]).to_string(), "A.1");
    }

    #[test]
    fn out_of_domain_test_value_uses_smoothing() {
        let model = model();
        let classifier = NaiveBayesClassifier::prepare(&model, false);
        let a = ClassPath::parse("A");
        let inside = classifier.score(&[0, 0], &a).unwrap();
        let outside = classifier.score(&[9, 0], &a).unwrap();
        let expected = inside - (3.0f64 / 6.0).log10() + classifier.smoothing();
        assert!((outside - expected).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_registration_order() {
        let text = "@attribute a {0,1}\n@attribute class {X,Y}\n@data\n0,X\n0,Y\n";
        let model = load_training_model(text, 2, 2, false).unwrap();
        let classifier = NaiveBayesClassifier::prepare(&model, false);
        assert_eq!(classifier.predict_one(&[0]).to_string(), "X");
    }

    #[test]
    fn only_child_wins_tie_with_its_parent() {
        // "A" has the single child "A.1", so both hold identical counts.
        let text = "@attribute a {0,1}\n@attribute class {A.1,B}\n@data\n0,A.1\n1,B\n";
        let model = load_training_model(text, 2, 2, false).unwrap();
        let classifier = NaiveBayesClassifier::prepare(&model, false);

        let parent = classifier.score(&[0], &"A".into()).unwrap();
        let child = classifier.score(&[0], &"A.1".into()).unwrap();
        assert_eq!(parent, child);
        assert_eq!(classifier.predict_one(&[0]).to_string(), "A.1");

        let test = load_test_instances("@data\n0,A.1\n", 1, 2).unwrap();
        assert_eq!(classifier.evaluate(&test).metrics.f_measure, 100.0);
    }

    #[test]
    fn nothing_trained_predicts_empty_path() {
        let text = "@attribute a {0,1}\n@attribute class {X}\n@data\n";
        let model = load_training_model(text, 2, 0, false).unwrap();
        let classifier = NaiveBayesClassifier::prepare(&model, false);
        assert!(classifier.predict_one(&[0]).is_empty());
    }

    #[test]
    fn evaluate_accumulates_overlap() {
        let model = model();
        let test = load_test_instances("@data\n0,0,A.1\n1,1,A.2.Z\n", 2, 3).unwrap();
        let evaluation = NaiveBayesClassifier::prepare(&model, true).evaluate(&test);

        assert_eq!(evaluation.predictions.len(), 2);
        assert_eq!(evaluation.accumulator.sum_intersection, 4);
        assert_eq!(evaluation.accumulator.sum_pred_depth, 4);
        assert_eq!(evaluation.accumulator.sum_true_depth, 5);
        assert_eq!(evaluation.metrics.precision, 1.0);
        assert!((evaluation.metrics.recall - 0.8).abs() < 1e-12);
    }

    #[test]
    fn classify_writes_report_lines() {
        let model = model();
        // Predicted "A.1" is deeper than the true "A".
        let test = load_test_instances("@data\n0,0,A\n", 1, 3).unwrap();
        let mut out = Vec::new();

        let metrics = classify(&model, &test, true, Some(&mut out)).unwrap();
        assert_eq!(metrics.precision, 0.5);
        assert!((metrics.f_measure - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.min_depth_f_measure, 100.0);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Example 0 (A) -> A.1");
        assert_eq!(lines[1], "hP = 100");
        assert_eq!(lines[2], "hR = 100");
        assert_eq!(lines[3], "hF = 100");
    }
}
