use crate::arff::{self, Sections};
use crate::error::{BayesError, Result};
use crate::frequency::HierarchicalFrequencyTable;
use crate::path::ClassPath;
use crate::schema::AttributeSchema;
use crate::usefulness::ClassRegistry;
use std::path::Path;
use tracing::{info, warn};

/// Everything learned from one training text. Frozen once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    table: HierarchicalFrequencyTable,
    registry: ClassRegistry,
    num_training_examples: usize,
}

impl TrainedModel {
    pub fn table(&self) -> &HierarchicalFrequencyTable {
        &self.table
    }

    pub fn schema(&self) -> &AttributeSchema {
        self.table.schema()
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Denominator used for class priors and the smoothing floor.
    pub fn num_training_examples(&self) -> usize {
        self.num_training_examples
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        num_attributes: usize,
        num_examples: usize,
        leaf_only: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let text = arff::read_file(path)?;
        load_training_model(&text, num_attributes, num_examples, leaf_only).map_err(|err| match err {
            BayesError::EmptyDataset { .. } => BayesError::EmptyDataset {
                path: path.to_path_buf(),
            },
            other => other,
        })
    }
}

/// Builds a model from training text.
///
/// `num_attributes` is K, the declared attribute count including the class.
/// `num_examples` is the prior denominator; the data rows are expected to
/// match it. A zero count with data rows present is an `EmptyDataset` error.
pub fn load_training_model(
    text: &str,
    num_attributes: usize,
    num_examples: usize,
    leaf_only: bool,
) -> Result<TrainedModel> {
    let sections = Sections::split(text)?;
    let schema = AttributeSchema::parse(sections.attribute_lines())?;

    if schema.num_attributes() != num_attributes {
        return Err(BayesError::MalformedHeader(format!(
            "expected {num_attributes} attribute declarations, found {}",
            schema.num_attributes()
        )));
    }

    let mut registry = ClassRegistry::from_vocabulary(&schema.class_labels(), leaf_only);
    let mut table = HierarchicalFrequencyTable::new(schema);

    let mut values = Vec::with_capacity(num_attributes.saturating_sub(1));
    for (index, record) in sections.records()?.iter().enumerate() {
        if record.len() != num_attributes {
            return Err(BayesError::MalformedRecord {
                line: index + 1,
                expected: num_attributes,
                found: record.len(),
            });
        }

        values.clear();
        values.extend(record.iter().take(num_attributes - 1).map(arff::parse_digits));
        let class = ClassPath::parse(&record[num_attributes - 1]);

        table.observe(&values, &class)?;
    }

    if num_examples == 0 && table.observed_examples() > 0 {
        return Err(BayesError::EmptyDataset {
            path: "<training text>".into(),
        });
    }
    if table.observed_examples() != num_examples {
        warn!(
            expected = num_examples,
            found = table.observed_examples(),
            "training example count differs from profile"
        );
    }

    registry.compute_usefulness();

    info!(
        examples = table.observed_examples(),
        classes = registry.len(),
        depth = table.max_depth(),
        "loaded training set"
    );

    Ok(TrainedModel {
        table,
        registry,
        num_training_examples: num_examples,
    })
}
