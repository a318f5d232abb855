use crate::arff::{self, Sections};
use crate::error::{BayesError, Result};
use crate::path::ClassPath;
use std::path::Path;
use tracing::{info, warn};

/// One example to classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInstance {
    pub values: Vec<u32>,
    pub class: ClassPath,
}

/// Test instances in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSet {
    instances: Vec<TestInstance>,
}

impl TestSet {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        num_instances: usize,
        num_attributes: usize,
    ) -> Result<Self> {
        let text = arff::read_file(path)?;
        load_test_instances(&text, num_instances, num_attributes)
    }

    pub fn instances(&self) -> &[TestInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl FromIterator<TestInstance> for TestSet {
    fn from_iter<I: IntoIterator<Item = TestInstance>>(iter: I) -> Self {
        TestSet {
            instances: iter.into_iter().collect(),
        }
    }
}

/// Reads the data section of test text. The header only has to contain the
/// `@data` marker; attribute declarations are not interpreted.
pub fn load_test_instances(
    text: &str,
    num_instances: usize,
    num_attributes: usize,
) -> Result<TestSet> {
    let sections = Sections::split(text)?;

    let mut instances = Vec::with_capacity(num_instances);
    for (index, record) in sections.records()?.iter().enumerate() {
        if record.len() != num_attributes {
            return Err(BayesError::MalformedRecord {
                line: index + 1,
                expected: num_attributes,
                found: record.len(),
            });
        }

        let values = record
            .iter()
            .take(num_attributes - 1)
            .map(arff::parse_digits)
            .collect();
        let class = ClassPath::parse(&record[num_attributes - 1]);

        instances.push(TestInstance { values, class });
    }

    if instances.len() != num_instances {
        warn!(
            expected = num_instances,
            found = instances.len(),
            "test example count differs from profile"
        );
    }
    info!(examples = instances.len(), "loaded test set");

    Ok(TestSet { instances })
}
