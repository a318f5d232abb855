use crate::error::{BayesError, Result};
use crate::path::ClassPath;
use crate::schema::AttributeSchema;
use std::collections::{hash_map::Entry, HashMap};

/// Attribute-value counts per class, accumulated over every hierarchy level.
///
/// An example labelled `A.B.C` is counted under `A`, `A.B` and `A.B.C`, so an
/// ancestor's counts always dominate those of its descendants.
#[derive(Debug, Clone)]
pub struct HierarchicalFrequencyTable {
    schema: AttributeSchema,
    // Per class: one counter per flat attribute-value slot, then the total example count.
    frequencies: HashMap<ClassPath, Vec<u64>>,
    // Slots set by the example being observed; cleared at the start of every observation.
    touched: Vec<usize>,
    observed: usize,
    max_depth: usize,
}

impl HierarchicalFrequencyTable {
    pub fn new(schema: AttributeSchema) -> Self {
        let touched = Vec::with_capacity(schema.num_scored() + 1);
        HierarchicalFrequencyTable {
            schema,
            frequencies: HashMap::new(),
            touched,
            observed: 0,
            max_depth: 0,
        }
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    fn total_slot(&self) -> usize {
        self.schema.flat_size()
    }

    /// Adds one training example to its class and every ancestor of it.
    ///
    /// Values outside an attribute's domain are rejected before anything is
    /// counted, leaving the table unchanged.
    pub fn observe(&mut self, values: &[u32], class: &ClassPath) -> Result<()> {
        debug_assert_eq!(values.len(), self.schema.num_scored());

        self.touched.clear();
        for (attribute, &value) in values.iter().enumerate() {
            let slot = self.schema.slot(attribute, value).ok_or_else(|| {
                BayesError::OutOfDomainValue {
                    attribute,
                    value,
                    max_allowed: self.schema.domain_size(attribute) as u32 - 1,
                }
            })?;
            self.touched.push(slot);
        }
        self.touched.push(self.total_slot());

        let width = self.total_slot() + 1;
        for ancestor in class.prefixes() {
            match self.frequencies.entry(ancestor) {
                Entry::Vacant(entry) => {
                    let mut counts = vec![0; width];
                    for &slot in &self.touched {
                        counts[slot] = 1;
                    }
                    entry.insert(counts);
                }
                Entry::Occupied(entry) => {
                    let counts = entry.into_mut();
                    for &slot in &self.touched {
                        counts[slot] += 1;
                    }
                }
            }
        }

        self.observed += 1;
        self.max_depth = self.max_depth.max(class.depth());

        Ok(())
    }

    /// Examples of `class` (or its descendants) with `attribute == value`.
    pub fn frequency_of(&self, class: &ClassPath, attribute: usize, value: u32) -> u64 {
        match (self.frequencies.get(class), self.schema.slot(attribute, value)) {
            (Some(counts), Some(slot)) => counts[slot],
            _ => 0,
        }
    }

    /// Examples counted under `class`, including those of its descendants.
    pub fn total_count(&self, class: &ClassPath) -> u64 {
        self.frequencies
            .get(class)
            .map_or(0, |counts| counts[self.total_slot()])
    }

    pub fn has_descendant(&self, class: &ClassPath) -> bool {
        self.frequencies.keys().any(|other| class.is_ancestor_of(other))
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassPath> {
        self.frequencies.keys()
    }

    /// Number of training examples observed so far.
    pub fn observed_examples(&self) -> usize {
        self.observed
    }

    /// Deepest label level seen in training.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

// The scratch slots only describe the last observation and take no part in equality.
impl PartialEq for HierarchicalFrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema
            && self.frequencies == other.frequencies
            && self.observed == other.observed
            && self.max_depth == other.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_schema() -> AttributeSchema {
        AttributeSchema::parse([
            "@attribute a1 {0,1}",
            "@attribute a2 {0,1}",
            "@attribute class {A.1,A.2}",
        ])
        .unwrap()
    }

    fn scenario() -> HierarchicalFrequencyTable {
        let mut table = HierarchicalFrequencyTable::new(binary_schema());
        let a1 = ClassPath::parse("A.1");
        let a2 = ClassPath::parse("A.2");
        table.observe(&[0, 0], &a1).unwrap();
        table.observe(&[0, 1], &a1).unwrap();
        table.observe(&[1, 1], &a2).unwrap();
        table.observe(&[1, 0], &a2).unwrap();
        table
    }

    #[test]
    fn ancestors_accumulate_descendant_counts() {
        let table = scenario();
        assert_eq!(table.total_count(&"A".into()), 4);
        assert_eq!(table.total_count(&"A.1".into()), 2);
        assert_eq!(table.total_count(&"A.2".into()), 2);

        assert_eq!(table.frequency_of(&"A.1".into(), 0, 0), 2);
        assert_eq!(table.frequency_of(&"A.1".into(), 1, 1), 1);
        assert_eq!(table.frequency_of(&"A".into(), 0, 1), 2);
        assert_eq!(table.observed_examples(), 4);
        assert_eq!(table.max_depth(), 2);
    }

    #[test]
    fn unknown_class_reads_zero() {
        let table = scenario();
        assert_eq!(table.total_count(&"B".into()), 0);
        assert_eq!(table.frequency_of(&"B".into(), 0, 0), 0);
        assert_eq!(table.frequency_of(&"A".into(), 0, 7), 0);
    }

    #[test]
    fn descendants_are_detected_by_segment_prefix() {
        let table = scenario();
        assert!(table.has_descendant(&"A".into()));
        assert!(!table.has_descendant(&"A.1".into()));
        assert!(!table.has_descendant(&"B".into()));
    }

    #[test]
    fn equality_ignores_observation_order() {
        let mut forward = HierarchicalFrequencyTable::new(binary_schema());
        forward.observe(&[0, 0], &"A.1".into()).unwrap();
        forward.observe(&[1, 1], &"A.2".into()).unwrap();

        let mut backward = HierarchicalFrequencyTable::new(binary_schema());
        backward.observe(&[1, 1], &"A.2".into()).unwrap();
        backward.observe(&[0, 0], &"A.1".into()).unwrap();

        assert_eq!(forward, backward);

        backward.observe(&[0, 0], &"A.1".into()).unwrap();
        assert_ne!(forward, backward);
    }

    #[test]
    fn out_of_domain_value_leaves_table_unchanged() {
        let mut table = scenario();
        let before = table.clone();

        let err = table.observe(&[0, 2], &"A.1".into()).unwrap_err();
        match err {
            BayesError::OutOfDomainValue {
                attribute,
                value,
                max_allowed,
            } => {
                assert_eq!((attribute, value, max_allowed), (1, 2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(table, before);
    }
}
