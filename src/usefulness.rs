use crate::path::ClassPath;
use indexmap::IndexMap;
use tracing::debug;

/// Classes eligible for prediction, each with its usefulness weight.
///
/// Iteration follows registration order, which is also the tie-break order
/// used when two classes score the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassRegistry {
    classes: IndexMap<ClassPath, f64>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the declared class vocabulary.
    ///
    /// In leaf-only mode a label is skipped when another declared label lies
    /// below it, regardless of the order the labels are declared in.
    pub fn from_vocabulary(labels: &[ClassPath], leaf_only: bool) -> Self {
        let mut registry = Self::new();
        for label in labels {
            if leaf_only && labels.iter().any(|other| label.is_ancestor_of(other)) {
                continue;
            }
            registry.register(label, leaf_only);
        }

        debug!(classes = registry.len(), leaf_only, "registered class vocabulary");
        registry
    }

    /// Registers `class`.
    ///
    /// Without `leaf_only`, the class is registered first and then every
    /// proper ancestor not yet present, shallowest first. With
    /// it, the class is only registered when nothing below it is registered,
    /// and ancestors are only refreshed if they are already present.
    pub fn register(&mut self, class: &ClassPath, leaf_only: bool) {
        if self.classes.contains_key(class) {
            return;
        }

        if leaf_only {
            if self.has_descendant(class) {
                return;
            }
            self.classes.insert(class.clone(), 1.0);
            for ancestor in class.ancestors() {
                if let Some(weight) = self.classes.get_mut(&ancestor) {
                    *weight = 1.0;
                }
            }
        } else {
            self.classes.insert(class.clone(), 1.0);
            for ancestor in class.ancestors() {
                self.classes.entry(ancestor).or_insert(1.0);
            }
        }
    }

    pub fn has_descendant(&self, class: &ClassPath) -> bool {
        self.classes.keys().any(|other| class.is_ancestor_of(other))
    }

    /// Recomputes every class's usefulness from the registered hierarchy.
    ///
    /// A class counts itself plus every registered class below it. With
    /// `max` the largest such count, usefulness is
    /// `1 - log2(count) / log2(max + 1)`, so a class with nothing registered
    /// below it scores exactly 1.
    pub fn compute_usefulness(&mut self) {
        let mut counts: IndexMap<ClassPath, u64> =
            self.classes.keys().map(|class| (class.clone(), 1)).collect();

        for class in self.classes.keys() {
            for ancestor in class.ancestors() {
                if let Some(count) = counts.get_mut(&ancestor) {
                    *count += 1;
                }
            }
        }

        let max_count = counts.values().copied().max().unwrap_or(1);
        let scale = ((max_count + 1) as f64).log2();

        for (class, weight) in self.classes.iter_mut() {
            *weight = if scale == 0.0 {
                0.0
            } else {
                1.0 - (counts[class] as f64).log2() / scale
            };
        }

        debug!(max_count, "computed class usefulness");
    }

    pub fn usefulness(&self, class: &ClassPath) -> Option<f64> {
        self.classes.get(class).copied()
    }

    pub fn contains(&self, class: &ClassPath) -> bool {
        self.classes.contains_key(class)
    }

    /// Registered classes with their usefulness, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClassPath, f64)> {
        self.classes.iter().map(|(class, &weight)| (class, weight))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
