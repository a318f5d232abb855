use std::fmt;

/// A hierarchical class label such as `A.B.C`.
///
/// The label is split once into its segments. Empty segments are kept as-is,
/// so `A.` has depth 2 with an empty leaf segment. The empty label has depth 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassPath {
    segments: Vec<String>,
}

impl ClassPath {
    pub const DELIMITER: char = '.';

    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        let segments = if label.is_empty() {
            Vec::new()
        } else {
            label.split(Self::DELIMITER).map(str::to_string).collect()
        };

        ClassPath { segments }
    }

    /// The path with no segments. Used as the prediction when no class scores
    /// above negative infinity.
    pub fn empty() -> Self {
        ClassPath {
            segments: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The ancestor at hierarchy `level` (1-based). `prefix(depth())` is the path itself.
    pub fn prefix(&self, level: usize) -> ClassPath {
        let level = level.min(self.depth());
        ClassPath {
            segments: self.segments[..level].to_vec(),
        }
    }

    /// Every prefix from level 1 up to and including the path itself.
    pub fn prefixes(&self) -> impl Iterator<Item = ClassPath> + '_ {
        (1..=self.depth()).map(move |level| self.prefix(level))
    }

    /// Proper ancestors, shallowest first.
    pub fn ancestors(&self) -> impl Iterator<Item = ClassPath> + '_ {
        (1..self.depth()).map(move |level| self.prefix(level))
    }

    /// True when `self` is a strict segment-prefix of `other`.
    pub fn is_ancestor_of(&self, other: &ClassPath) -> bool {
        self.depth() < other.depth() && other.segments[..self.depth()] == self.segments[..]
    }

    /// Number of leading segments shared with `other`, stopping at the first mismatch.
    pub fn common_prefix_len(&self, other: &ClassPath) -> usize {
        self.segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl fmt::Display for ClassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for ClassPath {
    fn from(label: &str) -> Self {
        ClassPath::parse(label)
    }
}
