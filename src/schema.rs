use crate::arff;
use crate::error::{BayesError, Result};
use crate::path::ClassPath;
use tracing::debug;

/// One `@attribute` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Enumerated nominal values, empty when the declaration has no `{...}` list.
    pub values: Vec<String>,
}

impl Attribute {
    /// Number of values the attribute may take; 1 when nothing is enumerated.
    pub fn domain_size(&self) -> usize {
        self.values.len().max(1)
    }

    fn parse(line: &str) -> Result<Self> {
        let rest = line
            .get("@attribute".len()..)
            .unwrap_or_default()
            .trim_start();

        let name: String = rest
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '{')
            .collect();
        if name.is_empty() {
            return Err(BayesError::MalformedHeader(format!(
                "attribute declaration without a name: {line}"
            )));
        }

        let values = match rest.find('{') {
            None => Vec::new(),
            Some(open) => {
                let close = rest[open..].find('}').ok_or_else(|| {
                    BayesError::MalformedHeader(format!("unterminated value list: {line}"))
                })?;
                rest[open + 1..open + close]
                    .split(',')
                    .map(|value| value.trim().to_string())
                    .collect()
            }
        };

        Ok(Attribute { name, values })
    }
}

/// The attribute layout of a dataset flattened into one value-index space.
///
/// Attribute `a` owns the slots `offset(a)..offset(a + 1)`. The last attribute
/// is the class and does not take part in scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
    offsets: Vec<usize>,
}

impl AttributeSchema {
    /// Builds the schema from header lines (anything before `@data`).
    pub fn parse<'a, I>(header: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut attributes = Vec::new();
        let mut offsets = vec![0];

        for line in header {
            let line = line.trim();
            if !arff::is_attribute_declaration(line) {
                continue;
            }

            let attribute = Attribute::parse(line)?;
            let last = offsets[offsets.len() - 1];
            offsets.push(last + attribute.domain_size());
            attributes.push(attribute);
        }

        if attributes.is_empty() {
            return Err(BayesError::MalformedHeader(
                "no attribute declarations found".to_string(),
            ));
        }

        debug!(
            attributes = attributes.len(),
            flat_size = offsets[attributes.len() - 1],
            "parsed attribute schema"
        );

        Ok(AttributeSchema {
            attributes,
            offsets,
        })
    }

    /// K, the number of declared attributes including the class.
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// K - 1, the attributes that take part in scoring.
    pub fn num_scored(&self) -> usize {
        self.attributes.len() - 1
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn domain_size(&self, attribute: usize) -> usize {
        self.offsets[attribute + 1] - self.offsets[attribute]
    }

    pub fn offset(&self, attribute: usize) -> usize {
        self.offsets[attribute]
    }

    /// Size of the flat index space spanned by the scored attributes.
    pub fn flat_size(&self) -> usize {
        self.offsets[self.num_scored()]
    }

    /// Flat slot of `value` for `attribute`, or `None` when the value is out of domain.
    pub fn slot(&self, attribute: usize, value: u32) -> Option<usize> {
        let value = value as usize;
        (value < self.domain_size(attribute)).then(|| self.offsets[attribute] + value)
    }

    /// The class attribute's enumerated labels, in declaration order.
    pub fn class_labels(&self) -> Vec<ClassPath> {
        self.attributes[self.num_scored()]
            .values
            .iter()
            .map(|label| ClassPath::parse(label))
            .collect()
    }
}
