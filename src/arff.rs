//! Reading the line-oriented attribute/data text format.
//!
//! A file is a header of `@attribute` declarations terminated by an `@data`
//! marker, followed by one comma-separated example per line. Lines starting
//! with `%` (after trimming) are comments anywhere in the file.

use crate::error::{BayesError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{debug, warn};

const ATTRIBUTE_KEYWORD: &str = "@attribute";
const DATA_KEYWORD: &str = "@data";

/// A file split at its `@data` marker.
#[derive(Debug)]
pub struct Sections<'a> {
    /// Trimmed, non-comment, non-blank lines before the data marker.
    pub header: Vec<&'a str>,
    /// Trimmed, non-comment, non-blank lines after the data marker.
    pub data: Vec<&'a str>,
}

impl<'a> Sections<'a> {
    pub fn split(text: &'a str) -> Result<Self> {
        let mut header = Vec::new();
        let mut lines = text.lines().map(str::trim);

        let mut found_marker = false;
        for line in lines.by_ref() {
            if is_skippable(line) {
                continue;
            }
            if starts_with_keyword(line, DATA_KEYWORD) {
                found_marker = true;
                break;
            }
            header.push(line);
        }

        if !found_marker {
            return Err(BayesError::MalformedHeader(format!(
                "no {DATA_KEYWORD} marker found"
            )));
        }

        let data = lines.filter(|line| !is_skippable(line)).collect();

        Ok(Sections { header, data })
    }

    /// Header lines that declare an attribute.
    pub fn attribute_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.header
            .iter()
            .copied()
            .filter(|line| is_attribute_declaration(line))
    }

    /// Parses the data section into csv records.
    pub fn records(&self) -> Result<Vec<StringRecord>> {
        if self.data.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.data.join("\n");
        let mut reader = data_reader(body.as_bytes());

        let mut records = Vec::with_capacity(self.data.len());
        for record in reader.records() {
            records.push(record?);
        }

        Ok(records)
    }
}

fn data_reader(body: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body)
}

/// Number of fields in one data line, split the same way as [`Sections::records`].
fn field_count(line: &str) -> Result<usize> {
    match data_reader(line.as_bytes()).records().next() {
        Some(record) => Ok(record?.len()),
        None => Ok(0),
    }
}

pub fn is_attribute_declaration(line: &str) -> bool {
    starts_with_keyword(line, ATTRIBUTE_KEYWORD)
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('%')
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

/// Parses an attribute value by keeping only its ASCII digits.
///
/// Non-digit characters are dropped rather than rejected, so `"v12"` reads as
/// 12 and `"1.5"` reads as 15. A field without digits reads as 0. This is a
/// known data-quality hazard: malformed tokens degrade silently into partial
/// values. Overlong digit runs saturate at `u32::MAX`.
pub fn parse_digits(field: &str) -> u32 {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        debug!(field, "dropping non-digit characters from attribute value");
    }

    field
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}

/// Reads a whole file into memory. The handle is dropped before returning.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| BayesError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Instance and attribute counts of a training/test pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetProfile {
    pub num_training_examples: usize,
    pub num_test_examples: usize,
    /// Total attributes including the class, taken from the last training row.
    pub num_attributes: usize,
}

impl DatasetProfile {
    pub fn from_paths<P: AsRef<Path>>(training: P, test: P) -> Result<Self> {
        let training = training.as_ref();
        let training_text = read_file(training)?;
        let test_text = read_file(test.as_ref())?;

        Self::from_text(&training_text, &test_text).map_err(|err| match err {
            BayesError::EmptyDataset { .. } => BayesError::EmptyDataset {
                path: training.to_path_buf(),
            },
            other => other,
        })
    }

    pub fn from_text(training: &str, test: &str) -> Result<Self> {
        let training = Sections::split(training)?;
        let test = Sections::split(test)?;

        let last = training.data.last().ok_or_else(|| BayesError::EmptyDataset {
            path: "<training text>".into(),
        })?;

        let profile = DatasetProfile {
            num_training_examples: training.data.len(),
            num_test_examples: test.data.len(),
            num_attributes: field_count(last)?,
        };

        if test.data.is_empty() {
            warn!("test data section is empty");
        }
        debug!(?profile, "computed dataset profile");

        Ok(profile)
    }
}
