use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading training/test data or running a classification.
///
/// Every load failure is returned to the caller; nothing in the library exits
/// the process, so a batch driver can skip a failing fold and keep going.
#[derive(Error, Debug)]
pub enum BayesError {
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    FileUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("malformed record on data line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("inconsistent value {value} for attribute {attribute} (max allowed {max_allowed})")]
    OutOfDomainValue {
        attribute: usize,
        value: u32,
        max_allowed: u32,
    },

    #[error("no data instances found in {}", path.display())]
    EmptyDataset { path: PathBuf },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BayesError>;
