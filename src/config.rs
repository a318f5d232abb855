use crate::error::{BayesError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Options of one classification run, loadable from a TOML file.
///
/// ```toml
/// leaf_only = true
/// use_usefulness = true
/// report = "out.txt"
/// predictions_csv = "predictions.csv"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Only predict classes with no declared descendant.
    pub leaf_only: bool,
    /// Weight class scores by hierarchy usefulness.
    pub use_usefulness: bool,
    pub report: Option<PathBuf>,
    pub predictions_csv: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| BayesError::Config(err.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BayesError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
