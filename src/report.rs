//! Writing classification results.

use crate::bayes::Evaluation;
use crate::error::{BayesError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one `Example <i> (<truth>) -> <predicted>` line per instance, then
/// `hP`, `hR` (as percentages) and `hF`.
///
/// The summary uses the min-depth precision, which divides the overlap by the
/// shallower of the predicted and true paths. The headline value returned by
/// a run stays the plain predicted-depth F.
pub fn write_report<W: Write + ?Sized>(evaluation: &Evaluation, writer: &mut W) -> Result<()> {
    for prediction in &evaluation.predictions {
        writeln!(
            writer,
            "Example {} ({}) -> {}",
            prediction.index, prediction.truth, prediction.predicted
        )?;
    }

    let metrics = &evaluation.metrics;
    writeln!(writer, "hP = {}", metrics.min_depth_precision * 100.0)?;
    writeln!(writer, "hR = {}", metrics.recall * 100.0)?;
    writeln!(writer, "hF = {}", metrics.min_depth_f_measure)?;
    writer.flush()?;

    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| BayesError::FileUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_report_file<P: AsRef<Path>>(evaluation: &Evaluation, path: P) -> Result<()> {
    let mut file = BufWriter::new(create_file(path.as_ref())?);
    write_report(evaluation, &mut file)
}

#[derive(Serialize)]
struct PredictionRow {
    id: usize,
    true_class: String,
    predicted_class: String,
}

/// Writes `id,true_class,predicted_class` rows.
pub fn write_predictions_csv<W: Write>(evaluation: &Evaluation, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for prediction in &evaluation.predictions {
        writer.serialize(PredictionRow {
            id: prediction.index,
            true_class: prediction.truth.to_string(),
            predicted_class: prediction.predicted.to_string(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

impl Evaluation {
    pub fn write_predictions_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_predictions_csv(self, create_file(path.as_ref())?)
    }
}
