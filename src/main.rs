use anyhow::{Context, Result};
use clap::Parser;
use hierarchical_bayes::{DatasetProfile, NaiveBayesClassifier, RunConfig, TestSet, TrainedModel};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Hierarchical naive Bayes classifier
#[derive(Parser, Debug)]
#[command(name = "hierarchical-bayes", version)]
struct Cli {
    /// Training file (attribute header followed by @data)
    #[arg(long)]
    train: PathBuf,

    /// Test file in the same format
    #[arg(long)]
    test: PathBuf,

    /// TOML file with run options; flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only predict classes with no declared descendant
    #[arg(long)]
    leaf_only: bool,

    /// Weight class scores by hierarchy usefulness
    #[arg(long)]
    usefulness: bool,

    /// Write the per-instance report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write predictions as CSV here
    #[arg(long)]
    predictions: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: String,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        config.leaf_only |= self.leaf_only;
        config.use_usefulness |= self.usefulness;
        if self.report.is_some() {
            config.report = self.report.clone();
        }
        if self.predictions.is_some() {
            config.predictions_csv = self.predictions.clone();
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = cli.run_config()?;

    let profile = DatasetProfile::from_paths(&cli.train, &cli.test)
        .context("profiling training and test files")?;
    let model = TrainedModel::from_path(
        &cli.train,
        profile.num_attributes,
        profile.num_training_examples,
        config.leaf_only,
    )
    .with_context(|| format!("loading training file {}", cli.train.display()))?;
    let test_set = TestSet::from_path(&cli.test, profile.num_test_examples, profile.num_attributes)
        .with_context(|| format!("loading test file {}", cli.test.display()))?;

    let evaluation = NaiveBayesClassifier::prepare(&model, config.use_usefulness).evaluate(&test_set);

    if let Some(path) = &config.report {
        hierarchical_bayes::report::write_report_file(&evaluation, path)
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    if let Some(path) = &config.predictions_csv {
        evaluation
            .write_predictions_csv(path)
            .with_context(|| format!("writing predictions {}", path.display()))?;
    }

    println!("hF = {}", evaluation.metrics.f_measure);

    Ok(())
}
