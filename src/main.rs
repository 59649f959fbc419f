use anyhow::Context;
use clap::Parser;
use deckvision_core::{DraftContext, RecognizerKind, RecognizerSet, ReferenceDatabase};
use deckvision_cv::{RecognitionEngine, RecognizerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod report;

/// Recognize cards, hero classes and game states in screen captures
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// JSON configuration file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calibration ID, loaded from `<calibrations_path>/<ID>.json`
    #[arg(long, default_value = "default")]
    calibration: String,

    /// Only run these recognizers (e.g. draft_card_pick); all when omitted
    #[arg(long = "only", value_name = "KIND")]
    only: Vec<RecognizerKind>,

    /// Also report the highlighted draft slot
    #[arg(long)]
    bluest: bool,

    /// Frames to analyze, in session order
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RecognizerConfig::load(path)?,
        None => RecognizerConfig::default(),
    };

    let mut db = ReferenceDatabase::load(&config.paths.database_path)?;
    let extractor = config.features.build_extractor()?;
    let engine = RecognitionEngine::new(&config, &mut db, &cli.calibration, extractor)
        .context("Failed to initialize recognizer")?;

    let selection = if cli.only.is_empty() {
        RecognizerSet::all()
    } else {
        cli.only.iter().copied().collect()
    };

    let mut context = DraftContext::new();
    let mut reports = Vec::new();
    for frame in &cli.frames {
        let catalog = cli.bluest.then_some(&db as &dyn deckvision_core::CardCatalog);
        match report::analyze_frame(&engine, frame, selection, &mut context, catalog) {
            Ok(report) => reports.push(report),
            Err(e) => tracing::error!("Skipping {:?}: {:#}", frame, e),
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
