//! Per-frame recognition reports for the command line driver

use deckvision_core::{
    CardCatalog, DraftContext, Outcome, RecognitionResult, RecognizerKind, RecognizerSet,
};
use deckvision_cv::{utils::ImageUtils, RecognitionEngine, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything recognized in one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: PathBuf,
    pub results: Vec<ResultReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bluest_slot: Option<usize>,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultReport {
    pub recognizer: RecognizerKind,
    pub ids: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<Outcome>,
}

impl From<RecognitionResult> for ResultReport {
    fn from(result: RecognitionResult) -> Self {
        let outcomes = result
            .results
            .iter()
            .filter_map(|code| Outcome::from_code(result.source, *code))
            .collect();
        Self {
            recognizer: result.source,
            ids: result.results,
            outcomes,
        }
    }
}

/// Recognize one frame file, optionally running the draft slot heuristic too
pub fn analyze_frame(
    engine: &RecognitionEngine,
    path: &Path,
    selection: RecognizerSet,
    context: &mut DraftContext,
    bluest: Option<&dyn CardCatalog>,
) -> Result<FrameReport> {
    let start_time = Instant::now();
    let frame = ImageUtils::load(path)?;

    let results = engine.recognize(&frame, selection, context);
    let bluest_slot = bluest.and_then(|catalog| engine.pick_bluest(&frame, context, catalog));

    let report = FrameReport {
        frame: path.to_path_buf(),
        results: results.into_iter().map(ResultReport::from).collect(),
        bluest_slot,
        processing_time_ms: start_time.elapsed().as_millis() as u64,
    };

    tracing::info!(
        "{:?}: {} results in {}ms",
        path,
        report.results.len(),
        report.processing_time_ms
    );
    Ok(report)
}
