//! Sequential report workflow
//!
//! One run walks six stages in order: read both source documents, budget
//! the text that goes to the model, extract structured areas, merge and
//! cross-check them, draft the narrative, and render the final document.
//! Cancellation is checked between stages; an in-flight model call is not
//! interrupted, but no further stage starts once the token trips.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::render::ReportRenderer;
use crate::source::DocumentSource;
use ddr_domain::{CancelToken, MergedRecord, TextGenerator};
use ddr_extract::{ExtractError, Extractor, TextChunker};
use ddr_merge::{dedup_findings, detect_conflicts, merge, validate_completion};
use ddr_report::ReportDrafter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Sources shorter than this are probably scans with no text layer
const MIN_SOURCE_CHARS: usize = 50;

/// Marker appended to source text cut down to the prompt budget
const TRUNCATION_MARKER: &str = "\n[...truncated...]";

/// Outcome of a pipeline run
#[derive(Debug)]
pub enum RunOutcome {
    /// The run finished and the report was written
    Completed(RunReport),
    /// The run stopped early because cancellation was requested
    Cancelled,
}

/// Artifacts of a completed run
#[derive(Debug)]
pub struct RunReport {
    /// Where the rendered report was written
    pub output_path: PathBuf,
    /// The merged structured record behind the narrative
    pub merged: MergedRecord,
    /// The drafted narrative text
    pub narrative: String,
    /// True when source text was cut down to fit the prompt budget
    pub truncated: bool,
}

/// The end-to-end diagnostic report pipeline
pub struct Pipeline<L, S, R>
where
    L: TextGenerator + Send + Sync + 'static,
    S: DocumentSource,
    R: ReportRenderer,
{
    extractor: Extractor<L>,
    drafter: ReportDrafter<L>,
    source: S,
    renderer: R,
    config: PipelineConfig,
}

impl<L, S, R> Pipeline<L, S, R>
where
    L: TextGenerator + Send + Sync + 'static,
    S: DocumentSource,
    R: ReportRenderer,
{
    /// Create a pipeline over a shared model provider
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(
        provider: Arc<L>,
        source: S,
        renderer: R,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            extractor: Extractor::new(Arc::clone(&provider), config.extractor.clone()),
            drafter: ReportDrafter::new(provider, config.drafter.clone()),
            source,
            renderer,
            config,
        })
    }

    /// Run the full workflow over one inspection report and one thermal
    /// imaging report
    ///
    /// Stops cleanly with [`RunOutcome::Cancelled`] when the token trips
    /// between stages; any partial model output is discarded.
    pub async fn run(
        &self,
        inspection_path: &Path,
        thermal_path: &Path,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, PipelineError> {
        info!(
            "Starting report run: inspection={}, thermal={}",
            inspection_path.display(),
            thermal_path.display()
        );

        let inspection_text = self.source.extract_text(inspection_path)?;
        let thermal_text = self.source.extract_text(thermal_path)?;
        if cancel.is_cancelled() {
            return Ok(RunOutcome::Cancelled);
        }

        for (label, text) in [("inspection", &inspection_text), ("thermal", &thermal_text)] {
            if text.trim().chars().count() < MIN_SOURCE_CHARS {
                warn!(
                    "The {} document yielded very little text ({} chars); \
                     it may be a scan without a text layer",
                    label,
                    text.trim().chars().count()
                );
            }
        }

        let (inspection_budgeted, inspection_cut) = self.budget_source(&inspection_text);
        let (thermal_budgeted, thermal_cut) = self.budget_source(&thermal_text);
        let truncated = inspection_cut || thermal_cut;
        if cancel.is_cancelled() {
            return Ok(RunOutcome::Cancelled);
        }

        let extracted = match self
            .extractor
            .extract(&inspection_budgeted, &thermal_budgeted, cancel)
            .await
        {
            Ok(record) => record,
            Err(ExtractError::Cancelled) => return Ok(RunOutcome::Cancelled),
            Err(e) => return Err(e.into()),
        };
        info!("Extraction produced {} areas", extracted.areas.len());
        if cancel.is_cancelled() {
            return Ok(RunOutcome::Cancelled);
        }

        let mut merged = merge(&[extracted]);
        for area in &mut merged.areas {
            let mut conflicts = area.conflicts.clone();
            conflicts.extend(detect_conflicts(area));
            area.conflicts = dedup_findings(&conflicts);
        }

        let (complete, problems) = validate_completion(&merged);
        if !complete {
            for problem in &problems {
                warn!("Completeness check: {}", problem);
            }
        }
        if cancel.is_cancelled() {
            return Ok(RunOutcome::Cancelled);
        }

        let narrative = self.drafter.draft(&merged).await?;
        if cancel.is_cancelled() {
            return Ok(RunOutcome::Cancelled);
        }

        let output_path = self.renderer.render(&narrative, &merged)?;
        info!("Report run finished: {}", output_path.display());

        Ok(RunOutcome::Completed(RunReport {
            output_path,
            merged,
            narrative,
            truncated,
        }))
    }

    /// Cut a source document down to the per-run model budget
    ///
    /// Only the first `max_chunks_per_source` chunks are kept, and the
    /// combined text is hard-capped at `max_prompt_chars` characters.
    /// Returns the budgeted text and whether anything was dropped.
    fn budget_source(&self, text: &str) -> (String, bool) {
        let chunker = TextChunker::new(
            self.config.extractor.chunk_size,
            self.config.extractor.chunk_overlap,
        );
        let chunks = chunker.split(text);
        let kept = chunks.len().min(self.config.max_chunks_per_source);
        let mut combined = chunks[..kept].join("\n\n");
        let mut truncated = kept < chunks.len();

        let char_count = combined.chars().count();
        if char_count > self.config.max_prompt_chars {
            let cut: String = combined.chars().take(self.config.max_prompt_chars).collect();
            combined = cut + TRUNCATION_MARKER;
            truncated = true;
        }

        if truncated {
            warn!(
                "Source text reduced from {} to {} chars to fit the model budget",
                text.chars().count(),
                combined.chars().count()
            );
        }
        (combined, truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextFileRenderer;
    use crate::source::PlainTextSource;
    use ddr_llm::{LlmError, MockProvider};
    use std::fs;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const HALL_PAYLOAD: &str = r#"{"areas": [{
        "area_name": "Hall",
        "inspection_findings": ["Dampness along the skirting"],
        "thermal_findings": ["Cold spot on the north wall"],
        "conflicts": [],
        "missing_info": []
    }]}"#;

    fn source_files() -> (NamedTempFile, NamedTempFile) {
        let mut inspection = NamedTempFile::new().unwrap();
        write!(
            inspection,
            "Visual inspection of the hall found dampness along the skirting \
             boards and staining consistent with long-term moisture ingress."
        )
        .unwrap();
        let mut thermal = NamedTempFile::new().unwrap();
        write!(
            thermal,
            "Thermal imaging of the hall shows a pronounced cold spot on the \
             north wall consistent with evaporative cooling from trapped moisture."
        )
        .unwrap();
        (inspection, thermal)
    }

    fn pipeline(
        provider: MockProvider,
        output: &Path,
        config: PipelineConfig,
    ) -> Pipeline<MockProvider, PlainTextSource, TextFileRenderer> {
        Pipeline::new(
            Arc::new(provider),
            PlainTextSource::default(),
            TextFileRenderer::new(output),
            config,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_run_writes_report() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");
        let (inspection, thermal) = source_files();

        let provider = MockProvider::new("unused");
        provider.push_response(HALL_PAYLOAD);
        provider.push_response("PROPERTY ISSUE SUMMARY\nDamp ingress in the hall.");

        let outcome = pipeline(provider.clone(), &output, PipelineConfig::default())
            .run(inspection.path(), thermal.path(), &CancelToken::new())
            .await
            .unwrap();

        let report = match outcome {
            RunOutcome::Completed(report) => report,
            RunOutcome::Cancelled => panic!("Run should complete"),
        };
        assert_eq!(report.output_path, output);
        assert_eq!(report.merged.areas.len(), 1);
        assert_eq!(report.merged.areas[0].area_name, "Hall");
        assert!(!report.truncated);
        // One extraction call plus one drafting call.
        assert_eq!(provider.call_count(), 2);

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("PROPERTY ISSUE SUMMARY"));
        assert!(content.contains("Area: Hall"));
        assert!(content.contains("  - Dampness along the skirting"));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_stops_before_any_call() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");
        let (inspection, thermal) = source_files();

        let provider = MockProvider::new("unused");
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = pipeline(provider.clone(), &output, PipelineConfig::default())
            .run(inspection.path(), thermal.path(), &cancel)
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Cancelled));
        assert_eq!(provider.call_count(), 0);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_source_fails_before_model() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");
        let (_, thermal) = source_files();

        let provider = MockProvider::new("unused");
        let err = pipeline(provider.clone(), &output, PipelineConfig::default())
            .run(Path::new("/nonexistent/report.txt"), thermal.path(), &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Source(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extraction_rate_limit_aborts_run() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");
        let (inspection, thermal) = source_files();

        let provider = MockProvider::new("unused");
        provider.push_error(LlmError::RateLimited("free tier exceeded".to_string()));

        let err = pipeline(provider.clone(), &output, PipelineConfig::default())
            .run(inspection.path(), thermal.path(), &CancelToken::new())
            .await
            .unwrap_err();

        assert!(err.is_rate_limited());
        assert_eq!(provider.call_count(), 1);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_long_source_is_budgeted_and_flagged() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");

        let mut inspection = NamedTempFile::new().unwrap();
        // Long enough to exceed two 4000-char chunks.
        let body = "Dampness observed near the window frame in the hall. ".repeat(400);
        write!(inspection, "{}", body).unwrap();
        let (_, thermal) = source_files();

        let provider = MockProvider::new("unused");
        provider.push_response(HALL_PAYLOAD);
        provider.push_response("narrative");

        let outcome = pipeline(provider.clone(), &output, PipelineConfig::default())
            .run(inspection.path(), thermal.path(), &CancelToken::new())
            .await
            .unwrap();

        let report = match outcome {
            RunOutcome::Completed(report) => report,
            RunOutcome::Cancelled => panic!("Run should complete"),
        };
        assert!(report.truncated);

        // The extraction prompt must respect the per-source cap.
        let prompt = provider.prompts()[0].clone();
        assert!(prompt.chars().count() < 2 * (12_000 + 200) + 6_000);
    }

    #[tokio::test]
    async fn test_conflict_scan_augments_merged_record() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");
        let (inspection, thermal) = source_files();

        let provider = MockProvider::new("unused");
        provider.push_response(
            r#"{"areas": [{
                "area_name": "Bedroom",
                "inspection_findings": ["Wall is dry to the touch"],
                "thermal_findings": ["Moisture signature behind plaster"],
                "conflicts": [],
                "missing_info": []
            }]}"#,
        );
        provider.push_response("narrative");

        let outcome = pipeline(provider, &output, PipelineConfig::default())
            .run(inspection.path(), thermal.path(), &CancelToken::new())
            .await
            .unwrap();

        let report = match outcome {
            RunOutcome::Completed(report) => report,
            RunOutcome::Cancelled => panic!("Run should complete"),
        };
        let bedroom = &report.merged.areas[0];
        assert!(bedroom
            .conflicts
            .iter()
            .any(|c| c.contains("moisture") && c.contains("dry")));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_at_construction() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ddr.txt");

        let mut config = PipelineConfig::default();
        config.max_prompt_chars = 0;
        let result = Pipeline::new(
            Arc::new(MockProvider::new("unused")),
            PlainTextSource::default(),
            TextFileRenderer::new(&output),
            config,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
