//! The orchestrator: translate → score → persist per row, then
//! aggregate and report.

use futures_util::future;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::client::CapabilityClient;
use crate::error::{PipelineError, Result};
use crate::input::InputReader;
use crate::report::write_report;
use crate::store::ActivityStore;

/// Drives input rows through the two capabilities and the store, then
/// emits the aggregated report.
///
/// The orchestrator holds no state across rows beyond the store handle
/// and the input cursor. A hard failure on any row aborts the run; rows
/// are never skipped, so a finished report only reflects complete runs.
#[derive(Debug)]
pub struct ModerationPipeline {
    translator: CapabilityClient,
    scorer: CapabilityClient,
    store: ActivityStore,
    jobs: usize,
}

impl ModerationPipeline {
    pub fn new(
        translator: CapabilityClient,
        scorer: CapabilityClient,
        store: ActivityStore,
    ) -> Self {
        Self {
            translator,
            scorer,
            store,
            jobs: 1,
        }
    }

    /// Process up to `jobs` rows concurrently. With the default of 1,
    /// each row's full translate → score → store cycle completes before
    /// the next row starts.
    ///
    /// Appends stay independently atomic either way, and aggregation
    /// only starts once every in-flight row has landed.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Run the whole pipeline: validate paths, reset the store, stream
    /// rows, aggregate, write the report.
    pub async fn process(&self, input_path: &str, output_path: &str) -> Result<()> {
        // Pre-flight: both paths must be given before any I/O happens.
        if input_path.is_empty() || output_path.is_empty() {
            return Err(PipelineError::MissingFileArgument);
        }

        self.store.initialize()?;
        let reader = InputReader::open(input_path)?;

        info!(input = input_path, jobs = self.jobs, "processing rows");
        stream::iter(reader)
            .map(|row| {
                let translator = self.translator.clone();
                let scorer = self.scorer.clone();
                let store = self.store.clone();
                async move {
                    let record = row?;
                    let translated = translator.translate(&record.raw_message).await?;
                    let score = scorer.score(&translated).await?;
                    debug!(user_id = record.user_id, score, "row processed");
                    store.append(record.user_id, &translated, score)?;
                    Ok::<(), PipelineError>(())
                }
            })
            .buffered(self.jobs)
            .try_for_each(|()| future::ready(Ok(())))
            .await?;

        let stats = self.store.aggregate()?;
        info!(users = stats.len(), output = output_path, "writing report");
        write_report(output_path, &stats)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn pipeline_with_db(dir: &TempDir) -> ModerationPipeline {
        let timeout = Duration::from_secs(1);
        ModerationPipeline::new(
            CapabilityClient::new("http://127.0.0.1:1", timeout).unwrap(),
            CapabilityClient::new("http://127.0.0.1:1", timeout).unwrap(),
            ActivityStore::new(dir.path().join("activity.sqlite3")),
        )
    }

    #[tokio::test]
    async fn empty_input_path_fails_before_any_io() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_with_db(&dir);

        let err = pipeline.process("", "output.csv").await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingFileArgument));
        // Validation fails before the store is touched.
        assert!(!dir.path().join("activity.sqlite3").exists());
    }

    #[tokio::test]
    async fn empty_output_path_fails_before_any_io() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_with_db(&dir);

        let err = pipeline.process("input.csv", "").await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingFileArgument));
        assert!(!dir.path().join("activity.sqlite3").exists());
    }

    #[tokio::test]
    async fn missing_input_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_with_db(&dir);

        let output = dir.path().join("output.csv");
        let err = pipeline
            .process("/no/such/input.csv", output.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InputUnavailable { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn jobs_is_clamped_to_at_least_one() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_with_db(&dir).with_jobs(0);
        assert_eq!(pipeline.jobs, 1);
    }
}
