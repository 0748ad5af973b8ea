use crate::core::input;
use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Run the whole job list end to end.
    ///
    /// `Err` means the run could not happen (bad input, unwritable output).
    /// A run that lost some routes still returns `Ok`; see
    /// [`RunSummary::is_partial`].
    pub async fn run(&self, raw_jobs: &[serde_json::Value]) -> Result<RunSummary> {
        tracing::info!("Validating {} route jobs", raw_jobs.len());
        let jobs = input::validate_jobs(raw_jobs)?;

        // Extract
        let extracted = self.pipeline.extract(&jobs).await?;
        let requested_routes = extracted.requested;
        let failed_routes = extracted.failed.len();
        tracing::info!(
            "Fetched {}/{} routes",
            requested_routes.saturating_sub(failed_routes),
            requested_routes
        );

        // Transform
        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!("Normalized {} records", transformed.records.len());

        // Load
        let output_path = self.pipeline.load(&transformed).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            requested_routes,
            failed_routes,
            skipped_responses: transformed.skipped_responses,
            records_written: transformed.records.len(),
            output_path,
        })
    }

    /// Parse a raw input document, then [`run`](Self::run).
    pub async fn run_from_bytes(&self, input_document: &[u8]) -> Result<RunSummary> {
        let raw_jobs = input::parse_jobs(input_document)?;
        self.run(&raw_jobs).await
    }
}
