use crate::config::settings::Settings;
use crate::core::{exporter, expander, input, normalizer};
use crate::domain::model::{ExtractResult, FlightRecord, RouteJob, TransformResult};
use crate::domain::ports::{Pipeline, Retriever, RunReporter, Storage};
use crate::utils::error::Result;
use crate::utils::logger::TracingReporter;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

pub struct FlightPipeline<S: Storage, R: Retriever> {
    storage: S,
    retriever: R,
    settings: Settings,
    reporter: Arc<dyn RunReporter>,
}

impl<S: Storage, R: Retriever> FlightPipeline<S, R> {
    pub fn new(storage: S, retriever: R, settings: Settings) -> Self {
        Self::with_reporter(storage, retriever, settings, Arc::new(TracingReporter))
    }

    pub fn with_reporter(
        storage: S,
        retriever: R,
        settings: Settings,
        reporter: Arc<dyn RunReporter>,
    ) -> Self {
        Self {
            storage,
            retriever,
            settings,
            reporter,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// validate -> expand -> fetch -> normalize -> truncate，不寫檔
    ///
    /// Fails only when the input itself is bad; lost routes and responses
    /// are reported and counted in the result.
    pub async fn run(&self, raw_jobs: &[serde_json::Value]) -> Result<TransformResult> {
        let jobs = input::validate_jobs(raw_jobs)?;
        let extracted = self.extract(&jobs).await?;
        self.transform(extracted).await
    }
}

fn truncate(records: &mut Vec<FlightRecord>, limit: Option<usize>) -> Option<usize> {
    match limit {
        Some(limit) if records.len() > limit => {
            let before = records.len();
            records.truncate(limit);
            Some(before)
        }
        _ => None,
    }
}

#[async_trait::async_trait]
impl<S: Storage, R: Retriever> Pipeline for FlightPipeline<S, R> {
    async fn extract(&self, jobs: &[RouteJob]) -> Result<ExtractResult> {
        self.reporter.stage("Building concrete route requests");
        let requests = expander::expand(jobs);

        self.reporter.stage(&format!(
            "Fetching {} routes (offline_mode={})",
            requests.len(),
            self.settings.offline_mode
        ));

        let retriever = &self.retriever;
        let settings = &self.settings;
        let concurrency = settings.concurrent_requests.max(1);

        // buffered() 會依原本的請求順序產出結果，與完成順序無關
        let fetches: Vec<_> = requests
            .iter()
            .map(|request| retriever.fetch(request, settings))
            .collect();
        let outcomes: Vec<_> = stream::iter(fetches).buffered(concurrency).collect().await;

        let mut result = ExtractResult {
            requested: requests.len(),
            ..ExtractResult::default()
        };

        for (request, outcome) in requests.iter().zip(outcomes) {
            match outcome {
                Ok(response) => result.responses.push(response),
                Err(e) => {
                    self.reporter.route_failed(request, &e);
                    result.failed.push(request.clone());
                }
            }
        }

        Ok(result)
    }

    async fn transform(&self, extracted: ExtractResult) -> Result<TransformResult> {
        self.reporter.stage(&format!(
            "Parsing {} raw responses",
            extracted.responses.len()
        ));

        let mut result = TransformResult::default();

        for response in &extracted.responses {
            match normalizer::normalize(response) {
                Ok(records) => result.records.extend(records),
                Err(e) => {
                    self.reporter.response_skipped(&response.meta, &e);
                    result.skipped_responses += 1;
                }
            }
        }

        result.truncated_from = truncate(&mut result.records, self.settings.result_limit());
        if let Some(before) = result.truncated_from {
            tracing::debug!(
                "Truncated {} records to max_results={}",
                before,
                result.records.len()
            );
        }

        Ok(result)
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let output_path = self.settings.output_path.clone();
        let format = exporter::ExportFormat::from_path(&output_path);

        self.reporter.stage(&format!(
            "Writing {} records to {}",
            result.records.len(),
            output_path
        ));

        let data = exporter::render(&result.records, format)?;
        tracing::debug!("Writing report ({} bytes) to storage", data.len());
        self.storage.write_file(&output_path, &data).await?;

        Ok(output_path)
    }
}
