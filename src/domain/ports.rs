use crate::config::settings::Settings;
use crate::domain::model::{
    ExtractResult, ResponseMeta, RetrievalResponse, RouteJob, RouteRequest, TransformResult,
};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of flight options for a single route.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn fetch(&self, request: &RouteRequest, settings: &Settings) -> Result<RetrievalResponse>;
}

/// Receives per-run diagnostics. Injected into the pipeline instead of
/// relying on process-wide logging state.
pub trait RunReporter: Send + Sync {
    fn stage(&self, message: &str);
    fn route_failed(&self, request: &RouteRequest, error: &EtlError);
    fn response_skipped(&self, meta: &ResponseMeta, error: &EtlError);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, jobs: &[RouteJob]) -> Result<ExtractResult>;
    async fn transform(&self, extracted: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
