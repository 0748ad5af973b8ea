use crate::domain::model::{ResponseMeta, RouteRequest};
use crate::domain::ports::RunReporter;
use crate::utils::error::EtlError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RUST_LOG 優先，其次沿用舊的 LOG_LEVEL 變數 (例如 `INFO`)
fn resolve_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        resolve_filter("flight_etl=debug,info")
    } else {
        resolve_filter("flight_etl=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger() {
    let filter = resolve_filter("flight_etl=info");

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// 預設的 reporter，把每次執行的事件轉成 tracing 事件
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn stage(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn route_failed(&self, request: &RouteRequest, error: &EtlError) {
        tracing::error!(
            origin = %request.origin,
            target = %request.target,
            depart = %request.depart,
            category = ?error.category(),
            "Failed to fetch route {}: {}",
            request,
            error
        );
    }

    fn response_skipped(&self, meta: &ResponseMeta, error: &EtlError) {
        tracing::error!(
            origin = %meta.origin,
            target = %meta.target,
            depart = %meta.depart,
            category = ?error.category(),
            "Failed to parse a response: {}",
            error
        );
    }
}
