use crate::core::normalizer::utc_timestamp;
use crate::domain::model::FlightRecord;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// `.csv` 輸出平面 CSV，其餘一律為 JSON 報表
    pub fn from_path(path: &str) -> Self {
        let is_csv = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            ExportFormat::Csv
        } else {
            ExportFormat::Json
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub generated_at: String,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub meta: ReportMeta,
    pub data: &'a [FlightRecord],
}

impl<'a> Report<'a> {
    pub fn new(records: &'a [FlightRecord], generated_at: DateTime<Utc>) -> Self {
        Self {
            meta: ReportMeta {
                generated_at: utc_timestamp(generated_at),
                records: records.len(),
            },
            data: records,
        }
    }
}

/// Pretty JSON (2-space indent); non-ASCII text is written as-is.
pub fn render_json(records: &[FlightRecord], generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let report = Report::new(records, generated_at);
    Ok(serde_json::to_vec_pretty(&report)?)
}

pub fn render_csv(records: &[FlightRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    writer.into_inner().map_err(|e| e.into_error().into())
}

pub fn render(records: &[FlightRecord], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => render_json(records, Utc::now()),
        ExportFormat::Csv => render_csv(records),
    }
}

/// Write the report straight to `destination`, creating parent directories.
pub fn write(records: &[FlightRecord], destination: &Path) -> Result<()> {
    let format = ExportFormat::from_path(&destination.to_string_lossy());
    let bytes = render(records, format)?;

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(destination, bytes)?;

    tracing::debug!("Wrote {} records to {}", records.len(), destination.display());
    Ok(())
}
