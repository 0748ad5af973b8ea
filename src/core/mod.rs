pub mod etl;
pub mod expander;
pub mod exporter;
pub mod input;
pub mod normalizer;
pub mod pipeline;
pub mod retriever;

pub use crate::domain::model::{ExtractResult, FlightRecord, RouteRequest, TransformResult};
pub use crate::domain::ports::{Pipeline, Retriever, RunReporter, Storage};
pub use crate::utils::error::Result;
