pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, settings::Settings};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::{etl::EtlEngine, pipeline::FlightPipeline, retriever::SimulatedRetriever};
pub use utils::error::{EtlError, Result};
