pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, MemoryStorage};
pub use app::pipelines::SlcspPipeline;
pub use config::toml_config::TomlConfig;
pub use crate::core::{compute, etl::EtlEngine};
pub use domain::model::{
    CalculationResult, PlanRecord, RateAreaKey, ResultRow, RunSummary, SlcspInputs, SlcspOutcome,
    TargetRecord, ZipRecord,
};
pub use utils::error::{EtlError, Result};
