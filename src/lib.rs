pub mod config;
pub mod core;
pub mod domain;
pub mod salary;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{etl::EtlEngine, pipeline::SalaryPipeline};
pub use domain::model::{ExtractedRow, OutputFormat, Posting, RunSummary};
pub use salary::{Category, ExtractorConfig, SalaryExtractor, SalaryMention, SalaryRecord};
pub use utils::error::{EtlError, Result};
