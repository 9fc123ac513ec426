use crate::core::ConfigProvider;
use crate::domain::model::{FieldNames, OutputFormat, SourceSpec};
use crate::salary::ExtractorConfig;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

const DEFAULT_WORKERS: usize = 4;
const DEFAULT_ARCHIVE_NAME: &str = "salary_output.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `csv` or `api`.
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub id_column: Option<String>,
    pub description_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub max_records: Option<usize>,
    pub workers: Option<usize>,
    pub keyword_window: Option<usize>,
    pub salary_word_window: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${NAME}` with the environment variable; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        let source = self.source_spec()?;
        validation::validate_source(&format!("source.{}", self.source_field()), &source)?;
        if let Some(column) = &self.source.description_column {
            validation::validate_non_empty_string("source.description_column", column)?;
        }

        if let Some(workers) = self.extract.workers {
            validation::validate_positive_number("extract.workers", workers, 1)?;
        }
        if let Some(max) = self.extract.max_records {
            validation::validate_positive_number("extract.max_records", max, 1)?;
        }
        validation::validate_extractor_config("extract", &self.extractor_config())?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        if let Some(archive) = self.archive_name() {
            validation::validate_file_extension("load.compression.filename", archive, &["zip"])?;
        }

        Ok(())
    }

    fn source_field(&self) -> &'static str {
        if self.source.r#type == "api" {
            "endpoint"
        } else {
            "path"
        }
    }

    /// The configured source, with the field its type requires.
    pub fn source_spec(&self) -> Result<SourceSpec> {
        match self.source.r#type.as_str() {
            "csv" => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                Ok(SourceSpec::Csv { path: path.clone() })
            }
            "api" => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                Ok(SourceSpec::Api {
                    endpoint: endpoint.clone(),
                    headers: self.source.headers.clone().unwrap_or_default(),
                    timeout_seconds: self.source.timeout_seconds,
                })
            }
            other => Err(EtlError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: "Supported source types: csv, api".to_string(),
            }),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    pub fn log_json(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_json)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> Option<SourceSpec> {
        self.source_spec().ok()
    }

    fn field_names(&self) -> FieldNames {
        let defaults = FieldNames::default();
        FieldNames {
            id: self.source.id_column.clone(),
            description: self
                .source
                .description_column
                .clone()
                .unwrap_or(defaults.description),
        }
    }

    fn max_records(&self) -> Option<usize> {
        self.extract.max_records
    }

    fn workers(&self) -> usize {
        self.extract.workers.unwrap_or(DEFAULT_WORKERS)
    }

    fn extractor_config(&self) -> ExtractorConfig {
        let defaults = ExtractorConfig::default();
        ExtractorConfig {
            keyword_window: self.extract.keyword_window.unwrap_or(defaults.keyword_window),
            salary_word_window: self
                .extract
                .salary_word_window
                .unwrap_or(defaults.salary_word_window),
        }
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
