pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::core::ConfigProvider;
    use crate::domain::model::{FieldNames, OutputFormat, SourceSpec};
    use crate::salary::ExtractorConfig;
    use crate::utils::error::{EtlError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "salary-etl")]
    #[command(about = "Extract salary signals from job posting descriptions")]
    pub struct CliConfig {
        /// CSV file with one posting per row
        #[arg(long, conflicts_with_all = ["api_endpoint", "text"])]
        pub input: Option<String>,

        /// HTTP endpoint returning postings as JSON
        #[arg(long, conflicts_with = "text")]
        pub api_endpoint: Option<String>,

        /// Analyse one description and print its mentions as JSON
        #[arg(long)]
        pub text: Option<String>,

        #[arg(long)]
        pub id_column: Option<String>,

        #[arg(long, default_value = "description")]
        pub description_column: String,

        #[arg(long)]
        pub max_records: Option<usize>,

        #[arg(long, default_value_t = 4)]
        pub workers: usize,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_enum, value_delimiter = ',', default_values_t = [OutputFormat::Csv, OutputFormat::Json])]
        pub formats: Vec<OutputFormat>,

        /// Bundle all outputs into one ZIP archive
        #[arg(long)]
        pub zip: bool,

        #[arg(long, default_value = "salary_output.zip")]
        pub zip_name: String,

        #[arg(long, default_value_t = ExtractorConfig::DEFAULT_KEYWORD_WINDOW)]
        pub keyword_window: usize,

        #[arg(long, default_value_t = ExtractorConfig::DEFAULT_SALARY_WORD_WINDOW)]
        pub salary_word_window: usize,

        #[arg(long, help = "Log CPU and memory usage between phases")]
        pub monitor: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn source(&self) -> Option<SourceSpec> {
            match (&self.input, &self.api_endpoint) {
                (Some(path), _) => Some(SourceSpec::Csv { path: path.clone() }),
                (None, Some(endpoint)) => Some(SourceSpec::Api {
                    endpoint: endpoint.clone(),
                    headers: HashMap::new(),
                    timeout_seconds: None,
                }),
                (None, None) => None,
            }
        }

        fn field_names(&self) -> FieldNames {
            FieldNames {
                id: self.id_column.clone(),
                description: self.description_column.clone(),
            }
        }

        fn max_records(&self) -> Option<usize> {
            self.max_records
        }

        fn workers(&self) -> usize {
            self.workers
        }

        fn extractor_config(&self) -> ExtractorConfig {
            ExtractorConfig {
                keyword_window: self.keyword_window,
                salary_word_window: self.salary_word_window,
            }
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.formats
        }

        fn archive_name(&self) -> Option<&str> {
            self.zip.then_some(self.zip_name.as_str())
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_extractor_config("cli", &self.extractor_config())?;
            if self.text.is_some() {
                return Ok(());
            }

            let source = self.source().ok_or_else(|| EtlError::MissingConfigError {
                field: "--input or --api-endpoint".to_string(),
            })?;
            validation::validate_source("input", &source)?;
            validation::validate_non_empty_string("description_column", &self.description_column)?;
            validation::validate_positive_number("workers", self.workers, 1)?;
            if let Some(max) = self.max_records {
                validation::validate_positive_number("max_records", max, 1)?;
            }
            validation::validate_path("output_path", &self.output_path)?;
            if self.zip {
                validation::validate_file_extension("zip_name", &self.zip_name, &["zip"])?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["salary-etl", "--input", "postings.csv"]);
            assert_eq!(config.workers, 4);
            assert_eq!(config.formats, vec![OutputFormat::Csv, OutputFormat::Json]);
            assert_eq!(config.extractor_config(), ExtractorConfig::default());
            assert_eq!(config.archive_name(), None);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_api_source_and_formats() {
            let config = CliConfig::parse_from([
                "salary-etl",
                "--api-endpoint",
                "https://jobs.example.com/api/postings",
                "--formats",
                "tsv,json",
                "--zip",
            ]);
            assert!(matches!(config.source(), Some(SourceSpec::Api { .. })));
            assert_eq!(config.formats, vec![OutputFormat::Tsv, OutputFormat::Json]);
            assert_eq!(config.archive_name(), Some("salary_output.zip"));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_missing_source_is_rejected() {
            let config = CliConfig::parse_from(["salary-etl"]);
            assert!(matches!(
                config.validate(),
                Err(EtlError::MissingConfigError { .. })
            ));
        }

        #[test]
        fn test_text_mode_needs_no_source() {
            let config = CliConfig::parse_from(["salary-etl", "--text", "£9 per hour"]);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_window_out_of_range() {
            let config = CliConfig::parse_from([
                "salary-etl",
                "--input",
                "postings.csv",
                "--keyword-window",
                "12",
            ]);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_input_conflicts_with_text() {
            let parsed =
                CliConfig::try_parse_from(["salary-etl", "--input", "a.csv", "--text", "hello"]);
            assert!(parsed.is_err());
        }
    }
}
