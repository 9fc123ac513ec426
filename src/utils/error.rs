use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Io,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::TomlParseError(_)
            | EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::ValidationError { .. } | EtlError::CsvError(_) => ErrorSeverity::High,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            EtlError::TomlParseError(_)
            | EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check the endpoint URL and network connectivity, then retry".to_string()
            }
            EtlError::CsvError(_) => {
                "Make sure the input file is valid CSV with a header row".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the paths exist and the process can read and write them".to_string()
            }
            EtlError::ZipError(_) => "Check free disk space in the output directory".to_string(),
            EtlError::SerializationError(_) => {
                "The source returned malformed JSON; inspect the response body".to_string()
            }
            EtlError::TomlParseError(_) => {
                "Fix the TOML syntax in the configuration file".to_string()
            }
            EtlError::ConfigError { .. } | EtlError::MissingConfigError { .. } => {
                "Review the configuration; run with --help for the available options".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            EtlError::ProcessingError { .. } => {
                "Re-run with --verbose to see which step failed".to_string()
            }
            EtlError::ValidationError { .. } => {
                "Check that the source has the configured id and description fields".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch postings: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Data => format!("Input data problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Processing => format!("Extraction failed: {}", self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
