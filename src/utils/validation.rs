use crate::domain::model::SourceSpec;
use crate::salary::ExtractorConfig;
use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const KEYWORD_WINDOW_RANGE: (usize, usize) = (1, 10);
pub const SALARY_WORD_WINDOW_RANGE: (usize, usize) = (1, 4);

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, path: &str, allowed: &[&str]) -> Result<()> {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed.join(", ")
            ),
        )),
        None => Err(invalid(
            field_name,
            path,
            "File has no extension or invalid filename",
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// `prefix` names the config section, e.g. `extract`.
pub fn validate_extractor_config(prefix: &str, config: &ExtractorConfig) -> Result<()> {
    let (min, max) = KEYWORD_WINDOW_RANGE;
    validate_range(
        &format!("{prefix}.keyword_window"),
        config.keyword_window,
        min,
        max,
    )?;
    let (min, max) = SALARY_WORD_WINDOW_RANGE;
    validate_range(
        &format!("{prefix}.salary_word_window"),
        config.salary_word_window,
        min,
        max,
    )
}

pub fn validate_source(field_name: &str, source: &SourceSpec) -> Result<()> {
    match source {
        SourceSpec::Csv { path } => {
            validate_path(field_name, path)?;
            validate_file_extension(field_name, path, &["csv"])
        }
        SourceSpec::Api { endpoint, .. } => validate_url(field_name, endpoint),
    }
}
