//! Readers turning a CSV file or a JSON endpoint into postings.

use crate::domain::model::{FieldNames, Posting};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Parses CSV bytes with a header row.
///
/// Empty description cells are read as missing.
pub fn read_csv_postings(
    data: &[u8],
    fields: &FieldNames,
    max_records: Option<usize>,
) -> Result<Vec<Posting>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let description_idx = column(&fields.description).ok_or_else(|| EtlError::ValidationError {
        message: format!("CSV has no '{}' column", fields.description),
    })?;
    let id_idx = match &fields.id {
        Some(name) => Some(column(name).ok_or_else(|| EtlError::ValidationError {
            message: format!("CSV has no '{}' column", name),
        })?),
        None => None,
    };

    let mut postings = Vec::new();
    for (row, record) in reader.records().enumerate() {
        if max_records.is_some_and(|max| postings.len() >= max) {
            break;
        }
        let record = record?;
        let id = id_idx
            .and_then(|i| record.get(i))
            .map(str::to_string)
            .unwrap_or_else(|| (row + 1).to_string());
        let description = record
            .get(description_idx)
            .filter(|d| !d.trim().is_empty())
            .map(str::to_string);
        postings.push(Posting { id, description });
    }

    tracing::debug!("Read {} postings from CSV", postings.len());
    Ok(postings)
}

/// Accepts a JSON array of objects or an object with a `results` array.
pub fn postings_from_json(
    body: Value,
    fields: &FieldNames,
    max_records: Option<usize>,
) -> Result<Vec<Posting>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EtlError::ValidationError {
                    message: "expected an array or an object with a 'results' array".to_string(),
                })
            }
        },
        other => {
            return Err(EtlError::ValidationError {
                message: format!("unexpected JSON payload: {}", other),
            })
        }
    };

    let limit = max_records.unwrap_or(usize::MAX);
    let postings = items
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, item)| {
            let id = fields
                .id
                .as_deref()
                .and_then(|name| item.get(name))
                .and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| (index + 1).to_string());
            let description = item
                .get(&fields.description)
                .and_then(Value::as_str)
                .map(str::to_string);
            Posting { id, description }
        })
        .collect();

    Ok(postings)
}

pub async fn fetch_api_postings(
    client: &Client,
    endpoint: &str,
    headers: &HashMap<String, String>,
    timeout_seconds: Option<u64>,
    fields: &FieldNames,
    max_records: Option<usize>,
) -> Result<Vec<Posting>> {
    tracing::debug!("Making API request to: {}", endpoint);

    let mut request = client.get(endpoint);
    for (name, value) in headers {
        request = request.header(name, value);
    }
    if let Some(seconds) = timeout_seconds {
        request = request.timeout(Duration::from_secs(seconds));
    }

    let response = request.send().await?;
    tracing::debug!("API response status: {}", response.status());

    let body: Value = response.error_for_status()?.json().await?;
    let postings = postings_from_json(body, fields, max_records)?;
    tracing::debug!("Read {} postings from API", postings.len());
    Ok(postings)
}
