use crate::core::output::{self, OutputFile};
use crate::core::source;
use crate::core::{ConfigProvider, Pipeline, Posting, Storage, TransformResult};
use crate::domain::model::{ExtractedPosting, ExtractedRow, RunSummary, SourceSpec};
use crate::salary::{SalaryExtractor, SalaryRecord};
use crate::utils::error::{EtlError, Result};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Reads postings, runs the salary extractor over them and writes the results.
pub struct SalaryPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    extractor: Arc<SalaryExtractor>,
}

impl<S: Storage, C: ConfigProvider> SalaryPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let extractor = Arc::new(SalaryExtractor::new(config.extractor_config()));
        Self {
            storage,
            config,
            client: Client::new(),
            extractor,
        }
    }

    /// Runs `postings` through the extractor on blocking tasks, one chunk per worker.
    async fn extract_parallel(
        &self,
        postings: Vec<(String, String)>,
    ) -> Result<Vec<(String, SalaryRecord)>> {
        if postings.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.config.workers().max(1);
        let chunk_size = postings.len().div_ceil(workers);
        let mut tasks = JoinSet::new();

        for (index, chunk) in postings.chunks(chunk_size).enumerate() {
            let chunk = chunk.to_vec();
            let extractor = Arc::clone(&self.extractor);
            tasks.spawn_blocking(move || {
                let records: Vec<(String, SalaryRecord)> = chunk
                    .into_iter()
                    .map(|(id, text)| {
                        let record = extractor.extract(&text);
                        (id, record)
                    })
                    .collect();
                (index, records)
            });
        }

        let mut parts = Vec::with_capacity(workers);
        while let Some(joined) = tasks.join_next().await {
            let part = joined.map_err(|e| EtlError::ProcessingError {
                message: format!("extraction worker failed: {}", e),
            })?;
            parts.push(part);
        }
        parts.sort_by_key(|(index, _)| *index);

        Ok(parts.into_iter().flat_map(|(_, records)| records).collect())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SalaryPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Posting>> {
        let spec = self.config.source().ok_or_else(|| EtlError::MissingConfigError {
            field: "source".to_string(),
        })?;
        let fields = self.config.field_names();
        let max_records = self.config.max_records();

        match spec {
            SourceSpec::Csv { path } => {
                tracing::debug!("Reading postings from {}", path);
                let data = tokio::fs::read(&path).await?;
                source::read_csv_postings(&data, &fields, max_records)
            }
            SourceSpec::Api {
                endpoint,
                headers,
                timeout_seconds,
            } => {
                source::fetch_api_postings(
                    &self.client,
                    &endpoint,
                    &headers,
                    timeout_seconds,
                    &fields,
                    max_records,
                )
                .await
            }
        }
    }

    async fn transform(&self, postings: Vec<Posting>) -> Result<TransformResult> {
        let started_at = Utc::now();
        let mut skipped = Vec::new();
        let mut usable = Vec::with_capacity(postings.len());

        for posting in postings {
            match posting.description {
                Some(text) => usable.push((posting.id, text)),
                None => {
                    tracing::warn!("Skipping posting {}: no description", posting.id);
                    skipped.push(posting.id);
                }
            }
        }

        let extracted = self.extract_parallel(usable).await?;

        let mut rows = Vec::with_capacity(extracted.len());
        let mut records = Vec::with_capacity(extracted.len());
        for (id, record) in extracted {
            rows.push(ExtractedRow::from_record(id.clone(), &record));
            records.push(ExtractedPosting {
                id,
                mentions: record.mentions,
            });
        }

        tracing::debug!(
            "{} postings with salary signals out of {}",
            rows.iter().filter(|r| r.has_any_signal()).count(),
            rows.len()
        );

        Ok(TransformResult {
            rows,
            records,
            skipped,
            started_at,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut files: Vec<OutputFile> = Vec::new();
        for format in self.config.output_formats() {
            files.push(output::render(*format, &result.rows, &result.records)?);
        }
        let summary = RunSummary::from_result(&result, Utc::now());
        files.push(output::render_summary(&summary)?);

        let output_path = self.config.output_path();
        match self.config.archive_name() {
            Some(archive) => {
                tracing::debug!("Creating ZIP file with {} files", files.len());
                let zip_data = output::zip_files(&files)?;
                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.storage.write_file(archive, &zip_data).await?;
                Ok(format!("{}/{}", output_path, archive))
            }
            None => {
                for file in &files {
                    self.storage.write_file(&file.name, &file.data).await?;
                }
                Ok(output_path.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldNames, OutputFormat};
    use crate::salary::ExtractorConfig;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        source: Option<SourceSpec>,
        workers: usize,
        formats: Vec<OutputFormat>,
        archive: Option<String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                source: None,
                workers: 3,
                formats: vec![OutputFormat::Csv, OutputFormat::Json],
                archive: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source(&self) -> Option<SourceSpec> {
            self.source.clone()
        }

        fn field_names(&self) -> FieldNames {
            FieldNames::default()
        }

        fn max_records(&self) -> Option<usize> {
            None
        }

        fn workers(&self) -> usize {
            self.workers
        }

        fn extractor_config(&self) -> ExtractorConfig {
            ExtractorConfig::default()
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.formats
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }
    }

    fn posting(id: usize, description: Option<&str>) -> Posting {
        Posting {
            id: id.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_transform_keeps_input_order_across_workers() {
        let pipeline = SalaryPipeline::new(MockStorage::default(), MockConfig::new());
        let postings: Vec<Posting> = (1..=10)
            .map(|i| posting(i, Some(format!("£{} per hour", i + 8).as_str())))
            .collect();

        let result = pipeline.transform(postings).await.unwrap();

        let ids: Vec<String> = result.rows.iter().map(|r| r.id.clone()).collect();
        let expected: Vec<String> = (1..=10).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
        assert_eq!(result.rows[9].hourly_low, Some(18.0));
        assert_eq!(result.records.len(), 10);
    }

    #[tokio::test]
    async fn test_transform_skips_missing_descriptions() {
        let pipeline = SalaryPipeline::new(MockStorage::default(), MockConfig::new());
        let postings = vec![
            posting(1, Some("£30,000 per annum")),
            posting(2, None),
            posting(3, Some("")),
        ];

        let result = pipeline.transform(postings).await.unwrap();

        assert_eq!(result.skipped, vec!["2".to_string()]);
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows[0].has_annual);
        assert!(!result.rows[1].has_any_signal());
        assert_eq!(result.total(), 3);
    }

    #[tokio::test]
    async fn test_transform_empty_input() {
        let pipeline = SalaryPipeline::new(MockStorage::default(), MockConfig::new());
        let result = pipeline.transform(Vec::new()).await.unwrap();
        assert!(result.rows.is_empty());
        assert!(result.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_extract_without_source_is_config_error() {
        let pipeline = SalaryPipeline::new(MockStorage::default(), MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_each_format_and_summary() {
        let storage = MockStorage::default();
        let pipeline = SalaryPipeline::new(storage.clone(), MockConfig::new());
        let result = pipeline
            .transform(vec![posting(1, Some("£45k")), posting(2, None)])
            .await
            .unwrap();

        let path = pipeline.load(result).await.unwrap();
        assert_eq!(path, "test_output");

        assert!(storage.get_file("salary_signals.csv").await.is_some());
        assert!(storage.get_file("salary_signals.tsv").await.is_none());

        let json = storage.get_file("salary_signals.json").await.unwrap();
        let postings: Vec<ExtractedPosting> = serde_json::from_slice(&json).unwrap();
        assert_eq!(postings[0].mentions[0].span, "£45k");

        let summary = storage.get_file("summary.json").await.unwrap();
        let summary: RunSummary = serde_json::from_slice(&summary).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn test_load_bundles_zip() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new();
        config.archive = Some("salary_output.zip".to_string());
        let pipeline = SalaryPipeline::new(storage.clone(), config);

        let result = pipeline
            .transform(vec![posting(1, Some("Competitive salary"))])
            .await
            .unwrap();
        let path = pipeline.load(result).await.unwrap();

        assert_eq!(path, "test_output/salary_output.zip");
        let zip_data = storage.get_file("salary_output.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 3);
        assert!(storage.get_file("summary.json").await.is_none());
    }
}
