use crate::domain::model::{FieldNames, OutputFormat, Posting, SourceSpec, TransformResult};
use crate::salary::ExtractorConfig;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// `None` when no posting source was configured.
    fn source(&self) -> Option<SourceSpec>;
    fn field_names(&self) -> FieldNames;
    fn max_records(&self) -> Option<usize>;
    fn workers(&self) -> usize;
    fn extractor_config(&self) -> ExtractorConfig;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    /// Archive file name when outputs are bundled into one ZIP.
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Posting>>;
    async fn transform(&self, postings: Vec<Posting>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
