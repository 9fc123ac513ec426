use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting salary extraction run");

        let postings = self.pipeline.extract().await?;
        tracing::info!("Extracted {} postings", postings.len());
        self.monitor.log_phase("extract", postings.len());

        let result = self.pipeline.transform(postings).await?;
        tracing::info!(
            "Processed {} postings ({} skipped without description)",
            result.rows.len(),
            result.skipped.len()
        );
        self.monitor.log_phase("transform", result.total());

        let processed = result.total();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("load", processed);
        self.monitor.log_final();

        Ok(output_path)
    }
}
