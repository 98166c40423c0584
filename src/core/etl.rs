use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    /// Extract, transform, load. Returns where the output was written.
    pub async fn run(&self) -> Result<String> {
        let mut monitor = PhaseMonitor::new(self.monitor_enabled);
        tracing::info!("Starting SLCSP ETL process...");

        // Extract
        tracing::info!("Reading input files...");
        let inputs = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} plans, {} ZIP mappings, {} target ZIP codes",
            inputs.plans.len(),
            inputs.zips.len(),
            inputs.targets.len()
        );
        monitor.mark("Extract");

        // Transform
        tracing::info!("Processing data...");
        let result = self.pipeline.transform(inputs).await?;
        tracing::info!(
            "Computed {} rows ({} resolved, {} blank)",
            result.summary.total,
            result.summary.resolved,
            result.summary.blank()
        );
        monitor.mark("Transform");

        // Load
        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(result).await?;
        monitor.mark("Load");

        monitor.finish();
        tracing::info!("Process completed successfully.");
        Ok(output_path)
    }
}
