use crate::app::csv_io::{read_records, write_results};
use crate::core::diagnostics::TracingSink;
use crate::core::{
    compute, CalculationResult, ConfigProvider, DiagnosticSink, Pipeline, SlcspInputs, Storage,
};
use crate::domain::model::{PlanRecord, TargetRecord, ZipRecord};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// 讀取三個 CSV、計算 SLCSP、寫出結果
pub struct SlcspPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) sink: Arc<dyn DiagnosticSink>,
}

impl<S: Storage, C: ConfigProvider> SlcspPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            sink: Arc::new(TracingSink),
        }
    }

    /// 替換診斷輸出 (測試時收集警告用)
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    async fn read_table<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        tracing::debug!("Reading {}", path);
        let data = self.storage.read_file(path).await?;
        read_records(&data, path)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SlcspPipeline<S, C> {
    async fn extract(&self) -> Result<SlcspInputs> {
        let plans: Vec<PlanRecord> = self.read_table(self.config.plans_path()).await?;
        let zips: Vec<ZipRecord> = self.read_table(self.config.zips_path()).await?;
        let targets: Vec<TargetRecord> = self.read_table(self.config.slcsp_path()).await?;

        Ok(SlcspInputs {
            plans,
            zips,
            targets,
        })
    }

    async fn transform(&self, inputs: SlcspInputs) -> Result<CalculationResult> {
        compute(&inputs, self.sink.as_ref())
    }

    async fn load(&self, result: CalculationResult) -> Result<String> {
        let output_path = self.config.output_path();

        let data = write_results(&result.rows)?;
        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            result.rows.len(),
            data.len(),
            output_path
        );
        self.storage.write_file(output_path, &data).await?;
        tracing::info!("Output written to {}", output_path);

        if let Some(summary_path) = self.config.summary_path() {
            let json = serde_json::to_string_pretty(&result.summary)?;
            self.storage.write_file(summary_path, json.as_bytes()).await?;
            tracing::info!("Run summary written to {}", summary_path);
        }

        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::core::diagnostics::CollectingSink;
    use crate::domain::model::RunSummary;
    use crate::utils::error::EtlError;

    struct MockConfig {
        summary_path: Option<String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self { summary_path: None }
        }

        fn with_summary(path: &str) -> Self {
            Self {
                summary_path: Some(path.to_string()),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn plans_path(&self) -> &str {
            "plans.csv"
        }

        fn zips_path(&self) -> &str {
            "zips.csv"
        }

        fn slcsp_path(&self) -> &str {
            "slcsp.csv"
        }

        fn output_path(&self) -> &str {
            "out/slcsp.csv"
        }

        fn summary_path(&self) -> Option<&str> {
            self.summary_path.as_deref()
        }
    }

    const PLANS: &str = "plan_id,state,metal_level,rate,rate_area\n\
        A1,MO,Silver,245.20,3\n\
        A2,MO,Silver,231.40,3\n\
        A3,MO,Gold,201.00,3\n\
        A4,MO,Silver,290.05,3\n\
        B1,MO,Silver,300.00,4\n";

    const ZIPS: &str = "zipcode,state,county_code,name,rate_area\n\
        64148,MO,29095,Jackson,3\n\
        64149,MO,29095,Jackson,3\n\
        64149,MO,29037,Cass,4\n\
        64150,MO,29037,Cass,4\n";

    const TARGETS: &str = "zipcode,rate\n64148,\n64149,\n64150,\n00000,\n";

    async fn seeded_storage(plans: &str) -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.insert("plans.csv", plans).await;
        storage.insert("zips.csv", ZIPS).await;
        storage.insert("slcsp.csv", TARGETS).await;
        storage
    }

    #[tokio::test]
    async fn test_extract_reads_all_three_inputs() {
        let pipeline = SlcspPipeline::new(seeded_storage(PLANS).await, MockConfig::new());

        let inputs = pipeline.extract().await.unwrap();

        assert_eq!(inputs.plans.len(), 5);
        assert_eq!(inputs.zips.len(), 4);
        assert_eq!(inputs.targets.len(), 4);
        assert_eq!(inputs.targets[3].zipcode, "00000");
    }

    #[tokio::test]
    async fn test_extract_missing_input_fails() {
        let storage = MemoryStorage::new();
        storage.insert("plans.csv", PLANS).await;
        let pipeline = SlcspPipeline::new(storage, MockConfig::new());

        let err = pipeline.extract().await.unwrap_err();

        match err {
            EtlError::FileNotFound { path } => assert_eq!(path, "zips.csv"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transform_collects_warnings_through_sink() {
        let sink = Arc::new(CollectingSink::new());
        let pipeline = SlcspPipeline::new(seeded_storage(PLANS).await, MockConfig::new())
            .with_sink(sink.clone());

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();

        let rates: Vec<String> = result.rows.iter().map(|r| r.rate_field()).collect();
        assert_eq!(rates, vec!["245.20", "", "", ""]);
        assert_eq!(sink.warnings().len(), 3);
        assert_eq!(result.summary.blank_ambiguous, 1);
        assert_eq!(result.summary.blank_insufficient_rates, 1);
        assert_eq!(result.summary.blank_no_rate_area, 1);
    }

    #[tokio::test]
    async fn test_load_writes_output_csv() {
        let storage = seeded_storage(PLANS).await;
        let pipeline = SlcspPipeline::new(storage.clone(), MockConfig::new())
            .with_sink(Arc::new(CollectingSink::new()));

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();
        let path = pipeline.load(result).await.unwrap();

        assert_eq!(path, "out/slcsp.csv");
        let written = String::from_utf8(storage.get_file("out/slcsp.csv").await.unwrap()).unwrap();
        assert_eq!(
            written,
            "zipcode,rate\n64148,245.20\n64149,\n64150,\n00000,\n"
        );
    }

    #[tokio::test]
    async fn test_load_writes_summary_when_configured() {
        let storage = seeded_storage(PLANS).await;
        let config = MockConfig::with_summary("out/summary.json");
        let pipeline = SlcspPipeline::new(storage.clone(), config)
            .with_sink(Arc::new(CollectingSink::new()));

        let inputs = pipeline.extract().await.unwrap();
        let result = pipeline.transform(inputs).await.unwrap();
        pipeline.load(result).await.unwrap();

        let json = storage.get_file("out/summary.json").await.unwrap();
        let summary: RunSummary = serde_json::from_slice(&json).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.blank_rows.len(), 3);
    }

    #[tokio::test]
    async fn test_transform_fails_on_malformed_silver_rate() {
        let plans = "plan_id,state,metal_level,rate,rate_area\nA1,MO,Silver,not-a-rate,3\n";
        let pipeline = SlcspPipeline::new(seeded_storage(plans).await, MockConfig::new());

        let inputs = pipeline.extract().await.unwrap();
        let err = pipeline.transform(inputs).await.unwrap_err();

        assert!(matches!(err, EtlError::InvalidRate { row: 1, .. }));
    }
}
