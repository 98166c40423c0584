use crate::domain::model::{CalculationResult, SlcspInputs};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn plans_path(&self) -> &str;
    fn zips_path(&self) -> &str;
    fn slcsp_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn summary_path(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SlcspInputs>;
    async fn transform(&self, inputs: SlcspInputs) -> Result<CalculationResult>;
    async fn load(&self, result: CalculationResult) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Where the core reports leveled messages instead of logging globally.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, level: DiagnosticLevel, message: &str);

    fn warn(&self, message: &str) {
        self.emit(DiagnosticLevel::Warning, message);
    }

    fn info(&self, message: &str) {
        self.emit(DiagnosticLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.emit(DiagnosticLevel::Error, message);
    }
}
