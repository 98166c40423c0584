pub mod slcsp_pipeline;

pub use slcsp_pipeline::SlcspPipeline;
