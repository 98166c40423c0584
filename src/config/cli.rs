use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_input_file, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "slcsp")]
#[command(about = "Calculate the second lowest cost silver plan (SLCSP) for ZIP codes")]
pub struct CliConfig {
    #[arg(long, help = "Path to plans.csv")]
    pub plans: String,

    #[arg(long, help = "Path to zips.csv")]
    pub zips: String,

    #[arg(long, help = "Path to slcsp.csv")]
    pub slcsp: String,

    #[arg(long, help = "Path to output file")]
    pub output: String,

    #[arg(long, help = "Write a JSON run summary to this path")]
    pub summary: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log elapsed time and memory per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn plans_path(&self) -> &str {
        &self.plans
    }

    fn zips_path(&self) -> &str {
        &self.zips
    }

    fn slcsp_path(&self) -> &str {
        &self.slcsp
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn summary_path(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_input_file("plans", &self.plans)?;
        validate_input_file("zips", &self.zips)?;
        validate_input_file("slcsp", &self.slcsp)?;
        validate_path("output", &self.output)?;
        if let Some(summary) = &self.summary {
            validate_path("summary", summary)?;
        }
        Ok(())
    }
}
