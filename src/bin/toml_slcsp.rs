use anyhow::Context;
use clap::Parser;
use slcsp_etl::app::csv_io::{count_records, read_headers};
use slcsp_etl::core::ConfigProvider;
use slcsp_etl::utils::{logger, validation::Validate};
use slcsp_etl::{EtlEngine, LocalStorage, SlcspPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-slcsp")]
#[command(about = "SLCSP calculation driven by a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "slcsp.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override output.path from config
    #[arg(long)]
    output: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Dry run - inspect the inputs without calculating or writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置 (日誌尚未初始化，失敗時直接輸出)
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if args.json_logs {
        logger::init_json_logger(args.verbose, config.log_level());
    } else {
        logger::init_cli_logger_with_level(args.verbose, config.log_level());
    }
    tracing::info!("🚀 Starting TOML-based SLCSP job '{}'", config.job.name);
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(output) = args.output {
        tracing::info!("🔧 Output path overridden to: {}", output);
        config.output.path = output;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    config.resolve_input_paths();
    display_config_summary(&config, args.dry_run);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = SlcspPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ SLCSP job completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ SLCSP job failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Plans: {}", config.plans_path());
    println!("  ZIPs: {}", config.zips_path());
    println!("  Targets: {}", config.slcsp_path());
    println!("  Output: {}", config.output_path());
    if let Some(summary) = config.summary_path() {
        println!("  Summary: {}", summary);
    }

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");

    for (label, path) in [
        ("Plans", config.plans_path()),
        ("ZIPs", config.zips_path()),
        ("Targets", config.slcsp_path()),
    ] {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path))?;
        let headers = read_headers(&data).with_context(|| format!("parsing header of {}", path))?;
        let rows = count_records(&data).with_context(|| format!("counting rows of {}", path))?;

        println!("  {}: {} rows, columns [{}]", label, rows, headers.join(", "));
    }

    println!();
    println!("✅ Dry run analysis complete. Run without --dry-run to write the output.");
    Ok(())
}
