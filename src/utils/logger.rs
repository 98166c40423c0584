use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// 函式庫與兩個執行檔各自有自己的 tracing target
const LOG_TARGETS: [&str; 3] = ["slcsp_etl", "slcsp", "toml_slcsp"];

fn default_directive(verbose: bool, log_level: Option<&str>) -> String {
    let level = match (verbose, log_level) {
        (true, _) => "debug",
        (false, Some(level)) => level,
        (false, None) => "info",
    };

    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    if verbose {
        directives.push("info".to_string());
    }
    directives.join(",")
}

fn default_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, log_level)))
}

pub fn init_cli_logger(verbose: bool) {
    init_cli_logger_with_level(verbose, None);
}

/// `log_level` 來自 TOML 配置，RUST_LOG 存在時以 RUST_LOG 為準
pub fn init_cli_logger_with_level(verbose: bool, log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// One JSON object per event, for log collectors.
pub fn init_json_logger(verbose: bool, log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_binary_targets() {
        assert_eq!(
            default_directive(false, None),
            "slcsp_etl=info,slcsp=info,toml_slcsp=info"
        );
    }

    #[test]
    fn test_default_directive_uses_configured_level() {
        assert_eq!(
            default_directive(false, Some("warn")),
            "slcsp_etl=warn,slcsp=warn,toml_slcsp=warn"
        );
    }

    #[test]
    fn test_verbose_directive_overrides_configured_level() {
        assert_eq!(
            default_directive(true, Some("error")),
            "slcsp_etl=debug,slcsp=debug,toml_slcsp=debug,info"
        );
    }

    #[test]
    fn test_default_directives_parse() {
        for (verbose, level) in [(false, None), (true, None), (false, Some("trace"))] {
            assert!(EnvFilter::try_new(default_directive(verbose, level)).is_ok());
        }
    }
}
