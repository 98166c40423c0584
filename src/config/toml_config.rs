use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_input_file, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// 相對路徑以此目錄為基準
    pub base_dir: Option<String>,
    pub plans: String,
    pub zips: String,
    pub slcsp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EtlError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                EtlError::IoError(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;

        validate_input_file("input.plans", &self.input.plans)?;
        validate_input_file("input.zips", &self.input.zips)?;
        validate_input_file("input.slcsp", &self.input.slcsp)?;
        if let Some(base_dir) = &self.input.base_dir {
            validate_path("input.base_dir", base_dir)?;
        }

        validate_path("output.path", &self.output.path)?;
        if let Some(summary) = &self.output.summary {
            validate_path("output.summary", summary)?;
        }

        if let Some(level) = self.log_level() {
            if !VALID_LOG_LEVELS.contains(&level) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!(
                        "Unsupported log level. Valid levels: {}",
                        VALID_LOG_LEVELS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    /// 輸入檔案的基準目錄，預設為目前目錄
    pub fn base_dir(&self) -> &str {
        self.input.base_dir.as_deref().unwrap_or(".")
    }

    /// 將輸入路徑以 base_dir 為基準展開，之後 base_dir 不再使用
    pub fn resolve_input_paths(&mut self) {
        let Some(base_dir) = self.input.base_dir.take() else {
            return;
        };
        let base = Path::new(&base_dir);
        for path in [
            &mut self.input.plans,
            &mut self.input.zips,
            &mut self.input.slcsp,
        ] {
            *path = base.join(path.as_str()).display().to_string();
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn plans_path(&self) -> &str {
        &self.input.plans
    }

    fn zips_path(&self) -> &str {
        &self.input.zips
    }

    fn slcsp_path(&self) -> &str {
        &self.input.slcsp
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn summary_path(&self) -> Option<&str> {
        self.output.summary.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[job]
name = "slcsp-2026"
description = "Benefits calculation"

[input]
base_dir = "./data"
plans = "plans.csv"
zips = "zips.csv"
slcsp = "slcsp.csv"

[output]
path = "./output/slcsp.csv"
summary = "./output/summary.json"

[monitoring]
enabled = true
log_level = "debug"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.job.name, "slcsp-2026");
        assert_eq!(config.base_dir(), "./data");
        assert_eq!(config.plans_path(), "plans.csv");
        assert_eq!(config.output_path(), "./output/slcsp.csv");
        assert_eq!(config.summary_path(), Some("./output/summary.json"));
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_input_paths_against_base_dir() {
        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.input.zips = "/abs/zips.csv".to_string();

        config.resolve_input_paths();

        assert_eq!(config.plans_path(), "./data/plans.csv");
        assert_eq!(config.zips_path(), "/abs/zips.csv");
        assert_eq!(config.output_path(), "./output/slcsp.csv");
        assert_eq!(config.base_dir(), ".");
    }

    #[test]
    fn test_optional_sections_default() {
        let toml_content = r#"
[job]
name = "minimal"

[input]
plans = "plans.csv"
zips = "zips.csv"
slcsp = "slcsp.csv"

[output]
path = "slcsp_out.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_dir(), ".");
        assert_eq!(config.summary_path(), None);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SLCSP_TEST_DATA_DIR", "/srv/benefits");

        let toml_content = r#"
[job]
name = "env"

[input]
base_dir = "${SLCSP_TEST_DATA_DIR}"
plans = "plans.csv"
zips = "zips.csv"
slcsp = "slcsp.csv"

[output]
path = "${SLCSP_TEST_UNSET_VAR}/slcsp.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.base_dir(), "/srv/benefits");
        assert_eq!(config.output_path(), "${SLCSP_TEST_UNSET_VAR}/slcsp.csv");

        std::env::remove_var("SLCSP_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[job]
name = "bad"

[input]
plans = "plans.xlsx"
zips = "zips.csv"
slcsp = "slcsp.csv"

[output]
path = "out.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let content = BASIC.replace("log_level = \"debug\"", "log_level = \"loud\"");
        let config = TomlConfig::from_toml_str(&content).unwrap();

        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let result = TomlConfig::from_toml_str("[job]\nname = \"x\"\n");
        assert!(matches!(
            result,
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "slcsp-2026");
    }

    #[test]
    fn test_config_from_missing_file() {
        assert!(matches!(
            TomlConfig::from_file("/no/such/slcsp.toml"),
            Err(EtlError::FileNotFound { .. })
        ));
    }
}
