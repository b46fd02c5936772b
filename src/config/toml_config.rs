use crate::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::core::TallySpec;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub output: OutputSection,
    pub tally: Option<TallySpec>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
    pub max_upload_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub dir: Option<String>,
    pub unique_names: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR}); 未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// Builds the runtime config, falling back to [`ServerConfig::default`] for
    /// anything the file leaves out. `[output] dir` is required.
    pub fn into_server_config(self) -> Result<ServerConfig> {
        let output_dir = validate_required_field("output.dir", &self.output.dir)?.clone();
        let defaults = ServerConfig::default();
        let server = self.server.unwrap_or_default();
        let tally = self.tally.unwrap_or_default();

        let config = ServerConfig {
            host: server.host.unwrap_or(defaults.host),
            port: server.port.unwrap_or(defaults.port),
            output_dir,
            base_url: server.base_url.unwrap_or(defaults.base_url),
            tally_column: tally.column,
            value_a: tally.value_a,
            value_b: tally.value_b,
            unique_names: self.output.unique_names.unwrap_or(false),
            max_upload_bytes: server.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };
        config.validate()?;
        Ok(config)
    }
}
