pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, TallySpec};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct ServerConfig {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Directory the xlsx/png artifacts are written to and served from
    #[arg(long, default_value = "./public")]
    pub output_dir: String,

    /// Public base URL used to build artifact links
    #[arg(long, default_value = "http://localhost:3000")]
    pub base_url: String,

    #[arg(long, default_value = "Gender")]
    pub tally_column: String,

    /// Value counted into the first (blue) sector
    #[arg(long, default_value = "M")]
    pub value_a: String,

    /// Value counted into the second (red) sector
    #[arg(long, default_value = "F")]
    pub value_b: String,

    /// Append a random token to artifact names so uploads never overwrite each other
    #[arg(long)]
    pub unique_names: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn tally_spec(&self) -> TallySpec {
        TallySpec::new(&self.tally_column, &self.value_a, &self.value_b)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let tally = TallySpec::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            output_dir: "./public".to_string(),
            base_url: "http://localhost:3000".to_string(),
            tally_column: tally.column,
            value_a: tally.value_a,
            value_b: tally.value_b,
            unique_names: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ConfigProvider for ServerConfig {
    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unique_names(&self) -> bool {
        self.unique_names
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_url("base_url", &self.base_url)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_positive_number("max_upload_bytes", self.max_upload_bytes, 1)?;
        validate_non_empty_string("tally_column", &self.tally_column)?;
        validate_non_empty_string("value_a", &self.value_a)?;
        validate_non_empty_string("value_b", &self.value_b)?;
        validate_distinct("value_b", &self.value_a, &self.value_b)?;
        Ok(())
    }
}
