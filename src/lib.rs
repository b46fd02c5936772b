pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, ServerConfig};
pub use crate::core::{
    pipeline::{convert, ConversionPipeline},
    publisher::ArtifactPublisher,
};
pub use crate::domain::model::{CategoryCounts, CleanedRecord, ConversionOutput, Record, TallySpec};
pub use crate::utils::error::{ConvertError, ErrorKind, Result};
