pub mod chart;
pub mod cleaner;
pub mod parser;
pub mod pipeline;
pub mod publisher;
pub mod spreadsheet;

pub use crate::domain::model::{
    CategoryCounts, CleanedRecord, ConversionOutput, PublishedArtifacts, Record, TallySpec,
};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
