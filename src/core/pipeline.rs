use crate::core::chart::render_pie_chart;
use crate::core::cleaner::{clean_records, tally};
use crate::core::parser::parse_records;
use crate::core::spreadsheet::encode_workbook;
use crate::domain::model::{CategoryCounts, CleanedRecord, ConversionOutput, TallySpec};
use crate::utils::error::Result;

/// CSV → (xlsx, png) conversion for one upload.
///
/// Stages run strictly in order and the first failing stage aborts the
/// conversion with its own error.
#[derive(Debug, Clone, Default)]
pub struct ConversionPipeline {
    tally: TallySpec,
}

impl ConversionPipeline {
    pub fn new(tally: TallySpec) -> Self {
        Self { tally }
    }

    pub fn tally_spec(&self) -> &TallySpec {
        &self.tally
    }

    fn prepare(&self, raw: &[u8]) -> Result<(Vec<CleanedRecord>, CategoryCounts)> {
        let records = parse_records(raw)?;
        tracing::debug!("Parsed {} records", records.len());

        let cleaned = clean_records(records);
        let counts = tally(&cleaned, &self.tally);
        tracing::debug!(
            "Cleaned {} records; {}={} {}={} in column '{}'",
            cleaned.len(),
            self.tally.value_a,
            counts.a,
            self.tally.value_b,
            counts.b,
            self.tally.column
        );
        Ok((cleaned, counts))
    }

    /// Runs every stage on the calling thread.
    pub fn convert(&self, raw: &[u8]) -> Result<ConversionOutput> {
        let (cleaned, counts) = self.prepare(raw)?;
        let spreadsheet = encode_workbook(&cleaned)?;
        let chart = render_pie_chart(counts.a, counts.b)?;

        Ok(ConversionOutput {
            spreadsheet,
            chart,
            counts,
            rows: cleaned.len(),
        })
    }

    /// Same as [`convert`](Self::convert), but keeps all CPU work off the async
    /// workers: parsing runs on a blocking task, then the workbook and the
    /// chart are produced on two more.
    ///
    /// When both tasks fail the spreadsheet error wins, matching the sequential order.
    pub async fn convert_concurrent(&self, raw: Vec<u8>) -> Result<ConversionOutput> {
        let pipeline = self.clone();
        let (cleaned, counts) =
            tokio::task::spawn_blocking(move || pipeline.prepare(&raw)).await??;
        let rows = cleaned.len();

        let spreadsheet_task = tokio::task::spawn_blocking(move || encode_workbook(&cleaned));
        let chart_task = tokio::task::spawn_blocking(move || render_pie_chart(counts.a, counts.b));
        let (spreadsheet, chart) = tokio::join!(spreadsheet_task, chart_task);

        let spreadsheet = spreadsheet??;
        let chart = chart??;

        Ok(ConversionOutput {
            spreadsheet,
            chart,
            counts,
            rows,
        })
    }
}

/// One-shot conversion with an explicit tally column and its two tracked values.
pub fn convert(
    raw: &[u8],
    tally_column: &str,
    tally_value_a: &str,
    tally_value_b: &str,
) -> Result<ConversionOutput> {
    ConversionPipeline::new(TallySpec::new(tally_column, tally_value_a, tally_value_b)).convert(raw)
}
