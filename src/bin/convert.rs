use std::path::Path;

use anyhow::Context;
use clap::Parser;
use sheet_chart::core::publisher::artifact_stem;
use sheet_chart::core::Storage;
use sheet_chart::utils::logger;
use sheet_chart::{ConversionPipeline, LocalStorage, TallySpec};

#[derive(Parser)]
#[command(name = "sheet-chart-convert")]
#[command(about = "Convert a local CSV file into an XLSX workbook and a PNG pie chart")]
struct Args {
    /// CSV file to convert
    input: String,

    /// Directory for the generated files
    #[arg(short, long, default_value = "./public")]
    output_dir: String,

    #[arg(long, default_value = "Gender")]
    tally_column: String,

    #[arg(long, default_value = "M")]
    value_a: String,

    #[arg(long, default_value = "F")]
    value_b: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose, false);

    let input = Path::new(&args.input);
    let raw = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read '{}'", args.input))?;
    tracing::info!("📁 Loaded {} ({} bytes)", args.input, raw.len());

    let pipeline = ConversionPipeline::new(TallySpec::new(
        args.tally_column,
        args.value_a,
        args.value_b,
    ));
    let output = pipeline
        .convert_concurrent(raw)
        .await
        .with_context(|| format!("failed to convert '{}'", args.input))?;

    let stem = artifact_stem(&args.input);
    let storage = LocalStorage::new(&args.output_dir);
    let xlsx_name = format!("{}.xlsx", stem);
    let png_name = format!("{}.png", stem);
    storage.write_file(&xlsx_name, &output.spreadsheet).await?;
    storage.write_file(&png_name, &output.chart).await?;

    let spec = pipeline.tally_spec();
    tracing::info!(
        "✅ {} rows, {}={} {}={}",
        output.rows,
        spec.value_a,
        output.counts.a,
        spec.value_b,
        output.counts.b
    );
    println!("{}", storage.base_path().join(&xlsx_name).display());
    println!("{}", storage.base_path().join(&png_name).display());
    Ok(())
}
