use anyhow::Context;
use clap::Parser;
use sheet_chart::utils::{logger, validation::Validate};
use sheet_chart::{server, ServerConfig, TomlConfig};

#[derive(Debug, Parser)]
#[command(name = "sheet-chart")]
#[command(about = "Upload a CSV, get back an XLSX workbook and a pie chart")]
struct Cli {
    /// Path to a TOML configuration file; replaces the server flags below
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(flatten)]
    server: ServerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, verbose, json_logs) = match &cli.config {
        Some(path) => {
            let file = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            let verbose = cli.verbose || file.verbose();
            let json_logs = cli.json_logs || file.json_logs();
            (file.into_server_config()?, verbose, json_logs)
        }
        None => (cli.server.clone(), cli.verbose, cli.json_logs),
    };

    // 初始化日誌
    logger::init_logger(verbose, json_logs);
    tracing::info!("Starting sheet-chart server");
    tracing::debug!("Server config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e.into());
    }

    server::serve(config).await?;
    Ok(())
}
