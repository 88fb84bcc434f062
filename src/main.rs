use anyhow::{Context, Result};
use clap::Parser;
use songlake_config::EtlConfig;
use std::path::PathBuf;
use tracing::info;

/// ETL job: JSON event and song data in object storage to partitioned
/// Parquet tables
#[derive(Parser)]
#[command(name = "songlake")]
#[command(version)]
#[command(about = "Music-streaming event ETL to partitioned Parquet", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input root (overrides config file)
    #[arg(short, long, value_name = "ROOT")]
    input: Option<String>,

    /// Output root (overrides config file)
    #[arg(short, long, value_name = "ROOT")]
    output: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut config = if let Some(config_path) = &cli.config {
        EtlConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        EtlConfig::load().context("Failed to load configuration")?
    };

    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    songlake::init_tracing(&config);
    display_startup_info(&config);

    let summary = songlake::run_pipeline(&config).await?;

    info!(
        songs = summary.songs,
        artists = summary.artists,
        users = summary.users,
        time_rows = summary.time_rows,
        songplays = summary.songplays,
        partitions = summary.partitions,
        "Pipeline completed"
    );
    Ok(())
}

fn apply_cli_overrides(config: &mut EtlConfig, cli: &Cli) {
    if let Some(input) = &cli.input {
        config.input.root = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output.root = output.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
}

fn display_startup_info(config: &EtlConfig) {
    info!("songlake v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Input: {} ({} backend)",
        config.input.root, config.input.backend
    );
    info!(
        "Output: {} ({} backend)",
        config.output.root, config.output.backend
    );
    info!("Log level: {}", config.logging.level);
}
