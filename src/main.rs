use anyhow::Result;
use clap::{Parser, Subcommand};
use niche_scout::config::{Config, OutputFormat};
use niche_scout::error::NicheError;
use niche_scout::pipeline::{AnalysisReport, NicheAnalyzer};
use niche_scout::report;
use niche_scout::resolver::ChannelQuery;
use niche_scout::youtube::{CatalogFetcher, YouTubeClient};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "niche-scout")]
#[command(version, author = "TigreRoll")]
#[command(about = "YouTube niche research: market size, saturation and profitability scores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Configuration file (defaults to niche-scout.toml or config/niche-scout.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a channel's recent uploads
    Channel {
        /// Channel URL, channel id (UC...) or @handle
        channel: String,
        /// Maximum number of uploads to analyze
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Analyze the videos returned for a search phrase
    Search {
        /// Topic or keyword phrase
        phrase: String,
        /// Maximum number of videos to analyze
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List channels competing for a search phrase
    Channels {
        /// Topic or keyword phrase
        phrase: String,
        /// Maximum number of channels to list
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Write the effective configuration (without the API key) to a file
    InitConfig {
        /// Destination path
        #[arg(default_value = "niche-scout.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let filter = if cli.verbose { "debug" } else { "niche_scout=info,warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("❌ {}", e);
        eprintln!("Error: {}", e);
        eprintln!("Hint: {}", e.user_hint());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), NicheError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Commands::InitConfig { path } = &cli.command {
        config.save(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    if let Some(api_key) = cli.api_key {
        config.api.api_key = Some(api_key);
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    config.validate()?;
    info!("🔧 {}", config.summary().replace('\n', " "));

    let client = YouTubeClient::new(&config.api)?;
    let fetcher = CatalogFetcher::new(Box::new(client)).with_page_size(config.api.page_size);
    let format = config.output.format;
    let analyzer = NicheAnalyzer::new(fetcher, config);

    let report = match cli.command {
        Commands::Channel { channel, limit } => match ChannelQuery::parse(&channel)? {
            ChannelQuery::Channel(channel_ref) => {
                let limit = limit.unwrap_or(analyzer.config().analysis.channel_video_limit);
                AnalysisReport::Channel(analyzer.analyze_channel(&channel_ref, limit).await?)
            }
            ChannelQuery::Search(phrase) => {
                return Err(NicheError::InvalidInput(format!(
                    "'{}' is not a channel URL, id or @handle; use `search` for topics",
                    phrase
                )))
            }
        },
        Commands::Search { phrase, limit } => {
            let limit = limit.unwrap_or(analyzer.config().analysis.search_video_limit);
            AnalysisReport::Niche(analyzer.analyze_search(&phrase, limit).await?)
        }
        Commands::Channels { phrase, limit } => {
            let limit = limit.unwrap_or(analyzer.config().analysis.channel_search_limit);
            AnalysisReport::Channels(analyzer.discover_channels(&phrase, limit).await?)
        }
        Commands::InitConfig { .. } => return Ok(()),
    };

    println!("{}", report::render(&report, format)?);
    Ok(())
}
