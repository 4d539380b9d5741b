mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ytsent-cli")]
#[command(about = "YouTube comment sentiment from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, classify and summarise the comments of a video
    Analyze {
        /// Video link (watch URL or youtu.be short link)
        link: String,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Classify one or more texts with the configured model
    Classify {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Print the video id extracted from a link
    ExtractId { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = std::env::var("YTSENT_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { link, json } => commands::run_analyze(&link, json).await?,
        Commands::Classify { texts } => commands::run_classify(&texts)?,
        Commands::ExtractId { url } => commands::run_extract_id(&url)?,
    }

    Ok(())
}
