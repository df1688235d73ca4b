//! One-shot bet proposal CLI
//!
//! Usage:
//!   palfun_generate generate --input "BTC above 100k on Jan 1 2027"
//!   palfun_generate generate --input "..." --mock --raw
//!   palfun_generate draft --input "..." --stake 0.05 --deadline 2027-01-01T00:00:00Z
//!   palfun_generate join --pal <ADDRESS> --stake 0.02 [--against] [--message "..."]
//!   palfun_generate resolve --pal <ADDRESS> [--threshold 180_00000000]
//!   palfun_generate claim --pal <ADDRESS>

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use palfun::config::Config;
use palfun::pal::{ClaimDraft, JoinDraft, PalDraft, ResolveDraft};

#[derive(Parser)]
#[command(name = "palfun_generate")]
#[command(about = "Normalize a bet idea into a Pal proposal")]
struct Cli {
    #[arg(long, global = true, default_value = "config/palfun.toml")]
    config: String,
    /// Answer from the canned mock upstream instead of the live model
    #[arg(long, global = true)]
    mock: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized proposal
    Generate {
        #[arg(long)]
        input: String,
        /// Also print the raw upstream payload
        #[arg(long)]
        raw: bool,
    },
    /// Normalize, then build the "create pal" arguments
    Draft {
        #[arg(long)]
        input: String,
        /// Stake in SOL
        #[arg(long, default_value = "0.01")]
        stake: f64,
        /// RFC 3339 deadline; defaults to 24h from now
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Build the "join pal" arguments
    Join {
        #[arg(long)]
        pal: String,
        /// Stake in SOL
        #[arg(long, default_value = "0.01")]
        stake: f64,
        /// Bet against the statement instead of for it
        #[arg(long)]
        against: bool,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Build the "resolve pal" arguments
    Resolve {
        #[arg(long)]
        pal: String,
        /// Oracle price with 8 decimals; defaults to 180_00000000
        #[arg(long)]
        threshold: Option<String>,
    },
    /// Build the "claim winnings" arguments
    Claim {
        #[arg(long)]
        pal: String,
    },
}

fn parse_deadline(deadline: Option<&str>) -> Result<Option<i64>> {
    deadline
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp())
                .with_context(|| format!("Invalid deadline: {}", s))
        })
        .transpose()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, raw } => {
            let config = Config::load_or_default(&cli.config)?;
            let normalizer = palfun::build_normalizer(&config, cli.mock)?;
            let proposal = normalizer.normalize(&input).await?;
            if proposal.parsed.is_none() {
                tracing::warn!("Upstream content could not be parsed; fields are empty");
            }
            println!("{}", serde_json::to_string_pretty(&proposal.result())?);
            if raw {
                println!("{}", serde_json::to_string_pretty(&proposal.raw)?);
            }
        }
        Commands::Draft { input, stake, deadline } => {
            let deadline = parse_deadline(deadline.as_deref())?;
            let config = Config::load_or_default(&cli.config)?;
            let normalizer = palfun::build_normalizer(&config, cli.mock)?;
            let proposal = normalizer.normalize(&input).await?;
            let draft = PalDraft::from_proposal(&proposal.result(), stake, deadline, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Commands::Join { pal, stake, against, message } => {
            let draft = JoinDraft::new(&pal, !against, stake, &message)?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Commands::Resolve { pal, threshold } => {
            let draft = ResolveDraft::new(&pal, threshold.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Commands::Claim { pal } => {
            let draft = ClaimDraft::new(&pal)?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
    }

    Ok(())
}
