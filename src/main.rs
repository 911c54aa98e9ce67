use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bondhon::config::Config;
use bondhon::logging;
use bondhon::payments::TokenLedger;
use bondhon::profile::ProfileRegistry;
use bondhon::rest::{self, ApiState};
use bondhon::search::{run_search, SearchQuery};
use bondhon::ui::{run_wizard, WizardOutcome};

#[derive(Parser)]
#[command(name = "bondhon")]
#[command(about = "Matrimony biodata platform: wizard, search and admin API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Api {
        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search approved biodata from the command line
    Search {
        /// "bride" or "groom"
        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        religion: Option<String>,

        #[arg(long)]
        district: Option<String>,

        #[arg(long)]
        age_min: Option<u8>,

        #[arg(long)]
        age_max: Option<u8>,

        /// 1-indexed result page
        #[arg(long)]
        page: Option<usize>,
    },

    /// Show a member's token balance
    Tokens {
        /// Account email
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // No subcommand = interactive wizard, which owns the terminal
    let is_tui_mode = cli.command.is_none();

    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Api { port }) => {
            cmd_api(config, port).await?;
        }
        Some(Commands::Search {
            kind,
            religion,
            district,
            age_min,
            age_max,
            page,
        }) => {
            let query = SearchQuery {
                kind,
                religion,
                district,
                age_min,
                age_max,
                page,
                ..SearchQuery::default()
            };
            cmd_search(&config, &query)?;
        }
        Some(Commands::Tokens { user }) => {
            cmd_tokens(&config, &user)?;
        }
        None => {
            run_wizard_mode(&config, logging_handle.log_file_path)?;
        }
    }

    Ok(())
}

async fn cmd_api(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let state = ApiState::new(config);
    rest::serve(state, port).await
}

fn cmd_search(config: &Config, query: &SearchQuery) -> Result<()> {
    let mut registry = ProfileRegistry::new();
    registry.load_all(&config.profiles_path())?;

    let page = run_search(registry.approved(), query);
    println!(
        "{} match(es), page {}/{}",
        page.total, page.page, page.total_pages
    );
    for profile in &page.items {
        println!(
            "#{:<5} {:8} {:>3}  {:<20} {}",
            profile.biodata_no,
            profile.kind().map(|k| k.label()).unwrap_or("-"),
            profile
                .age()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            profile.text_field("profession").unwrap_or("-"),
            profile.district().unwrap_or_else(|| "-".to_string()),
        );
    }
    Ok(())
}

fn cmd_tokens(config: &Config, user: &str) -> Result<()> {
    let ledger = TokenLedger::load(&config.state_path())?;
    match ledger.balance(user) {
        Ok(balance) => println!("{}: {} token(s)", user.to_lowercase(), balance),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn run_wizard_mode(config: &Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let outcome = run_wizard(config)?;
    match outcome {
        WizardOutcome::Saved { id, path } => {
            println!("Biodata {} saved to {}", id, path.display());
        }
        WizardOutcome::Cancelled => {
            println!("Wizard cancelled, nothing saved.");
        }
    }

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if log_path.exists() {
            if let Ok(metadata) = log_path.metadata() {
                if metadata.len() > 0 {
                    eprintln!("Session log: {}", log_path.display());
                }
            }
        }
    }

    Ok(())
}
