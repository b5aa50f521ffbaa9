use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kart_league::api::{build_router, state::AppState};
use kart_league::config::AppConfig;
use kart_league::fetch::ApiClient;
use kart_league::render::{
    render_breakdown, render_calendar, render_leaders, render_next_races, render_standings,
};
use kart_league::results::{RaceFilter, ResultsPage, ResultsView, ViewState, LOAD_FAILED_MESSAGE};
use kart_league::schedule::RaceCalendar;
use kart_league::session::{Access, RouteTable, Session, SessionContext};

#[derive(Parser)]
#[command(name = "kart-league")]
#[command(about = "Go-kart league standings and race results")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./kart-league.toml")]
    config: PathBuf,

    /// League API base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show championship standings
    Standings {
        /// Only show this division
        #[arg(long)]
        division: Option<String>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show race results split by division
    Results {
        /// Race name, or "All"
        #[arg(long)]
        race: Option<String>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show the top racers of each division
    Leaders {
        #[arg(long, default_value = "3")]
        limit: usize,
    },

    /// Show upcoming and past races
    Races {
        /// Only show the next N upcoming races
        #[arg(long)]
        next: Option<usize>,
    },

    /// Check whether the current session may open a page
    Access {
        #[arg(long)]
        path: String,
    },

    /// Start the API server
    Serve {
        /// Bind address (defaults to the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Fetch results and wait for the view to settle.
async fn load_page(client: &ApiClient) -> Result<ResultsPage> {
    match ResultsView::activate(Arc::new(client.clone())).settled().await {
        ViewState::Ready(page) => Ok(page),
        ViewState::Failed(message) => bail!("{}", message),
        ViewState::Loading => bail!("{}", LOAD_FAILED_MESSAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    config.apply_overrides(cli.log_level.as_deref(), cli.api_url.as_deref())?;

    init_tracing(&config.log_level, cli.json_logs);
    tracing::debug!("Starting kart-league v{}", env!("CARGO_PKG_VERSION"));

    let session = SessionContext::new(Session::from_env());
    let client = ApiClient::new(&config.api, session.clone())?;

    match cli.command {
        Commands::Standings { division, json } => {
            let page = load_page(&client).await?;
            let standings = &page.standings;

            if let Some(name) = division.as_deref() {
                if standings.get(name).is_none() {
                    bail!(
                        "Unknown division: {} (known: {})",
                        name,
                        standings.division_names().join(", ")
                    );
                }
            }

            if json {
                let out = match division.as_deref().and_then(|d| standings.get(d)) {
                    Some(entries) => serde_json::to_string_pretty(entries)?,
                    None => serde_json::to_string_pretty(standings)?,
                };
                println!("{}", out);
            } else {
                print!("{}", render_standings(standings, division.as_deref()));
            }
        }
        Commands::Results { race, json } => {
            let mut page = load_page(&client).await?;
            page.select(RaceFilter::from_option(race.as_deref()));

            let races = page.breakdown();
            if json {
                println!("{}", serde_json::to_string_pretty(&races)?);
            } else {
                print!("{}", render_breakdown(&races));
            }
        }
        Commands::Leaders { limit } => {
            if limit == 0 {
                bail!("--limit must be at least 1");
            }
            let page = load_page(&client).await?;
            print!("{}", render_leaders(&page.standings.leaders(limit)));
        }
        Commands::Races { next } => {
            let races = match client.races().await {
                Ok(races) => races,
                Err(e) => {
                    tracing::error!("Failed to load races: {}", e);
                    bail!("{}", LOAD_FAILED_MESSAGE);
                }
            };
            let calendar = RaceCalendar::split(races, Local::now().date_naive());
            match next {
                Some(n) => print!("{}", render_next_races(calendar.next(n))),
                None => print!("{}", render_calendar(&calendar)),
            }
        }
        Commands::Access { path } => {
            let current = session.current();
            match RouteTable::standard().resolve(&path, &current) {
                Access::Granted => println!("{}: granted", path),
                Access::Redirect(to) => println!("{}: redirect to {}", path, to),
            }
        }
        Commands::Serve { host, port } => {
            let state = AppState {
                results: Arc::new(client.clone()),
                races: Arc::new(client),
                cors_origin: config.server.cors_origin.clone(),
            };
            let app = build_router(state);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
