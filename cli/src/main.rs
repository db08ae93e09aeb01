//! Tidegraph CLI: explore an entity graph snapshot from the terminal
//!
//! Loads one JSON snapshot per invocation and prints components, stats,
//! neighborhoods and the active state at an instant.

mod commands;

use clap::{Parser, Subcommand};
use commands::{KindArg, OrderArg, OutputFormat, Session, StatsArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tidegraph", version, about = "Entity graph analysis CLI")]
struct Cli {
    /// Graph snapshot (JSON with `nodes` and `links`)
    #[arg(long, global = true, env = "TIDEGRAPH_GRAPH")]
    graph: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true, env = "TIDEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected components
    Components {
        /// Write the partition as JSON to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Per-component statistics, largest first
    Stats {
        /// Revenue floor (1 means no floor)
        #[arg(long, requires = "max_revenue")]
        min_revenue: Option<f64>,

        /// Revenue ceiling
        #[arg(long, requires = "min_revenue")]
        max_revenue: Option<f64>,

        /// Case-insensitive id substring
        #[arg(long, default_value = "")]
        search: String,

        /// Allowed country (repeatable)
        #[arg(long = "country")]
        countries: Vec<String>,

        /// Precomputed partition instead of computing components
        #[arg(long)]
        partition: Option<PathBuf>,
    },
    /// Neighborhood of a node
    Expand {
        id: String,

        /// Hops (defaults from config, clamped to max_depth)
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Active links and nodes at an instant
    Active {
        /// Instant, e.g. 2021-06-01 or 2021-06-01T12:00:00
        at: String,
    },
    /// History of one relationship up to an instant
    History {
        source: String,
        target: String,
        at: String,
    },
    /// Members of the component containing a node
    Members {
        id: String,

        #[arg(long, value_enum, default_value = "all")]
        kind: KindArg,

        #[arg(long, value_enum, default_value = "degree")]
        order_by: OrderArg,

        /// Ascending order
        #[arg(long)]
        asc: bool,
    },
    /// Value distributions across the snapshot
    Profile,
    /// Run the playback clock and print each step
    Play {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let graph = cli
        .graph
        .ok_or_else(|| anyhow::anyhow!("no graph given (use --graph or TIDEGRAPH_GRAPH)"))?;
    let mut session = Session::load(&graph, cli.config.as_deref())?;
    let format = cli.format;

    let output = match cli.command {
        Commands::Components { export } => commands::run_components(&session, export.as_deref(), format)?,
        Commands::Stats {
            min_revenue,
            max_revenue,
            search,
            countries,
            partition,
        } => {
            let args = StatsArgs {
                revenue: min_revenue.zip(max_revenue),
                search,
                countries,
                partition,
            };
            commands::run_stats(&mut session, &args, format)?
        }
        Commands::Expand { id, depth } => commands::run_expand(&session, &id, depth, format)?,
        Commands::Active { at } => commands::run_active(&session, &at, format)?,
        Commands::History { source, target, at } => {
            commands::run_history(&session, &source, &target, &at, format)?
        }
        Commands::Members {
            id,
            kind,
            order_by,
            asc,
        } => commands::run_members(&session, &id, kind, order_by, asc, format)?,
        Commands::Profile => commands::run_profile(&session, format)?,
        Commands::Play { ticks } => commands::run_play(&session, ticks, format).await?,
    };

    println!("{}", output);
    Ok(())
}
