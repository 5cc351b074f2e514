//! Tubegraph CLI: loads subway line CSV data into a graph
//!
//! The graph backend is chosen by `--database-url`: a local snapshot file
//! (`file://…`), a throwaway in-memory graph (`memory://`) or a running
//! graph server (`http://…`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use tracing::Level;

use tubegraph::{
    connect, default_data_dir, GraphClient, LineLoadReport, Loader, LoaderConfig,
    MembershipPolicy, TubeLine, TubeLineList, WipeConfirmation,
};

#[derive(Parser)]
#[command(name = "tubegraph", version, about = "Load subway line data into a graph")]
struct Cli {
    /// Graph database URL (file://<path>, memory://, http(s)://host:port)
    #[arg(
        long,
        default_value = "file://tubegraph.snapshot",
        global = true,
        env = "TUBEGRAPH_DATABASE_URL"
    )]
    database_url: String,

    /// Directory holding lines/ and connections/ [default: <project root>/data]
    #[arg(long, global = true, env = "TUBEGRAPH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Append line membership on every load, even when already present
    #[arg(long, global = true)]
    allow_duplicate_membership: bool,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log every row decision
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load stations and connections for every line, or the named ones
    Load {
        /// Line to load (repeatable)
        #[arg(long = "line", value_name = "NAME")]
        lines: Vec<String>,
    },
    /// Delete the whole graph, then load
    Reload {
        /// Confirm deleting every node and relationship
        #[arg(long)]
        yes: bool,

        /// Line to load (repeatable)
        #[arg(long = "line", value_name = "NAME")]
        lines: Vec<String>,
    },
    /// Delete every node and relationship
    Wipe {
        /// Confirm deleting every node and relationship
        #[arg(long)]
        yes: bool,
    },
    /// List the configured lines
    Lines,
    /// Show node and edge counts
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env is fine; everything has a default or a flag
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let registry = TubeLineList::default();

    let client = connect(&cli.database_url)
        .with_context(|| format!("cannot open graph at {}", cli.database_url))?;

    let membership = if cli.allow_duplicate_membership {
        MembershipPolicy::AppendAlways
    } else {
        MembershipPolicy::Deduplicate
    };
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let loader = Loader::new(client.clone(), LoaderConfig::new(data_dir).with_membership(membership));

    match &cli.command {
        Commands::Load { lines } => {
            let selected = select_lines(&registry, lines)?;
            let result = loader.load_lines(selected).await;
            finish_load(client.as_ref(), result, &cli.format).await
        }
        Commands::Reload { yes, lines } => {
            let selected = select_lines(&registry, lines)?;
            let result = loader
                .reload(selected, WipeConfirmation::from(*yes))
                .await;
            finish_load(client.as_ref(), result, &cli.format).await
        }
        Commands::Wipe { yes } => {
            let removed = loader
                .wipe(WipeConfirmation::from(*yes))
                .await
                .context("wipe failed (pass --yes to confirm)")?;
            println!(
                "Deleted {} node(s) and {} relationship(s)",
                removed.nodes, removed.edges
            );
            Ok(())
        }
        Commands::Status => run_status(client.as_ref(), &cli.format).await,
        Commands::Lines => run_lines(&registry, &cli.format),
    }
}

/// Named lines, or the whole registry when none are given
fn select_lines<'a>(registry: &'a TubeLineList, names: &[String]) -> Result<Vec<&'a TubeLine>> {
    if names.is_empty() {
        return Ok(registry.iter().collect());
    }
    Ok(registry.select(names)?)
}

/// Print the reports; on failure flush whatever was applied before the
/// failing row so a rerun picks up from a consistent prefix.
async fn finish_load(
    client: &dyn GraphClient,
    result: tubegraph::LoadResult<Vec<LineLoadReport>>,
    format: &OutputFormat,
) -> Result<()> {
    match result {
        Ok(reports) => {
            print_reports(&reports, format)?;
            Ok(())
        }
        Err(e) => {
            if let Err(flush_err) = client.flush().await {
                tracing::warn!("could not persist partial load: {}", flush_err);
            }
            Err(anyhow::Error::new(e).context(format!("load into {} failed", client.describe())))
        }
    }
}

fn print_reports(reports: &[LineLoadReport], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = reports
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "line": r.line_name,
                        "stations_created": r.stations.created,
                        "stations_updated": r.stations.updated,
                        "connections_created": r.connections.created,
                        "connections_skipped": r.connections.skipped,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                "Line",
                "Stations created",
                "Stations updated",
                "Connections created",
                "Connections skipped",
            ]);
            for r in reports {
                table.add_row(vec![
                    r.line_name.clone(),
                    r.stations.created.to_string(),
                    r.stations.updated.to_string(),
                    r.connections.created.to_string(),
                    r.connections.skipped.to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} line(s) loaded", reports.len());
        }
    }
    Ok(())
}

fn run_lines(registry: &TubeLineList, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = registry
                .iter()
                .map(|line| {
                    serde_json::json!({
                        "line_name": line.line_name,
                        "line_colour": line.line_colour,
                        "data_file_name": line.data_file_name,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Line", "Colour", "Data file"]);
            for line in registry {
                table.add_row(vec![
                    line.line_name.as_str(),
                    line.line_colour.as_str(),
                    line.data_file_name.as_str(),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

async fn run_status(client: &dyn GraphClient, format: &OutputFormat) -> Result<()> {
    let stats = client
        .status()
        .await
        .with_context(|| format!("cannot read status of {}", client.describe()))?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "backend": client.describe(),
                    "nodes": stats.nodes,
                    "edges": stats.edges,
                }))?
            );
        }
        OutputFormat::Table => {
            println!("Backend: {}", client.describe());
            println!("Nodes:   {}", stats.nodes);
            println!("Edges:   {}", stats.edges);
        }
    }
    Ok(())
}
