//! BubblePop shell binary.
//!
//! ```bash
//! # Interactive session (default)
//! cargo run -p bubblepop-client
//!
//! # Maintenance
//! cargo run -p bubblepop-client -- export --output backup.json
//! cargo run -p bubblepop-client -- import backup.json
//! cargo run -p bubblepop-client -- clear -y
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bubblepop_client::logging::{LOG_FILE, setup_logging};
use bubblepop_client::{ClientConfig, Shell};
use clap::{Args, Parser, Subcommand};
use console::style;
use tokio::io::BufReader;

/// BubblePop game shell
#[derive(Parser)]
#[command(name = "bubblepop")]
#[command(about = "BubblePop game shell with local save data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play an interactive session (default)
    Run,

    /// Print or write the save data as JSON
    Export(ExportArgs),

    /// Replace save data from an exported JSON file
    Import(ImportArgs),

    /// Delete all save data
    Clear(ClearArgs),

    /// Show where and how much data is stored
    Info,
}

#[derive(Args)]
struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
    /// Exported JSON file
    path: PathBuf,
}

#[derive(Args)]
struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging
    let _guard = setup_logging(&config.log_dir)?;

    tracing::info!("Starting BubblePop shell");
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!(
        "Auto-save: {} ({}ms)",
        config.persist.enabled,
        config.persist.debounce.as_millis()
    );

    // 3. Build shell
    let log_path = config.log_dir.join(LOG_FILE);
    let shell = Shell::open(config)?;

    // 4. Dispatch
    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let stdin = BufReader::new(tokio::io::stdin());
            shell.run(stdin, &mut io::stdout()).await
        }
        Command::Export(args) => export(&shell, args),
        Command::Import(args) => import(&shell, args),
        Command::Clear(args) => clear(&shell, args),
        Command::Info => info(&shell, &log_path),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    tracing::info!("BubblePop shell exited");
    result
}

fn export(shell: &Shell, args: ExportArgs) -> Result<()> {
    let document = shell.export()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Exported to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => println!("{document}"),
    }
    Ok(())
}

fn import(shell: &Shell, args: ImportArgs) -> Result<()> {
    shell.import(&args.path)?;
    println!(
        "{} Imported {}",
        style("✓").green(),
        style(args.path.display()).cyan()
    );
    Ok(())
}

fn clear(shell: &Shell, args: ClearArgs) -> Result<()> {
    println!("{}", style("Clear BubblePop save data").yellow().bold());
    println!("  {}", style(shell.info()?.data_dir.display()).dim());

    if !args.yes && !confirm()? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }

    if shell.clear() {
        println!("{}", style("✓ Save data cleared").green().bold());
    } else {
        println!(
            "{} Some data could not be removed, see the log for details",
            style("✗").red()
        );
    }
    Ok(())
}

fn info(shell: &Shell, log_path: &std::path::Path) -> Result<()> {
    let info = shell.info()?;

    println!("Data directory  {}", info.data_dir.display());
    println!("Log file        {}", log_path.display());
    println!(
        "Storage         {}",
        if info.available {
            style("available").green()
        } else {
            style("unavailable").red()
        }
    );
    println!(
        "Data version    {}",
        info.version.as_deref().unwrap_or("(none)")
    );
    println!("Size estimate   {} bytes", info.size_bytes);
    Ok(())
}

/// Prompt user for confirmation
fn confirm() -> Result<bool> {
    print!("{} ", style("Proceed? [y/N]").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
