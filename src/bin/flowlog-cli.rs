use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flowlog::config::load_config;
use flowlog::lifecycle::plan;
use flowlog::LogId;

#[derive(Parser)]
#[command(name = "flowlog-cli")]
#[command(about = "Tools for flowlog deployments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print freshly generated log ids
    Id {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Load a config file and show the sinks it would attach
    Check {
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Id { count } => {
            for _ in 0..count {
                println!("{}", LogId::generate());
            }
        }
        Commands::Check { path } => {
            let config = load_config(&path)?;
            let plan = plan(&config)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            for note in &plan.notes {
                eprintln!("{}: {}", note.level, note.message);
            }
        }
    }

    Ok(())
}
