use clap::{Parser, Subcommand};

use roomly::Config;

#[derive(Parser)]
#[command(name = "roomly", about = "Room rental marketplace backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create a default config file
    Init,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Init) = cli.command {
        Config::create_default_if_missing()?;
        println!("✓ Config file created. Edit config.toml and run again.");
        return Ok(());
    }

    let config = Config::load()?;
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(roomly::run())
}
