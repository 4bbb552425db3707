//! MiniDB entry point
//!
//! Runs a script file when `--file` is given, otherwise an interactive prompt.

use std::{fs::File, io::BufReader};

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use minidb::{
    repl::{self, Cli},
    sql::engine::{Engine, kv::KVEngine},
    storage::memory::MemoryEngine,
};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with statement results
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let mut session = KVEngine::new(MemoryEngine::new()).session();

    match cli.file {
        Some(path) => {
            let file = File::open(&path)?;
            let count = repl::run_script(&mut session, BufReader::new(file), &mut std::io::stdout().lock())?;
            info!(path = %path.display(), count, "script finished");
        }
        None => repl::repl(&mut session, &cli.prompt)?,
    }
    Ok(())
}
