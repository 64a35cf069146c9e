use clap::Parser;

use feedboard::config::{Cli, init_tracing};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    tracing::info!(database = %args.database.display(), "starting feedboard");
    feedboard::gui::run(args.database).map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
