mod app;
mod commands;
mod config;
mod error;
mod view;

use crate::error::Result;

fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},ledger={level}",
            level = config.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let app = app::App::new(config)?;
    app.run(std::io::stdin().lock())
}
