use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "tally.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level for the `tally` and `ledger` targets.
    pub level: String,
    /// Prefix used when printing amounts.
    pub currency_symbol: String,
    /// Load the demo records at startup.
    pub samples: bool,
    /// Initial sort, as `<field>-<direction>`.
    pub sort: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            currency_symbol: "$".to_string(),
            samples: false,
            sort: "date-desc".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Track income and expenses from the terminal")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Override currency symbol.
    #[arg(long)]
    currency_symbol: Option<String>,
    /// Start with the demo records.
    #[arg(long)]
    samples: bool,
    /// Override initial sort (e.g. amount-asc).
    #[arg(long)]
    sort: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(level) = args.level {
        settings.level = level;
    }
    if let Some(symbol) = args.currency_symbol {
        settings.currency_symbol = symbol;
    }
    if args.samples {
        settings.samples = true;
    }
    if let Some(sort) = args.sort {
        settings.sort = sort;
    }

    Ok(settings)
}
