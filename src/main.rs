mod config;
mod dataset;
mod dates;
mod error;
mod extractor;
#[cfg(test)]
mod fixtures;
mod naming;
mod stats;

use crate::config::Config;
use crate::extractor::Extractor;
use crate::stats::Statistic;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the data files (overrides the configuration file).
    #[arg(long, env = "DATA_HOME")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct RangeArgs {
    #[arg(long, default_value = "20151015")]
    start_date: String,

    #[arg(long, default_value = "20151115")]
    end_date: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one summary value per data file in the date range as JSON.
    Extract {
        #[arg(long, default_value = "temp_mean")]
        variable: String,

        #[command(flatten)]
        range: RangeArgs,

        #[arg(long, value_enum)]
        stat: Option<Statistic>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print the data files in the date range and their variables as JSON.
    Scan {
        #[command(flatten)]
        range: RangeArgs,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = match (args.config, args.data_dir) {
        (Some(file), data_dir) => {
            let mut cfg = Config::from_file(&file).context("failed to construct cfg")?;
            if let Some(data_dir) = data_dir {
                cfg.data_dir = data_dir;
            }
            cfg
        }
        (None, Some(data_dir)) => Config::new(data_dir),
        (None, None) => Config::default(),
    };

    match args.command {
        Command::Extract {
            variable,
            range,
            stat,
            pretty,
        } => {
            if let Some(stat) = stat {
                cfg.stat = stat;
            }
            log::info!("{cfg:#?}");

            let extractor = Extractor::new(cfg);
            let output = if pretty {
                let records = extractor
                    .records(&variable, &range.start_date, &range.end_date)
                    .context("failed to extract records")?;
                serde_json::to_string_pretty(&records).context("failed to serialize records")?
            } else {
                extractor
                    .to_json(&variable, &range.start_date, &range.end_date)
                    .context("failed to extract records")?
            };
            println!("{output}");
        }
        Command::Scan { range } => {
            log::info!("{cfg:#?}");

            let entries = Extractor::new(cfg)
                .scan(&range.start_date, &range.end_date)
                .context("failed to scan data files")?;
            let output =
                serde_json::to_string_pretty(&entries).context("failed to serialize entries")?;
            println!("{output}");
        }
    }

    Ok(())
}
