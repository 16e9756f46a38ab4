use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::commands::daylio_to_pixels::{self, DaylioToPixelsOptions};
use crate::commands::pixels_to_daylio::{self, PixelsToDaylioOptions};
use crate::commands::{CommandReport, Direction, resolve_direction};
use crate::convert::config::{load_config, unknown_env_keys};
use crate::convert::util::now_epoch_millis;
use crate::logging;

#[derive(Debug, Parser)]
#[command(
    name = "moodbridge",
    version,
    about = "Convert mood-journal backups between Daylio and Year in Pixels",
    after_help = "Examples:\n  \
        moodbridge -d mybackup.daylio      writes ./mybackup.daylio-converted.json\n  \
        moodbridge -p pixels-backup.json   writes ./pixels-backup.json-converted.daylio"
)]
pub struct Cli {
    /// Daylio backup to convert into a Year in Pixels JSON file.
    #[arg(short = 'd', long = "daylio", value_name = "FILE")]
    pub daylio: Option<PathBuf>,

    /// Year in Pixels backup to convert into a Daylio backup file.
    #[arg(short = 'p', long = "pixels", value_name = "FILE")]
    pub pixels: Option<PathBuf>,

    /// Also write a pretty-printed copy of the source JSON next to the input.
    #[arg(long)]
    pub pretty_dump: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

fn print_report(report: &CommandReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let status = if report.ok { "ok" } else { "failed" };
    println!("{}: {status}", report.command);
    for detail in &report.details {
        println!("  {detail}");
    }
    for issue in &report.issues {
        println!("  issue: {issue}");
    }
    Ok(())
}

fn warn_unknown_env() {
    for key in unknown_env_keys(std::env::vars().map(|(key, _)| key)) {
        logging::warn("unknown_env_var", &[("key", &key)]);
    }
}

pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.quiet);

    let direction = resolve_direction(cli.daylio, cli.pixels)?;
    warn_unknown_env();

    let mut config = load_config()?;
    if cli.pretty_dump {
        config.write_pretty = true;
    }

    let report = match direction {
        Direction::DaylioToPixels(input) => {
            daylio_to_pixels::run(&DaylioToPixelsOptions { input, config })?
        }
        Direction::PixelsToDaylio(input) => pixels_to_daylio::run(&PixelsToDaylioOptions {
            input,
            config,
            now_millis: now_epoch_millis(),
        })?,
    };

    print_report(&report, cli.json)?;
    Ok(report.ok)
}
