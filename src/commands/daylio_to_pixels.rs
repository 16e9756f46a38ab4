use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::commands::CommandReport;
use crate::convert::archive::decode_archive;
use crate::convert::config::ConvertConfig;
use crate::convert::model::DaylioBackup;
use crate::convert::paths::{pixels_output_path, pretty_dump_path};
use crate::convert::to_pixels::daylio_to_pixels;
use crate::convert::util::{read_input, sha256_hex, write_atomic};
use crate::error::ConvertError;
use crate::logging;

#[derive(Debug, Clone)]
pub struct DaylioToPixelsOptions {
    pub input: PathBuf,
    pub config: ConvertConfig,
}

fn write_pretty_dump(input: &Path, json: &str) -> Result<PathBuf> {
    let value: Value = serde_json::from_str(json)?;
    let path = pretty_dump_path(input);
    let pretty = serde_json::to_string_pretty(&value)?;
    write_atomic(&path, pretty.as_bytes())?;
    Ok(path)
}

pub fn run(opts: &DaylioToPixelsOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("daylio-to-pixels");
    let input = opts.input.as_path();
    let output = pixels_output_path(input);
    report.detail(format!("input={}", input.display()));

    let bytes = read_input(input).context("failed to read daylio backup")?;
    let json = decode_archive(&bytes)
        .with_context(|| format!("failed to unpack daylio backup {}", input.display()))?;
    let backup: DaylioBackup = serde_json::from_str(&json)
        .map_err(ConvertError::from)
        .with_context(|| format!("failed to parse daylio backup {}", input.display()))?;

    if let Some(version) = backup.rest.get("version") {
        report.detail(format!("source.version={version}"));
    }
    logging::info(
        "convert_start",
        &[
            ("direction", "daylio-to-pixels"),
            ("input", &input.display().to_string()),
            ("entries", &backup.day_entries.len().to_string()),
        ],
    );
    if backup.day_entries.is_empty() {
        logging::warn("empty_input", &[("input", &input.display().to_string())]);
    }

    let conversion = daylio_to_pixels(&backup.day_entries)
        .with_context(|| format!("failed to map daylio entries from {}", input.display()))?;
    for merged in &conversion.merged_days {
        logging::info(
            "day_averaged",
            &[
                ("date", &merged.date),
                ("entries", &merged.entries.to_string()),
            ],
        );
    }
    for date in &conversion.clamped_days {
        logging::warn("mood_clamped", &[("date", date)]);
    }

    let encoded = serde_json::to_string(&conversion.days)?;
    write_atomic(&output, encoded.as_bytes())
        .with_context(|| format!("failed to write pixels backup {}", output.display()))?;
    logging::info("convert_done", &[("output", &output.display().to_string())]);

    report.detail(format!("output={}", output.display()));
    report.detail(format!("source_entries={}", conversion.source_entries));
    report.detail(format!("pixels_written={}", conversion.days.len()));
    report.detail(format!("days_averaged={}", conversion.merged_days.len()));
    report.detail(format!("days_clamped={}", conversion.clamped_days.len()));
    report.detail(format!("output.sha256={}", sha256_hex(encoded.as_bytes())));
    report.detail("note=pixel values are clamped between 1 (worst) and 5 (best)");
    report.detail(
        "note=multiple entries on one day are averaged, then rounded, then clamped",
    );
    report.detail("note=tags and custom moods are not carried into pixels data");

    if opts.config.write_pretty {
        match write_pretty_dump(input, &json) {
            Ok(path) => report.detail(format!("pretty_dump={}", path.display())),
            Err(err) => report.issue(format!("pretty dump failed: {err:#}")),
        }
    }

    Ok(report)
}
