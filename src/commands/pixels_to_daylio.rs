use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::commands::CommandReport;
use crate::convert::archive::encode_archive;
use crate::convert::config::ConvertConfig;
use crate::convert::model::PixelsDay;
use crate::convert::paths::{daylio_output_path, pretty_dump_path};
use crate::convert::skeleton::build_backup;
use crate::convert::to_daylio::{DaylioEntryOptions, pixels_to_daylio};
use crate::convert::util::{read_input, sha256_hex, write_atomic};
use crate::error::ConvertError;
use crate::logging;

#[derive(Debug, Clone)]
pub struct PixelsToDaylioOptions {
    pub input: PathBuf,
    pub config: ConvertConfig,
    /// Creation timestamp stamped into the skeleton, epoch milliseconds.
    pub now_millis: i64,
}

fn write_pretty_dump(input: &Path, pixels: &[PixelsDay]) -> Result<PathBuf> {
    let path = pretty_dump_path(input);
    let pretty = serde_json::to_string_pretty(pixels)?;
    write_atomic(&path, pretty.as_bytes())?;
    Ok(path)
}

fn parse_pixels(bytes: &[u8]) -> Result<Vec<PixelsDay>, ConvertError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ConvertError::Encoding(format!("pixels backup is not valid UTF-8: {e}")))?;
    let root: Value = serde_json::from_str(text)?;
    if !root.is_array() {
        return Err(ConvertError::Validation(
            "pixels backup must be a JSON array of days".to_string(),
        ));
    }
    serde_json::from_value(root).map_err(|e| ConvertError::Validation(e.to_string()))
}

pub fn run(opts: &PixelsToDaylioOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("pixels-to-daylio");
    let input = opts.input.as_path();
    let output = daylio_output_path(input);
    report.detail(format!("input={}", input.display()));

    let entry_opts = DaylioEntryOptions {
        timezone: opts.config.tz()?,
        datetime_unit: opts.config.datetime_unit,
    };

    let bytes = read_input(input).context("failed to read pixels backup")?;
    let pixels = parse_pixels(&bytes)
        .with_context(|| format!("failed to parse pixels backup {}", input.display()))?;
    logging::info(
        "convert_start",
        &[
            ("direction", "pixels-to-daylio"),
            ("input", &input.display().to_string()),
            ("entries", &pixels.len().to_string()),
        ],
    );
    if pixels.is_empty() {
        logging::warn("empty_input", &[("input", &input.display().to_string())]);
    }

    let day_entries = pixels_to_daylio(&pixels, &entry_opts)
        .with_context(|| format!("failed to convert pixels backup {}", input.display()))?;
    let backup = build_backup(&day_entries, opts.now_millis)?;
    let json = serde_json::to_string(&backup)?;
    let archive = encode_archive(&json)?;
    logging::debug(
        "archive_encoded",
        &[
            ("json_bytes", &json.len().to_string()),
            ("zip_bytes", &archive.len().to_string()),
        ],
    );

    write_atomic(&output, &archive)
        .with_context(|| format!("failed to write daylio backup {}", output.display()))?;
    logging::info("convert_done", &[("output", &output.display().to_string())]);

    report.detail(format!("output={}", output.display()));
    report.detail(format!("pixels_read={}", pixels.len()));
    report.detail(format!("entries_written={}", day_entries.len()));
    report.detail(format!("timezone={}", entry_opts.timezone.name()));
    report.detail(format!("datetime_unit={}", entry_opts.datetime_unit.as_str()));
    report.detail(format!("output.sha256={}", sha256_hex(&archive)));
    report.detail("note=every entry is logged at 20:00; pixels carry no time of day");
    report.detail("note=tags and custom moods are not carried into daylio data");

    if opts.config.write_pretty {
        match write_pretty_dump(input, &pixels) {
            Ok(path) => report.detail(format!("pretty_dump={}", path.display())),
            Err(err) => report.issue(format!("pretty dump failed: {err:#}")),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::parse_pixels;
    use crate::error::ErrorKind;

    #[test]
    fn parse_rejects_non_array_root() {
        let err = parse_pixels(br#"{"date":"2023-01-05"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn parse_distinguishes_malformed_json_from_bad_shape() {
        assert_eq!(parse_pixels(b"[{").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(
            parse_pixels(br#"[{"date":"2023-01-05"}]"#).unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(parse_pixels(&[0xff, 0x5b]).unwrap_err().kind(), ErrorKind::Encoding);
    }

    #[test]
    fn parse_accepts_real_pixels_shape() {
        let raw = br#"[{"type":"Mood","date":"2023-01-05","entries":[{"type":"Mood","value":4,"notes":"hi","isHighlighted":false,"tags":[{"type":"Emotions","entries":["calm"]}]}],"scale":[]}]"#;
        let pixels = parse_pixels(raw).expect("parse");
        assert_eq!(pixels.len(), 1);
        assert_eq!(pixels[0].entries[0].value, 4);
    }
}
