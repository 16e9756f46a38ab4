pub mod daylio_to_pixels;
pub mod pixels_to_daylio;

use serde::Serialize;
use std::path::PathBuf;

use crate::error::ConvertError;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    DaylioToPixels(PathBuf),
    PixelsToDaylio(PathBuf),
}

const DIRECTION_USAGE: &str =
    "pass the path to your Daylio backup (-d) *or* your Year in Pixels backup (-p), not both";

pub fn resolve_direction(
    daylio: Option<PathBuf>,
    pixels: Option<PathBuf>,
) -> Result<Direction, ConvertError> {
    match (daylio, pixels) {
        (Some(path), None) => Ok(Direction::DaylioToPixels(path)),
        (None, Some(path)) => Ok(Direction::PixelsToDaylio(path)),
        _ => Err(ConvertError::Usage(DIRECTION_USAGE.to_string())),
    }
}
