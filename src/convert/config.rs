use crate::error::ConvertError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));

const ENV_KEY_PREFIX: &str = "MOODBRIDGE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatetimeUnit {
    Millis,
    Seconds,
}

impl DatetimeUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "millis" | "ms" | "milliseconds" => Some(Self::Millis),
            "seconds" | "secs" | "s" => Some(Self::Seconds),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Millis => "millis",
            Self::Seconds => "seconds",
        }
    }

    pub fn scale_millis(self, millis: i64) -> i64 {
        match self {
            Self::Millis => millis,
            Self::Seconds => millis.div_euclid(1000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub datetime_unit: DatetimeUnit,
    pub timezone: String,
    pub write_pretty: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            datetime_unit: DatetimeUnit::Millis,
            timezone: "UTC".to_string(),
            write_pretty: false,
        }
    }
}

impl ConvertConfig {
    pub fn tz(&self) -> Result<Tz, ConvertError> {
        self.timezone.trim().parse::<Tz>().map_err(|_| {
            ConvertError::Config(format!("unknown time zone `{}`", self.timezone))
        })
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_datetime_unit(var: &str, fallback: DatetimeUnit) -> Result<DatetimeUnit, ConvertError> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => DatetimeUnit::parse(&v).ok_or_else(|| {
            ConvertError::Config(format!("{var}=`{v}`: use `millis` or `seconds`"))
        }),
        _ => Ok(fallback),
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("MOODBRIDGE_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let base = dirs::config_dir()?;
    Some(base.join("moodbridge").join("config.toml"))
}

fn merge_file_config(base: &mut ConvertConfig) -> Result<(), ConvertError> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path).map_err(|e| ConvertError::io(&path, e))?;
    *base = toml::from_str(&raw).map_err(|err| {
        ConvertError::Config(format!("failed to parse {}: {err}", path.display()))
    })?;
    Ok(())
}

fn validate(cfg: &ConvertConfig) -> Result<(), ConvertError> {
    if cfg.timezone.trim().is_empty() {
        return Err(ConvertError::Config("time zone cannot be empty".to_string()));
    }
    cfg.tz()?;
    Ok(())
}

/// `MOODBRIDGE_*` variables set in the environment that the binary never reads.
pub fn unknown_env_keys<I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = keys
        .into_iter()
        .filter(|key| key.starts_with(ENV_KEY_PREFIX))
        .filter(|key| !GENERATED_ENV_ALLOWLIST.contains(&key.as_str()))
        .collect::<Vec<_>>();
    out.sort();
    out
}

pub fn load_config() -> Result<ConvertConfig, ConvertError> {
    let mut cfg = ConvertConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.datetime_unit = env_datetime_unit("MOODBRIDGE_DATETIME_UNIT", cfg.datetime_unit)?;
    cfg.timezone = env_or_string("MOODBRIDGE_TIMEZONE", &cfg.timezone);
    cfg.write_pretty = env_or_bool("MOODBRIDGE_WRITE_PRETTY", cfg.write_pretty);

    validate(&cfg)?;
    Ok(cfg)
}
