use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" | "trace" => Some(Self::Debug),
            _ => None,
        }
    }
}

static MAX_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

/// Set the threshold from `MOODBRIDGE_LOG`, or force errors only when `quiet`.
pub fn init(quiet: bool) {
    let level = if quiet {
        Level::Error
    } else {
        std::env::var("MOODBRIDGE_LOG")
            .ok()
            .and_then(|raw| Level::parse(&raw))
            .unwrap_or(Level::Warn)
    };
    MAX_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn enabled(level: Level) -> bool {
    (level as u8) <= MAX_LEVEL.load(Ordering::Relaxed)
}

fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

fn render(level: Level, event: &str, fields: &[(&str, &str)]) -> String {
    let mut line = format!(
        "moodbridge level={} event={}",
        level.as_str(),
        sanitize_value(event)
    );
    for (key, value) in fields {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&sanitize_value(value));
    }
    line
}

pub fn emit(level: Level, event: &str, fields: &[(&str, &str)]) {
    if !enabled(level) {
        return;
    }
    eprintln!("{}", render(level, event, fields));
}

pub fn error(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Error, event, fields);
}

pub fn warn(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Warn, event, fields);
}

pub fn info(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Info, event, fields);
}

pub fn debug(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Debug, event, fields);
}
