use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("archive format invalid: {0}")]
    ArchiveFormat(String),
    #[error("encoding invalid: {0}")]
    Encoding(String),
    #[error("json parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("config invalid: {0}")]
    Config(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage(_) => ErrorKind::Usage,
            Self::Io { .. } => ErrorKind::Io,
            Self::ArchiveFormat(_) => ErrorKind::ArchiveFormat,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Io,
    ArchiveFormat,
    Encoding,
    Parse,
    Validation,
    Config,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usage => "USAGE",
            Self::Io => "IO",
            Self::ArchiveFormat => "ARCHIVE_FORMAT",
            Self::Encoding => "ENCODING",
            Self::Parse => "PARSE",
            Self::Validation => "VALIDATION",
            Self::Config => "CONFIG",
        }
    }
}

/// Exit status for a failed run: `2` when the root cause is a usage error,
/// `1` otherwise.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ConvertError>())
        .map(ConvertError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::{ConvertError, ErrorKind, exit_code_for};
    use anyhow::Context;

    #[test]
    fn usage_errors_exit_with_two_even_when_wrapped() {
        let err = Err::<(), _>(ConvertError::Usage("pick one".to_string()))
            .context("resolving direction")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = anyhow::Error::new(ConvertError::Validation("bad date".to_string()));
        assert_eq!(exit_code_for(&err), 1);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }

    #[test]
    fn io_error_message_names_the_path() {
        let err = ConvertError::io(
            "/tmp/missing.daylio",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/tmp/missing.daylio"));
    }
}
