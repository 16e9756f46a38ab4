use crate::error::ConvertError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::io::{Cursor, Read, Write};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Name of the single entry inside a Daylio backup archive.
pub const BACKUP_ENTRY_NAME: &str = "backup.daylio";

/// Daylio's exporter breaks its base64 payload after every 76th character.
pub const BASE64_LINE_WIDTH: usize = 76;

pub fn decode_archive(bytes: &[u8]) -> Result<String, ConvertError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ConvertError::ArchiveFormat(format!("not a readable zip archive: {e}")))?;

    let mut file = match archive.by_name(BACKUP_ENTRY_NAME) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(ConvertError::ArchiveFormat(format!(
                "archive has no `{BACKUP_ENTRY_NAME}` entry"
            )));
        }
        Err(e) => {
            return Err(ConvertError::ArchiveFormat(format!(
                "failed to open `{BACKUP_ENTRY_NAME}`: {e}"
            )));
        }
    };

    let mut raw = Vec::new();
    file.read_to_end(&mut raw).map_err(|e| {
        ConvertError::ArchiveFormat(format!("failed to read `{BACKUP_ENTRY_NAME}`: {e}"))
    })?;

    let compact: Vec<u8> = raw
        .into_iter()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let decoded = BASE64
        .decode(&compact)
        .map_err(|e| ConvertError::Encoding(format!("invalid base64 payload: {e}")))?;

    String::from_utf8(decoded)
        .map_err(|e| ConvertError::Encoding(format!("payload is not valid UTF-8: {e}")))
}

pub fn wrap_base64(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 1);
    for (i, ch) in encoded.chars().enumerate() {
        out.push(ch);
        if (i + 1) % BASE64_LINE_WIDTH == 0 {
            out.push('\n');
        }
    }
    out
}

pub fn encode_archive(json: &str) -> Result<Vec<u8>, ConvertError> {
    let wrapped = wrap_base64(&BASE64.encode(json.as_bytes()));

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut cursor);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);
        writer
            .start_file(BACKUP_ENTRY_NAME, options)
            .map_err(|e| ConvertError::ArchiveFormat(format!("failed to start entry: {e}")))?;
        writer
            .write_all(wrapped.as_bytes())
            .map_err(|e| ConvertError::ArchiveFormat(format!("failed to write entry: {e}")))?;
        writer
            .finish()
            .map_err(|e| ConvertError::ArchiveFormat(format!("failed to finish archive: {e}")))?;
    }
    Ok(cursor.into_inner())
}
