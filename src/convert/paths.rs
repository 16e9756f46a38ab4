use std::ffi::OsString;
use std::path::{Path, PathBuf};

fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = input.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

pub fn pixels_output_path(input: &Path) -> PathBuf {
    with_suffix(input, "-converted.json")
}

pub fn daylio_output_path(input: &Path) -> PathBuf {
    with_suffix(input, "-converted.daylio")
}

pub fn pretty_dump_path(input: &Path) -> PathBuf {
    with_suffix(input, "-pretty.json")
}
