use std::collections::BTreeSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const KEY_PREFIX: &str = "MOODBRIDGE_";

/// Callees whose first argument names an environment variable.
fn reads_env(callee: &str) -> bool {
    matches!(callee, "var" | "var_os") || callee.starts_with("env_")
}

fn source_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Identifier directly before `(` that opens the call whose first argument
/// starts at `literal_start`, or `None` if the literal is not a first argument.
fn callee_before(source: &str, literal_start: usize) -> Option<&str> {
    let head = source[..literal_start].trim_end();
    let head = head.strip_suffix('(')?.trim_end();
    let ident_start = head
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |i| i + 1);
    let ident = &head[ident_start..];
    (!ident.is_empty()).then_some(ident)
}

/// Keys passed as string literals to `env::var`, `env::var_os` or an
/// `env_*` helper. Other mentions of the prefix are ignored.
fn env_reads(source: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut rest = 0;
    while let Some(found) = source[rest..].find(&format!("\"{KEY_PREFIX}")) {
        let open = rest + found;
        let body_start = open + 1;
        rest = body_start;

        let Some(len) = source[body_start..].find('"') else {
            break;
        };
        let key = &source[body_start..body_start + len];
        let suffix = &key[KEY_PREFIX.len()..];
        if suffix.is_empty()
            || !suffix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
        {
            continue;
        }
        if callee_before(source, open).is_some_and(reads_env) {
            keys.push(key.to_string());
        }
    }
    keys
}

fn render_allowlist(keys: &BTreeSet<String>) -> String {
    let mut out = String::from("pub const GENERATED_ENV_ALLOWLIST: &[&str] = &[\n");
    for key in keys {
        let _ = writeln!(out, "    \"{key}\",");
    }
    out.push_str("];\n");
    out
}

fn main() -> io::Result<()> {
    let mut keys = BTreeSet::new();
    for file in source_files(Path::new("src"))? {
        keys.extend(env_reads(&fs::read_to_string(&file)?));
        println!("cargo:rerun-if-changed={}", file.display());
    }

    let out_dir = env::var_os("OUT_DIR")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR not set"))?;
    fs::write(
        Path::new(&out_dir).join("env_allowlist.rs"),
        render_allowlist(&keys),
    )?;

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    Ok(())
}
