use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn is_gz(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("gz")).unwrap_or(false)
}

/// Open a text input, transparently decompressing `.gz` files.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(path)
        .with_context(|| format!("Failed to open input: {}", path.display()))?;
    if is_gz(path) {
        let gz = MultiGzDecoder::new(f);
        Ok(Box::new(BufReader::new(gz)))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

/// Read every line of `path`, keeping the terminator (CRLF folded to LF).
/// A final line without a newline is returned as-is.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path_ref: &Path = path.as_ref();
    let mut rdr = open_maybe_gz(path_ref)?;
    let mut lines = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = rdr
            .read_line(&mut line)
            .with_context(|| format!("Failed to read {}", path_ref.display()))?;
        if bytes == 0 { break; }
        if line.ends_with("\r\n") {
            line.truncate(line.len() - 2);
            line.push('\n');
        }
        lines.push(line.clone());
    }
    Ok(lines)
}
