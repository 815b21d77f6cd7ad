//! Interval list splitter (`split_interval_list`).
//!
//! Splits a Picard-style interval list into **exactly** `chunks` files. Every output carries the
//! full `@` header; interval records are distributed in input order so that each chunk covers
//! roughly the same number of bases (`end - start + 1`). When there are fewer records than chunks
//! the trailing files hold only the header.
//!
//! Outputs are named `<stem>_<NNNN>.interval_list` (zero-based) inside `output_dir`, which must
//! already exist.
//!
//! ### Example
//! ```text
//! wgs.interval_list, chunks = 3  =>  wgs_0000.interval_list wgs_0001.interval_list wgs_0002.interval_list
//! ```

use crate::textio::read_lines;
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

struct Interval {
    line: String,
    bases: u64,
}

fn parse_interval(line: &str) -> Result<Interval> {
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    if fields.len() < 3 {
        bail!("interval record has fewer than 3 fields: {:?}", line.trim_end());
    }
    let start: u64 = fields[1].parse().with_context(|| format!("bad start in {:?}", line.trim_end()))?;
    let end: u64 = fields[2].parse().with_context(|| format!("bad end in {:?}", line.trim_end()))?;
    let mut line = line.to_string();
    if !line.ends_with('\n') {
        line.push('\n');
    }
    Ok(Interval { line, bases: end.saturating_sub(start) + 1 })
}

fn output_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "intervals".to_string());
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    name.strip_suffix(".interval_list").unwrap_or(name).to_string()
}

/// Chunk index for each interval: the share of bases covered before it decides its bucket.
fn assign_chunks(intervals: &[Interval], chunks: usize) -> Vec<usize> {
    let total: u128 = intervals.iter().map(|i| i.bases as u128).sum();
    let mut before: u128 = 0;
    intervals
        .iter()
        .map(|iv| {
            let chunk = if total == 0 { 0 } else { (before * chunks as u128 / total) as usize };
            before += iv.bases as u128;
            chunk.min(chunks - 1)
        })
        .collect()
}

/// Split `path` into `chunks` interval lists under `output_dir`; returns the written paths.
pub fn split_interval_lists(chunks: usize, path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    if chunks == 0 {
        return Err(anyhow!("chunks must be greater than 0"));
    }
    let mut header = String::new();
    let mut intervals = Vec::new();
    for line in read_lines(path)? {
        if line.starts_with('@') {
            header.push_str(&line);
        } else if !line.trim().is_empty() {
            intervals.push(parse_interval(&line).with_context(|| format!("in {}", path.display()))?);
        }
    }

    let mut bodies = vec![header; chunks];
    for (iv, chunk) in intervals.iter().zip(assign_chunks(&intervals, chunks)) {
        bodies[chunk].push_str(&iv.line);
    }

    let stem = output_stem(path);
    let mut written = Vec::with_capacity(chunks);
    for (i, body) in bodies.iter().enumerate() {
        let out = output_dir.join(format!("{stem}_{i:04}.interval_list"));
        fs::write(&out, body).with_context(|| format!("Failed to write {}", out.display()))?;
        written.push(out);
    }
    Ok(written)
}
