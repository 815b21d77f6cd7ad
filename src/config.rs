use crate::delay::DelayRange;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const SEED_ENV: &str = "CWL_DUMMY_TOOL_SEED";
pub const DELAY_ENV: &str = "CWL_DUMMY_TOOL_DELAY_MINS";
pub const WORKDIR_ENV: &str = "CWL_DUMMY_TOOL_WORKDIR";
pub const LOG_ENV: &str = "CWL_DUMMY_TOOL_LOG";

/// Runtime settings. The environment provides defaults (the only source when the binary runs
/// under a tool's name); wrapper-form command-line options override them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub delay: Option<DelayRange>,
    pub workdir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed = get(SEED_ENV)
            .map(|v| v.trim().parse::<u64>().with_context(|| format!("{SEED_ENV}={v:?} is not an integer")))
            .transpose()?;
        let delay = get(DELAY_ENV)
            .map(|v| v.parse::<DelayRange>().map_err(|e| anyhow!("{DELAY_ENV}: {e}")))
            .transpose()?;
        let workdir = get(WORKDIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);
        Ok(Config { seed, delay, workdir })
    }

    /// Directory relative output paths resolve against.
    pub fn workdir(&self) -> Result<PathBuf> {
        match &self.workdir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine the working directory"),
        }
    }
}
