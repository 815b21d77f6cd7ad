//! Program routing.
//!
//! Every emulated program is a [`Tool`] registered under its Program Identity: the last `/`
//! segment of the invoked path with `.` replaced by `_` (`/opt/bin/seq_cache_populate.pl` ->
//! `seq_cache_populate_pl`). There is no fallback entry: an unknown identity is always an
//! `Unrecognized::Program` failure.

use crate::session::Session;
use crate::tools;
use anyhow::Result;
use std::collections::BTreeMap;

pub trait Tool {
    /// Program Identity this tool is registered under.
    fn name(&self) -> &'static str;

    /// Emulate one invocation. `args` excludes the program itself.
    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()>;
}

pub fn program_identity(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).replace('.', "_")
}

#[derive(Default)]
pub struct Registry {
    tools: BTreeMap<&'static str, Box<dyn Tool>>,
}

impl Registry {
    pub fn empty() -> Self {
        Registry::default()
    }

    /// All emulated programs.
    pub fn standard() -> Self {
        let mut registry = Registry::empty();
        tools::register_all(&mut registry);
        registry
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    pub fn lookup(&self, identity: &str) -> Option<&dyn Tool> {
        self.tools.get(identity).map(|t| t.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }
}
