//! Side-effect primitives.
//!
//! A [`Session`] is the single place emulated tools touch the outside world: it resolves relative
//! paths against its working directory, performs the file/directory/stdout operation, narrates it
//! on the log (stderr) and records an [`Effect`]. It also owns redispatch into the registry, so a
//! handler that unwraps `sh -c` or a GATK wrapper simply calls [`Session::dispatch`] again.

use crate::dispatch::{program_identity, Registry};
use crate::error::Unrecognized;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// One observable result of an emulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreatedFile(PathBuf),
    CreatedDir(PathBuf),
    WroteFile(PathBuf),
    Stdout(String),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::CreatedFile(p) => write!(f, "created file {}", p.display()),
            Effect::CreatedDir(p) => write!(f, "created directory {}", p.display()),
            Effect::WroteFile(p) => write!(f, "wrote file {}", p.display()),
            Effect::Stdout(line) => write!(f, "printed {} bytes", line.len() + 1),
        }
    }
}

pub struct Session<'a> {
    registry: &'a Registry,
    workdir: PathBuf,
    out: &'a mut dyn Write,
    effects: Vec<Effect>,
    depth: usize,
}

impl<'a> Session<'a> {
    pub fn new(registry: &'a Registry, workdir: impl Into<PathBuf>, out: &'a mut dyn Write) -> Self {
        Session { registry, workdir: workdir.into(), out, effects: Vec::new(), depth: 0 }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Resolve `path` against the working directory (absolute paths pass through).
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.workdir.join(path)
    }

    /// Record an effect produced outside the primitives (e.g. by the interval splitter).
    pub fn record(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Create (or truncate) an empty file.
    pub fn touch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.resolve(path);
        info!("creating file {:?}", path);
        fs::File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        self.effects.push(Effect::CreatedFile(path));
        Ok(())
    }

    /// Create a single directory; an existing one is accepted silently.
    pub fn mkdir_tolerant(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.resolve(path);
        info!("creating directory {:?}", path);
        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => debug!("directory {:?} already exists", path),
            Err(e) => return Err(e).with_context(|| format!("Failed to create directory {}", path.display())),
        }
        self.effects.push(Effect::CreatedDir(path));
        Ok(())
    }

    pub fn write_file(&mut self, path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
        let path = self.resolve(path);
        info!("writing file {:?} ({} bytes)", path, contents.len());
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        self.effects.push(Effect::WroteFile(path));
        Ok(())
    }

    /// Write one line to stdout.
    pub fn emit(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").context("Failed to write to stdout")?;
        self.effects.push(Effect::Stdout(line.to_string()));
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("Failed to flush stdout")
    }

    /// Route `argv` to the tool named by its first element and run it.
    pub fn dispatch(&mut self, argv: &[String]) -> Result<()> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Unrecognized::Program(String::new()))?;
        let identity = program_identity(program);
        let registry = self.registry;
        let tool = registry.lookup(&identity).ok_or_else(|| {
            debug!("known programs: {}", registry.names().collect::<Vec<_>>().join(", "));
            Unrecognized::Program(identity.clone())
        })?;

        info!("{:indent$}emulating {}", "", tool.name(), indent = self.depth * 2);
        debug!("with argv: {:?}", args);
        self.depth += 1;
        let outcome = tool.handle(self, args);
        self.depth -= 1;
        outcome
    }
}
