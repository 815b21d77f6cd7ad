//! cwl-dummy-tool: stand-in for the command-line tools a workflow calls
//!
//! Recognises the call shapes a pipeline makes to its tools and reproduces only their side effects
//! (empty output files, index files, directories, small stdout payloads). Anything it does not
//! recognise exits with status 127.
//!
//! Invocation forms:
//! - installed or symlinked under a tool's name: `samtools index foo.bam`
//! - wrapper: `cwl-dummy-tool [--seed N] [--delay-mins MIN[:MAX]] [--workdir DIR] samtools index foo.bam`

mod argspec;
mod config;
mod delay;
mod dispatch;
mod error;
mod interval_split;
mod pyjson;
mod session;
mod shlex;
mod template;
mod textio;
mod tools;

use anyhow::Result;
use clap::Parser;
use config::{Config, LOG_ENV};
use delay::DelayRange;
use dispatch::{program_identity, Registry};
use error::{Unrecognized, UNRECOGNIZED_EXIT};
use log::debug;
use session::Session;
use std::path::PathBuf;
use std::process::ExitCode;

/// cwl-dummy-tool CLI (wrapper form)
#[derive(Parser, Debug)]
#[command(name = "cwl-dummy-tool")]
#[command(author, version, about = "Emulate bioinformatics tool side effects for workflow tests", long_about = None)]
struct Cli {
    /// RNG seed for the simulated runtime delay
    #[arg(long = "seed", value_name = "INT")]
    seed: Option<u64>,

    /// Sleep a random number of minutes in this range before emulating
    #[arg(long = "delay-mins", value_name = "MIN[:MAX]")]
    delay_mins: Option<DelayRange>,

    /// Directory that relative output paths are resolved against
    #[arg(long = "workdir", value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Program to emulate, followed by its arguments
    #[arg(value_name = "PROGRAM", required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    invocation: Vec<String>,
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Split the process arguments into the emulated invocation and the effective configuration.
fn resolve_invocation(registry: &Registry, argv: Vec<String>) -> Result<(Vec<String>, Config)> {
    let mut config = Config::from_env()?;
    let called_as_tool = argv
        .first()
        .is_some_and(|arg0| registry.lookup(&program_identity(arg0)).is_some());
    if called_as_tool {
        return Ok((argv, config));
    }

    let cli = Cli::parse_from(argv);
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.delay_mins.is_some() {
        config.delay = cli.delay_mins;
    }
    if cli.workdir.is_some() {
        config.workdir = cli.workdir;
    }
    Ok((cli.invocation, config))
}

fn run() -> Result<()> {
    let registry = Registry::standard();
    let (invocation, config) = resolve_invocation(&registry, std::env::args().collect())?;
    if let Some(range) = config.delay {
        delay::pause(range, config.seed)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new(&registry, config.workdir()?, &mut out);
    session.dispatch(&invocation)?;
    for effect in session.effects() {
        debug!("{effect}");
    }
    session.flush()
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<Unrecognized>() {
            Some(unrecognized) => {
                eprintln!("{unrecognized}");
                ExitCode::from(UNRECOGNIZED_EXIT)
            }
            None => {
                eprintln!("{err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
