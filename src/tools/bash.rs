//! `bash`: the interval-list-to-JSON script and `bash -c` pipelines.
//!
//! Two shapes are recognised:
//! - `bash /interval_list_to_json.sh <interval_list>` prints the non-header lines as a JSON array,
//!   or `["1:2-3"]` when there are none, so downstream scatters always get at least one item.
//! - `bash -c "<command>"` where the tokenised command is one of the known pipelines below.

use super::subcommand;
use crate::argspec::{Mode, Opt, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::pyjson;
use crate::session::Session;
use crate::shlex;
use crate::template::{first_match, Match, Slot, Template};
use crate::textio::read_lines;
use anyhow::Result;
use log::info;
use regex::Regex;

const INTERVAL_LIST_TO_JSON: &str = "/interval_list_to_json.sh";
const FALLBACK_INTERVAL: &str = "1:2-3";
const READ_GROUP_COUNT: usize = 8;

const OPTIONS: Schema = Schema::new("bash", &[Opt::value(&["-c"], "command")], &[]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pipeline {
    /// `samtools view -H <bam> | awk <prog> > <out>`
    ListReadGroups,
    /// `cat <interval_list> | awk '/^@/ || $1~/<regex>/' > <out>`
    FilterIntervalList,
}

const LIST_RGS: &[Slot] = &[
    Slot::Lit("samtools"),
    Slot::Lit("view"),
    Slot::Lit("-H"),
    Slot::Any,
    Slot::Lit("|"),
    Slot::Lit("awk"),
    Slot::Any,
    Slot::Lit(">"),
    Slot::Any,
];

const FILTER_INTERVAL_LIST: &[Slot] = &[
    Slot::Lit("cat"),
    Slot::Any,
    Slot::Lit("|"),
    Slot::Lit("awk"),
    Slot::Any,
    Slot::Lit(">"),
    Slot::Any,
];

/// Header lines or lines whose first field matches the captured chromosome regex.
const CHROMOSOME_FILTER: &str = r"/\^@/\s*\|\|\s*\$1~/([^/]+)/";

fn pipelines() -> Result<Vec<(Pipeline, Template)>> {
    Ok(vec![
        (Pipeline::ListReadGroups, Template::new(LIST_RGS)),
        (
            Pipeline::FilterIntervalList,
            Template::new(FILTER_INTERVAL_LIST).with_guard(1, CHROMOSOME_FILTER)?,
        ),
    ])
}

pub struct Bash;

impl Tool for Bash {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        if subcommand(args) == INTERVAL_LIST_TO_JSON {
            return interval_list_to_json(session, args);
        }
        let parsed = OPTIONS.parse(args, Mode::Known)?;
        match parsed.value("command") {
            Some(command) => run_command_string(session, command),
            None => Err(Unrecognized::command("bash", "expected a known script or -c <command>").into()),
        }
    }
}

fn interval_list_to_json(session: &mut Session<'_>, args: &[String]) -> Result<()> {
    let input = args
        .get(1)
        .ok_or_else(|| Unrecognized::command("bash", "interval_list_to_json.sh needs an input"))?;
    info!("emulating interval_list_to_json");
    let mut lines: Vec<String> = read_lines(session.resolve(input))?
        .into_iter()
        .filter(|l| !l.starts_with('@'))
        .collect();
    if lines.is_empty() {
        info!("no lines found, using fallback output");
        lines.push(FALLBACK_INTERVAL.to_string());
    }
    session.emit(&pyjson::to_string(&lines)?)?;
    info!("scattering note: {} list items written", lines.len());
    Ok(())
}

fn run_command_string(session: &mut Session<'_>, command: &str) -> Result<()> {
    let tokens = shlex::split(command).map_err(Unrecognized::from)?;
    info!("with command line: {:?}", tokens);
    let candidates = pipelines()?;
    match first_match(&candidates, &tokens) {
        Some((Pipeline::ListReadGroups, m)) => list_read_groups(session, &m),
        Some((Pipeline::FilterIntervalList, m)) => filter_interval_list(session, &m),
        None => Err(Unrecognized::command("bash", format!("command string {command:?}")).into()),
    }
}

fn list_read_groups(session: &mut Session<'_>, m: &Match<'_>) -> Result<()> {
    info!("emulating list_rgs with infile {:?}", m.wildcard(0));
    let body: String = (1..=READ_GROUP_COUNT).map(|i| format!("{i}\n")).collect();
    session.write_file(m.wildcard(2), body.as_bytes())?;
    info!("scattering note: {READ_GROUP_COUNT} lines written");
    Ok(())
}

fn filter_interval_list(session: &mut Session<'_>, m: &Match<'_>) -> Result<()> {
    let chromosomes = m
        .group(1)
        .ok_or_else(|| Unrecognized::command("bash", "awk filter has no chromosome regex"))?;
    let keep = Regex::new(&format!("^(?:@|{chromosomes})"))
        .map_err(|e| Unrecognized::command("bash", format!("chromosome regex {chromosomes:?}: {e}")))?;
    info!("emulating filter_interval_list with regex {:?}", keep.as_str());

    let kept: String = read_lines(session.resolve(m.wildcard(0)))?
        .into_iter()
        .filter(|line| {
            let field = line.split('\t').next().unwrap_or("");
            // `$` in the awk-side regex may sit just before the line terminator.
            keep.is_match(field.strip_suffix('\n').unwrap_or(field))
        })
        .collect();
    session.write_file(m.wildcard(2), kept.as_bytes())
}
