use crate::argspec::{Mode, Opt, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use anyhow::Result;
use log::info;
use std::path::Path;

const OPTIONS: Schema = Schema::new("verifybamid_rg", &[Opt::value(&["-c", "--cram-file"], "cram_file")], &[]);
const REPORT_SUFFIX: &str = ".verifybamid2.out";

/// Report name in the working directory: `x.cram` -> `x.verifybamid2.out`, anything else keeps
/// its full name (`x.bam` -> `x.bam.verifybamid2.out`).
fn report_name(alignment: &str) -> Option<String> {
    let name = Path::new(alignment).file_name()?.to_str()?;
    let stem = match name.strip_suffix(".cram") {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    };
    Some(format!("{stem}{REPORT_SUFFIX}"))
}

pub struct VerifyBamIdRg;

impl Tool for VerifyBamIdRg {
    fn name(&self) -> &'static str {
        "verifybamid_rg"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        let parsed = OPTIONS.parse(args, Mode::Known)?;
        let cram = parsed
            .value("cram_file")
            .ok_or_else(|| Unrecognized::command("verifybamid_rg", "missing -c/--cram-file"))?;
        let report = report_name(cram)
            .ok_or_else(|| Unrecognized::command("verifybamid_rg", format!("no file name in {cram:?}")))?;
        info!("emulating verifybamid_rg");
        session.touch(report)
    }
}
