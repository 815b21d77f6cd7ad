//! `java -jar /gatk/gatk.jar <Tool> ...`
//!
//! JVM options before `-jar` are ignored. Supported GATK 4 tools:
//! - `HaplotypeCaller`, `GenotypeGVCFs`: touch `-O`, plus `<O>.tbi` (bgzipped output) or `<O>.idx`
//!   when `-OVI` is enabled, plus `<O>.md5` when `-OVM` is enabled.
//! - `GenomicsDBImport`: create the workspace directory; an existing workspace is fine.

use super::subcommand;
use crate::argspec::{Mode, Opt, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use anyhow::Result;
use log::info;

pub const GATK_JAR: &str = "/gatk/gatk.jar";

const VARIANT_OUTPUT: Schema = Schema::new(
    "gatk",
    &[
        Opt::value(&["-O", "--output"], "output"),
        Opt::value(&["-OVI", "--create-output-variant-index"], "variant_index"),
        Opt::value(&["-OVM", "--create-output-variant-md5"], "variant_md5"),
    ],
    &[],
);

const GENOMICSDB_IMPORT: Schema = Schema::new(
    "gatk",
    &[Opt::value(&["--genomicsdb-workspace-path"], "workspace")],
    &[],
);

/// GATK boolean arguments: anything but `false` turns the feature on.
fn enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.eq_ignore_ascii_case("false"))
}

pub struct Java;

impl Tool for Java {
    fn name(&self) -> &'static str {
        "java"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        let jar_at = args
            .iter()
            .position(|a| a == "-jar")
            .ok_or_else(|| Unrecognized::command("java", "no -jar given"))?;
        let jar = args
            .get(jar_at + 1)
            .ok_or_else(|| Unrecognized::command("java", "-jar needs a path"))?;
        if jar != GATK_JAR {
            return Err(Unrecognized::command("java", format!("jar {jar:?}")).into());
        }
        gatk(session, &args[jar_at + 2..])
    }
}

fn gatk(session: &mut Session<'_>, args: &[String]) -> Result<()> {
    let tool = subcommand(args);
    match tool {
        "HaplotypeCaller" | "GenotypeGVCFs" => {
            info!("emulating gatk 4 command {tool}");
            let parsed = VARIANT_OUTPUT.parse(&args[1..], Mode::Known)?;
            let output = parsed
                .value("output")
                .ok_or_else(|| Unrecognized::command("gatk", format!("{tool} without -O/--output")))?;
            session.touch(output)?;
            if enabled(parsed.value("variant_index")) {
                let suffix = if output.ends_with(".gz") { "tbi" } else { "idx" };
                session.touch(format!("{output}.{suffix}"))?;
            }
            if enabled(parsed.value("variant_md5")) {
                session.touch(format!("{output}.md5"))?;
            }
            Ok(())
        }
        "GenomicsDBImport" => {
            info!("emulating gatk 4 command {tool}");
            let parsed = GENOMICSDB_IMPORT.parse(&args[1..], Mode::Known)?;
            let workspace = parsed
                .value("workspace")
                .ok_or_else(|| Unrecognized::command("gatk", "GenomicsDBImport without --genomicsdb-workspace-path"))?;
            session.mkdir_tolerant(workspace)
        }
        other => Err(Unrecognized::command("gatk", format!("tool {other:?}")).into()),
    }
}
