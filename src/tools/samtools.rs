use super::subcommand;
use crate::argspec::{Mode, Opt, Pos, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use anyhow::Result;
use log::info;

const OUTPUT: Schema = Schema::new("samtools", &[Opt::value(&["-o", "--output"], "output")], &[]);

const INDEX: Schema = Schema::new(
    "samtools index",
    &[Opt::flag(&["-b"], "bai"), Opt::flag(&["-c"], "csi"), Opt::value(&["-m"], "min_shift")],
    &[Pos::required("infile"), Pos::optional("outfile")],
);

/// Index file `samtools index` writes next to `infile` when no outfile is given.
fn default_index(infile: &str, csi: bool) -> Option<String> {
    if infile.ends_with(".cram") {
        Some(format!("{infile}.crai"))
    } else if infile.ends_with(".bam") {
        Some(format!("{infile}.{}", if csi { "csi" } else { "bai" }))
    } else {
        None
    }
}

pub struct Samtools;

impl Tool for Samtools {
    fn name(&self) -> &'static str {
        "samtools"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        let sub = subcommand(args);
        match sub {
            "fastaref" | "dict" => {
                info!("emulating samtools {sub}");
                let parsed = OUTPUT.parse(&args[1..], Mode::Known)?;
                let output = parsed
                    .value("output")
                    .ok_or_else(|| Unrecognized::command("samtools", format!("{sub} without -o/--output")))?;
                session.touch(output)
            }
            "faidx" => {
                info!("emulating samtools faidx");
                let fasta = args
                    .get(1)
                    .ok_or_else(|| Unrecognized::command("samtools", "faidx without a FASTA"))?;
                session.touch(format!("{fasta}.fai"))
            }
            "index" => {
                info!("emulating samtools index");
                let parsed = INDEX.parse(&args[1..], Mode::Strict)?;
                let infile = parsed.value("infile").unwrap_or_default();
                let outfile = match parsed.value("outfile") {
                    Some(outfile) => outfile.to_string(),
                    None => default_index(infile, parsed.flag("csi") || parsed.value("min_shift").is_some())
                        .ok_or_else(|| Unrecognized::command("samtools index", format!("file type of {infile:?}")))?,
                };
                session.touch(outfile)
            }
            other => Err(Unrecognized::command("samtools", format!("subcommand {other:?}")).into()),
        }
    }
}
