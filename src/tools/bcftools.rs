use super::subcommand;
use crate::argspec::{Mode, Opt, Pos, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use anyhow::Result;
use log::info;

const CONCAT: Schema = Schema::new("bcftools concat", &[Opt::value(&["-o", "--output"], "output")], &[]);

const INDEX: Schema = Schema::new(
    "bcftools index",
    &[
        Opt::value(&["-o", "--output"], "output"),
        Opt::flag(&["-c", "--csi"], "csi"),
        Opt::flag(&["-t", "--tbi"], "tbi"),
    ],
    &[Pos::required("infile")],
);

pub struct Bcftools;

impl Tool for Bcftools {
    fn name(&self) -> &'static str {
        "bcftools"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        match subcommand(args) {
            "concat" => {
                info!("emulating bcftools concat");
                let parsed = CONCAT.parse(&args[1..], Mode::Known)?;
                let output = parsed
                    .value("output")
                    .ok_or_else(|| Unrecognized::command("bcftools concat", "missing -o/--output"))?;
                session.touch(output)
            }
            "index" => {
                info!("emulating bcftools index");
                let parsed = INDEX.parse(&args[1..], Mode::Known)?;
                let infile = parsed.value("infile").unwrap_or_default();
                match parsed.value("output") {
                    Some(output) => session.touch(output),
                    None if parsed.flag("tbi") => session.touch(format!("{infile}.tbi")),
                    None => session.touch(format!("{infile}.csi")),
                }
            }
            other => Err(Unrecognized::command("bcftools", format!("subcommand {other:?}")).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::harness::{paths, run, tree};
    use tempfile::tempdir;

    #[test]
    fn concat_touches_output() {
        let dir = tempdir().unwrap();
        run(dir.path(), &["bcftools", "concat", "-a", "--output=all.vcf.gz", "a.vcf.gz", "b.vcf.gz"])
            .result
            .unwrap();
        assert_eq!(tree(dir.path()), paths(&["all.vcf.gz"]));
    }

    #[test]
    fn concat_short_output_with_equals() {
        let dir = tempdir().unwrap();
        run(dir.path(), &["bcftools", "concat", "-o=all.vcf", "a.vcf"]).result.unwrap();
        assert_eq!(tree(dir.path()), paths(&["all.vcf"]));
    }

    #[test]
    fn index_naming() {
        let dir = tempdir().unwrap();
        run(dir.path(), &["bcftools", "index", "x.vcf.gz"]).result.unwrap();
        run(dir.path(), &["bcftools", "index", "-t", "y.vcf.gz"]).result.unwrap();
        run(dir.path(), &["bcftools", "index", "--tbi", "-o", "custom.idx", "z.vcf.gz"]).result.unwrap();
        assert_eq!(tree(dir.path()), paths(&["custom.idx", "x.vcf.gz.csi", "y.vcf.gz.tbi"]));
    }

    #[test]
    fn index_without_input_and_unknown_subcommands_fail() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path(), &["bcftools", "index", "-t"]).is_unrecognized());
        assert!(run(dir.path(), &["bcftools", "concat", "a.vcf"]).is_unrecognized());
        assert!(run(dir.path(), &["bcftools"]).is_unrecognized());
        assert!(tree(dir.path()).is_empty());
    }
}
