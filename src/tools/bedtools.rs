use super::subcommand;
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use anyhow::Result;
use log::info;

pub struct Bedtools;

impl Tool for Bedtools {
    fn name(&self) -> &'static str {
        "bedtools"
    }

    fn handle(&self, _session: &mut Session<'_>, args: &[String]) -> Result<()> {
        match subcommand(args) {
            // The real tool writes its result to stdout, which the pipeline captures itself.
            "intersect" => {
                info!("emulating bedtools intersect");
                Ok(())
            }
            other => Err(Unrecognized::command("bedtools", format!("subcommand {other:?}")).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::harness::run;
    use tempfile::tempdir;

    #[test]
    fn intersect_has_no_side_effects() {
        let dir = tempdir().unwrap();
        let out = run(dir.path(), &["bedtools", "intersect", "-a", "a.bed", "-b", "b.bed"]);
        out.result.unwrap();
        assert!(out.effects.is_empty());
        assert!(out.stdout.is_empty());
    }
}
