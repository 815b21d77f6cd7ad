use crate::argspec::{Mode, Opt, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use anyhow::Result;
use log::info;

const OPTIONS: Schema = Schema::new("seq_cache_populate.pl", &[Opt::value(&["-root"], "root")], &[]);

/// `seq_cache_populate.pl -root <dir> <fasta>`: only the cache root directory is created.
pub struct SeqCachePopulate;

impl Tool for SeqCachePopulate {
    fn name(&self) -> &'static str {
        "seq_cache_populate_pl"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        let parsed = OPTIONS.parse(args, Mode::Known)?;
        let root = parsed
            .value("root")
            .ok_or_else(|| Unrecognized::command("seq_cache_populate.pl", "missing -root"))?;
        info!("emulating seq_cache_populate.pl");
        session.mkdir_tolerant(root)
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::harness::{paths, run, tree};
    use tempfile::tempdir;

    #[test]
    fn creates_root_idempotently() {
        let dir = tempdir().unwrap();
        let argv = ["/usr/bin/seq_cache_populate.pl", "-root", "cache", "-subdirs", "2", "ref.fa"];
        run(dir.path(), &argv).result.unwrap();
        run(dir.path(), &argv).result.unwrap();
        assert_eq!(tree(dir.path()), paths(&["cache"]));
    }

    #[test]
    fn missing_parent_is_an_ordinary_failure() {
        let dir = tempdir().unwrap();
        let out = run(dir.path(), &["seq_cache_populate.pl", "-root", "no/such/cache"]);
        assert!(out.result.is_err());
        assert!(!out.is_unrecognized());
    }
}
