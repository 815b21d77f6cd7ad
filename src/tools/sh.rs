use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::session::Session;
use crate::shlex;
use anyhow::Result;
use log::info;

/// `sh -c '<command>'`: tokenise the command and run it as a fresh invocation.
///
/// The command string must be the last argument. With `sh -c 'python /create-file.py "$1"' touch
/// /tmp/foo.cram` the trailing words would become `$0`, `$1`, ... inside the command, and emulating
/// the command without that expansion would create a file literally named `$1`. Such wrappers are
/// rejected instead.
pub struct Sh;

impl Tool for Sh {
    fn name(&self) -> &'static str {
        "sh"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        let flag_at = args
            .iter()
            .position(|a| a == "-c")
            .ok_or(Unrecognized::ShellWrapper("no command to execute"))?;
        if args.len() > flag_at + 2 {
            return Err(Unrecognized::ShellWrapper("has arguments").into());
        }
        let command = args
            .get(flag_at + 1)
            .ok_or(Unrecognized::ShellWrapper("no command to execute"))?;
        let argv = shlex::split(command).map_err(Unrecognized::from)?;
        info!("unwrapped sh command: {:?}", argv);
        session.dispatch(&argv)
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::harness::{paths, run, tree};
    use crate::error::Unrecognized;
    use tempfile::tempdir;

    #[test]
    fn unwraps_and_redispatches() {
        let dir = tempdir().unwrap();
        run(dir.path(), &["sh", "-c", "samtools faidx 'my ref.fa'"]).result.unwrap();
        assert_eq!(tree(dir.path()), paths(&["my ref.fa.fai"]));
    }

    #[test]
    fn trailing_arguments_are_rejected_even_for_valid_commands() {
        let dir = tempdir().unwrap();
        let out = run(dir.path(), &["sh", "-c", "samtools faidx ref.fa", "extra"]);
        assert!(matches!(
            out.result.as_ref().unwrap_err().downcast_ref::<Unrecognized>(),
            Some(Unrecognized::ShellWrapper("has arguments"))
        ));
        assert!(run(dir.path(), &["sh", "-c", "python /create-file.py \"$1\"", "touch", "/tmp/foo.cram"])
            .is_unrecognized());
        assert!(tree(dir.path()).is_empty());
    }

    #[test]
    fn malformed_wrappers() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path(), &["sh", "-c"]).is_unrecognized());
        assert!(run(dir.path(), &["sh", "-c", ""]).is_unrecognized());
        assert!(run(dir.path(), &["sh", "-c", "samtools faidx 'ref.fa"]).is_unrecognized());
        assert!(run(dir.path(), &["sh", "-c", "ls -l"]).is_unrecognized());
    }
}
