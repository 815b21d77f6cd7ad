use crate::shlex::ParseError;
use thiserror::Error;

/// Exit status for every invocation the emulator refuses to handle.
pub const UNRECOGNIZED_EXIT: u8 = 127;

/// An invocation whose shape no handler recognises.
///
/// Anything else (missing input files, permission errors) travels as a plain
/// `anyhow::Error` and is reported as an ordinary failure.
#[derive(Debug, Error)]
pub enum Unrecognized {
    #[error("unrecognized program {0:?}")]
    Program(String),
    #[error("unrecognized {tool} command: {detail}")]
    Command { tool: &'static str, detail: String },
    #[error("unrecognized sh command ({0})")]
    ShellWrapper(&'static str),
    #[error("unrecognized shell command string: {0}")]
    Syntax(#[from] ParseError),
}

impl Unrecognized {
    pub fn command(tool: &'static str, detail: impl Into<String>) -> Self {
        Unrecognized::Command { tool, detail: detail.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_scope() {
        assert_eq!(
            Unrecognized::command("bcftools", "frobnicate").to_string(),
            "unrecognized bcftools command: frobnicate"
        );
        assert_eq!(
            Unrecognized::ShellWrapper("has arguments").to_string(),
            "unrecognized sh command (has arguments)"
        );
        let err = anyhow::Error::from(Unrecognized::Program("ls".into()));
        assert!(err.downcast_ref::<Unrecognized>().is_some());
    }
}
