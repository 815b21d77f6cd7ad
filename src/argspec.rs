//! Flag-table argument parsing shared by the tool handlers.
//!
//! Each handler describes the handful of options it cares about as a static [`Schema`]. Parsing
//! follows the conventions of the real tools' wrappers: `--long value`, `--long=value`,
//! `-s value`, `-svalue`, `-s=value`, bundled flags (`-bc`), exact multi-letter single-dash names
//! (`-OVI`, `-OVI=true`, `-root`), `--` to end options, and no abbreviation of long names.
//!
//! In [`Mode::Known`] anything not in the schema is set aside and ignored, so new flags in a
//! pipeline do not break emulation. [`Mode::Strict`] rejects leftovers.

use crate::error::Unrecognized;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Flag,
    Value,
}

#[derive(Debug, Clone, Copy)]
pub struct Opt {
    pub names: &'static [&'static str],
    pub dest: &'static str,
    pub kind: Kind,
}

impl Opt {
    pub const fn flag(names: &'static [&'static str], dest: &'static str) -> Self {
        Opt { names, dest, kind: Kind::Flag }
    }

    pub const fn value(names: &'static [&'static str], dest: &'static str) -> Self {
        Opt { names, dest, kind: Kind::Value }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pos {
    pub dest: &'static str,
    pub required: bool,
}

impl Pos {
    pub const fn required(dest: &'static str) -> Self {
        Pos { dest, required: true }
    }

    pub const fn optional(dest: &'static str) -> Self {
        Pos { dest, required: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Known,
    Strict,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub tool: &'static str,
    pub opts: &'static [Opt],
    pub positionals: &'static [Pos],
}

#[derive(Debug, Default)]
pub struct Parsed {
    values: HashMap<&'static str, String>,
    flags: HashSet<&'static str>,
    pub extras: Vec<String>,
}

impl Parsed {
    pub fn value(&self, dest: &str) -> Option<&str> {
        self.values.get(dest).map(String::as_str)
    }

    pub fn flag(&self, dest: &str) -> bool {
        self.flags.contains(dest)
    }
}

fn looks_like_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-') && arg.parse::<f64>().is_err()
}

impl Schema {
    pub const fn new(tool: &'static str, opts: &'static [Opt], positionals: &'static [Pos]) -> Self {
        Schema { tool, opts, positionals }
    }

    fn find(&self, name: &str) -> Option<&Opt> {
        self.opts.iter().find(|o| o.names.contains(&name))
    }

    fn fail(&self, detail: String) -> Unrecognized {
        Unrecognized::command(self.tool, detail)
    }

    fn apply(
        &self,
        opt: &Opt,
        name: &str,
        inline: Option<&str>,
        args: &[String],
        i: &mut usize,
        parsed: &mut Parsed,
    ) -> Result<(), Unrecognized> {
        match opt.kind {
            Kind::Flag => {
                if inline.is_some() {
                    return Err(self.fail(format!("option {name} takes no value")));
                }
                parsed.flags.insert(opt.dest);
            }
            Kind::Value => {
                let value = match inline {
                    Some(v) => v.to_string(),
                    None => match args.get(*i) {
                        Some(v) if !looks_like_option(v) => {
                            *i += 1;
                            v.clone()
                        }
                        _ => return Err(self.fail(format!("option {name} expects a value"))),
                    },
                };
                parsed.values.insert(opt.dest, value);
            }
        }
        Ok(())
    }

    /// Single-letter options packed into one argument: `-bc` is `-b -c`, and a value option ends
    /// the run by taking the rest (`-ob.vcf`) or, when nothing is left, the next argument.
    /// Returns false if the first letter is not an option, leaving the argument unclaimed.
    fn expand_cluster(
        &self,
        arg: &str,
        args: &[String],
        i: &mut usize,
        parsed: &mut Parsed,
    ) -> Result<bool, Unrecognized> {
        let letters = &arg[1..];
        for (at, c) in letters.char_indices() {
            let name = format!("-{c}");
            let Some(opt) = self.find(&name) else {
                if at == 0 {
                    return Ok(false);
                }
                return Err(self.fail(format!("option {arg}: {c:?} is not an option")));
            };
            let rest = &letters[at + c.len_utf8()..];
            if opt.kind == Kind::Value || rest.is_empty() {
                self.apply(opt, &name, (!rest.is_empty()).then_some(rest), args, i, parsed)?;
                return Ok(true);
            }
            parsed.flags.insert(opt.dest);
        }
        Ok(true)
    }

    pub fn parse(&self, args: &[String], mode: Mode) -> Result<Parsed, Unrecognized> {
        let mut parsed = Parsed::default();
        let mut next_pos = 0usize;
        let mut options_done = false;
        let mut i = 0usize;

        while i < args.len() {
            let arg = &args[i];
            i += 1;

            if options_done || !looks_like_option(arg) {
                match self.positionals.get(next_pos) {
                    Some(pos) => {
                        parsed.values.insert(pos.dest, arg.clone());
                        next_pos += 1;
                    }
                    None => parsed.extras.push(arg.clone()),
                }
                continue;
            }
            if arg == "--" {
                options_done = true;
                continue;
            }

            if let Some((head, value)) = arg.split_once('=') {
                if let Some(opt) = self.find(head) {
                    self.apply(opt, head, Some(value), args, &mut i, &mut parsed)?;
                    continue;
                }
            }
            if let Some(opt) = self.find(arg) {
                self.apply(opt, arg, None, args, &mut i, &mut parsed)?;
                continue;
            }
            if !arg.starts_with("--") && self.expand_cluster(arg, args, &mut i, &mut parsed)? {
                continue;
            }

            parsed.extras.push(arg.clone());
        }

        if let Some(missing) = self.positionals[next_pos.min(self.positionals.len())..]
            .iter()
            .find(|p| p.required)
        {
            return Err(self.fail(format!("missing argument {}", missing.dest)));
        }
        if mode == Mode::Strict && !parsed.extras.is_empty() {
            return Err(self.fail(format!("unexpected arguments: {}", parsed.extras.join(" "))));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: Schema = Schema::new(
        "demo",
        &[
            Opt::value(&["-o", "--output"], "output"),
            Opt::flag(&["-c", "--csi"], "csi"),
            Opt::flag(&["-b"], "bai"),
            Opt::value(&["-OVI"], "ovi"),
        ],
        &[Pos::required("infile"), Pos::optional("outfile")],
    );

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn long_short_and_inline_forms() {
        let p = SCHEMA.parse(&args(&["--output=a.vcf", "-c", "in.vcf"]), Mode::Strict).unwrap();
        assert_eq!(p.value("output"), Some("a.vcf"));
        assert!(p.flag("csi"));
        assert_eq!(p.value("infile"), Some("in.vcf"));
        assert_eq!(p.value("outfile"), None);

        let p = SCHEMA.parse(&args(&["-ob.vcf", "in.vcf", "out.csi"]), Mode::Strict).unwrap();
        assert_eq!(p.value("output"), Some("b.vcf"));
        assert_eq!(p.value("outfile"), Some("out.csi"));
    }

    #[test]
    fn multi_letter_single_dash_names_match_exactly() {
        let p = SCHEMA.parse(&args(&["in", "-OVI", "true"]), Mode::Strict).unwrap();
        assert_eq!(p.value("ovi"), Some("true"));
        assert!(!p.flag("csi"));
    }

    #[test]
    fn equals_splits_after_any_registered_name() {
        let p = SCHEMA.parse(&args(&["-o", "first.vcf", "-OVI=true", "in"]), Mode::Strict).unwrap();
        assert_eq!(p.value("output"), Some("first.vcf"));
        assert_eq!(p.value("ovi"), Some("true"));

        let p = SCHEMA.parse(&args(&["-o=all.vcf", "in"]), Mode::Strict).unwrap();
        assert_eq!(p.value("output"), Some("all.vcf"));
        assert!(SCHEMA.parse(&args(&["-c=yes", "in"]), Mode::Known).is_err());
    }

    #[test]
    fn bundled_single_letter_options() {
        let p = SCHEMA.parse(&args(&["-bc", "in"]), Mode::Strict).unwrap();
        assert!(p.flag("bai") && p.flag("csi"));

        let p = SCHEMA.parse(&args(&["-cob.vcf", "in"]), Mode::Strict).unwrap();
        assert!(p.flag("csi"));
        assert_eq!(p.value("output"), Some("b.vcf"));

        let p = SCHEMA.parse(&args(&["-co", "b.vcf", "in"]), Mode::Strict).unwrap();
        assert_eq!(p.value("output"), Some("b.vcf"));
        assert_eq!(p.value("infile"), Some("in"));

        assert!(SCHEMA.parse(&args(&["-bx", "in"]), Mode::Known).is_err());
    }

    #[test]
    fn known_mode_sets_unknowns_aside() {
        let p = SCHEMA.parse(&args(&["--threads", "in", "out", "more", "-Wfoo"]), Mode::Known).unwrap();
        assert_eq!(p.value("infile"), Some("in"));
        assert_eq!(p.extras, vec!["--threads", "more", "-Wfoo"]);
        assert!(SCHEMA.parse(&args(&["--threads", "in"]), Mode::Strict).is_err());
    }

    #[test]
    fn missing_values_and_positionals_fail() {
        assert!(SCHEMA.parse(&args(&["in", "-o"]), Mode::Known).is_err());
        assert!(SCHEMA.parse(&args(&["-o", "-c", "in"]), Mode::Known).is_err());
        assert!(SCHEMA.parse(&args(&["-c"]), Mode::Known).is_err());
    }

    #[test]
    fn double_dash_ends_options() {
        let p = SCHEMA.parse(&args(&["--", "-c"]), Mode::Strict).unwrap();
        assert_eq!(p.value("infile"), Some("-c"));
        assert!(!p.flag("csi"));
    }

    #[test]
    fn negative_numbers_are_values() {
        let p = SCHEMA.parse(&args(&["-o", "-1", "in"]), Mode::Strict).unwrap();
        assert_eq!(p.value("output"), Some("-1"));
    }
}
