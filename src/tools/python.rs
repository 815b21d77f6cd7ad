//! `python` helper scripts and `python3` GATK wrappers.
//!
//! The helper scripts are recognised by their fixed in-container path. `split_interval_list.py`
//! is the one exception to "empty placeholder output": scatter widths downstream depend on its
//! exact file count, so it runs the real splitter.
//!
//! The `python3` wrappers launch GATK themselves; they are unwrapped and redispatched as a
//! `java -jar /gatk/gatk.jar` invocation.

use super::java::GATK_JAR;
use super::subcommand;
use crate::argspec::{Mode, Opt, Parsed, Schema};
use crate::dispatch::Tool;
use crate::error::Unrecognized;
use crate::interval_split::split_interval_lists;
use crate::pyjson;
use crate::session::{Effect, Session};
use anyhow::Result;
use log::info;
use regex::Regex;
use serde_json::{json, Value};
use std::path::Path;

const DICT_TO_INTERVAL_LIST: Schema = Schema::new(
    "dict_to_interval_list",
    &[Opt::value(&["--path"], "path"), Opt::value(&["--output_dir"], "output_dir")],
    &[],
);

const SPLIT_INTERVAL_LIST: Schema = Schema::new(
    "split_interval_list",
    &[
        Opt::value(&["--path"], "path"),
        Opt::value(&["--output_dir"], "output_dir"),
        Opt::value(&["--chunks"], "chunks"),
    ],
    &[],
);

const MATRIX_TRANSPOSE: &str = r"(?s)cwl\.output\.json.*json\.dumps.*transposed_array";
/// `name = [...]` on a line of its own: the expression tool's inlined input.
const ARRAY_LITERAL: &str = r"(?m)^\s*[A-Za-z_]\w*\s*=\s*(\[.*\])\s*$";
const OUTPUT_FILE: &str = r#"open\(\s*["']([^"']+)["']\s*,\s*["']w"#;

fn unrecognized(detail: impl Into<String>) -> anyhow::Error {
    Unrecognized::command("python", detail).into()
}

fn required<'p>(parsed: &'p Parsed, dest: &str, script: &str) -> Result<&'p str> {
    parsed
        .value(dest)
        .ok_or_else(|| unrecognized(format!("{script} without --{dest}")))
}

pub struct Python;

impl Tool for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        match subcommand(args) {
            "/get_read_group_caps.py" => {
                info!("emulating get_read_group_caps");
                session.touch("caps_file")
            }
            "/dict_to_interval_list.py" => {
                info!("emulating dict_to_interval_list");
                let parsed = DICT_TO_INTERVAL_LIST.parse(&args[1..], Mode::Strict)?;
                let dict = Path::new(required(&parsed, "path", "dict_to_interval_list")?);
                let output_dir = required(&parsed, "output_dir", "dict_to_interval_list")?;
                let file_name = dict
                    .with_extension("interval_list")
                    .file_name()
                    .map(|n| n.to_os_string())
                    .ok_or_else(|| unrecognized(format!("--path {} has no file name", dict.display())))?;
                session.touch(Path::new(output_dir).join(file_name))
            }
            "/il_to_bed.py" => {
                info!("emulating interval-list-to-bed");
                session.touch("output.bed")?;
                session.touch("header.txt")
            }
            "/bed_to_il.py" => {
                info!("emulating bed-to-interval-list");
                session.touch("output.bed")
            }
            "/split_interval_list.py" => split(session, &args[1..]),
            "-c" => {
                let code = args.get(1).ok_or_else(|| unrecognized("-c without a program"))?;
                if Regex::new(MATRIX_TRANSPOSE)?.is_match(code) {
                    matrix_transpose(session, code)
                } else {
                    Err(unrecognized("command string"))
                }
            }
            other => Err(unrecognized(format!("script {other:?}"))),
        }
    }
}

fn split(session: &mut Session<'_>, args: &[String]) -> Result<()> {
    info!("running split_interval_list");
    let parsed = SPLIT_INTERVAL_LIST.parse(args, Mode::Strict)?;
    let path = required(&parsed, "path", "split_interval_list")?;
    let output_dir = required(&parsed, "output_dir", "split_interval_list")?;
    let chunks: usize = required(&parsed, "chunks", "split_interval_list")?
        .parse()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| unrecognized("--chunks must be a positive integer"))?;

    let written = split_interval_lists(chunks, &session.resolve(path), &session.resolve(output_dir))?;
    for file in written {
        session.record(Effect::WroteFile(file));
    }
    info!("scattering note: created {chunks} files");
    Ok(())
}

/// Transpose the inlined 2-D array the way `zip(*array)` would.
fn transpose(rows: &[Vec<Value>]) -> Vec<Vec<Value>> {
    let width = rows.iter().map(Vec::len).min().unwrap_or(0);
    (0..width)
        .map(|col| rows.iter().map(|row| row[col].clone()).collect())
        .collect()
}

fn matrix_transpose(session: &mut Session<'_>, code: &str) -> Result<()> {
    info!("running matrix_transpose");
    let rows: Vec<Vec<Value>> = Regex::new(ARRAY_LITERAL)?
        .captures_iter(code)
        .find_map(|caps| serde_json::from_str(&caps[1]).ok())
        .ok_or_else(|| unrecognized("matrix transpose without an inlined 2-D array"))?;
    let document = pyjson::to_string(&json!({ "transposed_array": transpose(&rows) }))?;

    match Regex::new(OUTPUT_FILE)?.captures(code) {
        Some(caps) => session.write_file(&caps[1], document.as_bytes()),
        None => session.emit(&document),
    }
}

pub struct Python3;

impl Tool for Python3 {
    fn name(&self) -> &'static str {
        "python3"
    }

    fn handle(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        // Positions of the JVM options (JSON) and of the GATK tool name.
        let (jvm_at, tool_at) = match subcommand(args) {
            "/gatk-local-io-wrapper.py" => (3, 4),
            "/gatk-tmpdir-output-wrapper.py" => (2, 3),
            other => return Err(Unrecognized::command("python3", format!("script {other:?}")).into()),
        };
        let (Some(jvm_json), Some(tool)) = (args.get(jvm_at), args.get(tool_at)) else {
            return Err(Unrecognized::command("python3", format!("{} needs a GATK command", args[0])).into());
        };
        let jvm_options: Vec<String> = serde_json::from_str(jvm_json).map_err(|e| {
            Unrecognized::command("python3", format!("JVM options {jvm_json:?} are not a JSON string list: {e}"))
        })?;
        info!("emulating {} for {tool}", args[0].trim_start_matches('/'));

        let mut argv = vec!["java".to_string(), "-d64".to_string()];
        argv.extend(jvm_options);
        argv.extend(["-jar".to_string(), GATK_JAR.to_string(), tool.clone()]);
        argv.extend_from_slice(&args[tool_at + 1..]);
        session.dispatch(&argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::harness::{paths, run, tree};
    use std::fs;
    use tempfile::tempdir;

    const TRANSPOSE_PROGRAM: &str = r#"
import json
array = [[1, 2, 3], [4, 5, 6]]
transposed_array = [list(x) for x in zip(*array)]
with open("cwl.output.json", "w") as output_file:
    output_file.write(json.dumps({"transposed_array": transposed_array}))
"#;

    #[test]
    fn fixed_output_scripts() {
        let dir = tempdir().unwrap();
        run(dir.path(), &["python", "/get_read_group_caps.py", "x.bam"]).result.unwrap();
        run(dir.path(), &["python", "/il_to_bed.py", "--interval_list", "x"]).result.unwrap();
        run(dir.path(), &["python", "/bed_to_il.py"]).result.unwrap();
        assert_eq!(tree(dir.path()), paths(&["caps_file", "header.txt", "output.bed"]));
    }

    #[test]
    fn dict_to_interval_list_swaps_extension() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        run(dir.path(), &["python", "/dict_to_interval_list.py", "--path", "/ref/hs38.dict", "--output_dir", "out"])
            .result
            .unwrap();
        assert_eq!(tree(dir.path()), paths(&["out", "out/hs38.interval_list"]));
        assert!(run(dir.path(), &["python", "/dict_to_interval_list.py", "--path", "a.dict", "--bogus", "1"])
            .is_unrecognized());
    }

    #[test]
    fn split_interval_list_writes_exactly_chunks_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("chunks")).unwrap();
        fs::write(dir.path().join("wg.interval_list"), "@HD\tVN:1.6\nchr1\t1\t100\t+\t.\nchr2\t1\t100\t+\t.\n")
            .unwrap();
        let out = run(
            dir.path(),
            &["python", "/split_interval_list.py", "--path", "wg.interval_list", "--output_dir", "chunks", "--chunks", "3"],
        );
        out.result.unwrap();
        assert_eq!(out.effects.len(), 3);
        assert_eq!(fs::read_dir(dir.path().join("chunks")).unwrap().count(), 3);
        assert!(run(
            dir.path(),
            &["python", "/split_interval_list.py", "--path", "wg.interval_list", "--output_dir", "chunks", "--chunks", "0"],
        )
        .is_unrecognized());
    }

    #[test]
    fn matrix_transpose_writes_cwl_output() {
        let dir = tempdir().unwrap();
        run(dir.path(), &["python", "-c", TRANSPOSE_PROGRAM]).result.unwrap();
        let written: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("cwl.output.json")).unwrap()).unwrap();
        assert_eq!(written, json!({ "transposed_array": [[1, 4], [2, 5], [3, 6]] }));
    }

    #[test]
    fn matrix_transpose_without_output_file_prints() {
        let dir = tempdir().unwrap();
        let program = "# cwl.output.json is not written\na = [[\"x\", \"y\"], [\"z\"]]\nprint(json.dumps({'transposed_array': t}))";
        let out = run(dir.path(), &["python", "-c", program]);
        out.result.unwrap();
        assert_eq!(out.stdout, "{\"transposed_array\": [[\"x\", \"z\"]]}\n");
        assert!(tree(dir.path()).is_empty());
    }

    #[test]
    fn transpose_truncates_to_shortest_row() {
        let rows = vec![vec![json!(1), json!(2)], vec![json!(3)]];
        assert_eq!(transpose(&rows), vec![vec![json!(1), json!(3)]]);
        assert!(transpose(&[]).is_empty());
    }

    #[test]
    fn other_python_code_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path(), &["python", "-c", "print('hello')"]).is_unrecognized());
        assert!(run(dir.path(), &["python", "-c"]).is_unrecognized());
        assert!(run(dir.path(), &["python"]).is_unrecognized());
    }

    #[test]
    fn local_io_wrapper_redispatches_to_gatk() {
        let dir = tempdir().unwrap();
        let out = run(
            dir.path(),
            &[
                "python3", "/gatk-local-io-wrapper.py", "in", "out", "[\"-Xmx2g\"]", "HaplotypeCaller",
                "-O", "hc.g.vcf.gz", "-OVI", "true",
            ],
        );
        out.result.unwrap();
        assert_eq!(tree(dir.path()), paths(&["hc.g.vcf.gz", "hc.g.vcf.gz.tbi"]));
    }

    #[test]
    fn tmpdir_wrapper_redispatches_to_gatk() {
        let dir = tempdir().unwrap();
        run(
            dir.path(),
            &["python3", "/gatk-tmpdir-output-wrapper.py", "tmp", "[]", "GenomicsDBImport", "--genomicsdb-workspace-path", "db"],
        )
        .result
        .unwrap();
        assert!(dir.path().join("db").is_dir());
    }

    #[test]
    fn wrapper_with_bad_jvm_options_or_tool_fails() {
        let dir = tempdir().unwrap();
        for argv in [
            &["python3", "/gatk-tmpdir-output-wrapper.py", "tmp", "-Xmx2g", "HaplotypeCaller", "-O", "x.vcf"][..],
            &["python3", "/gatk-tmpdir-output-wrapper.py", "tmp", "[]", "Mutect2", "-O", "x.vcf"],
            &["python3", "/gatk-local-io-wrapper.py", "a", "b", "[]"],
        ] {
            assert!(run(dir.path(), argv).is_unrecognized(), "{argv:?}");
        }
        assert!(tree(dir.path()).is_empty());
    }
}
