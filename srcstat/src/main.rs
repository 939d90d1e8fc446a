//! # srcstat
//!
//! A CLI tool that classifies every line of the given files as code, comment
//! or empty and prints batch statistics.
//!
//! ## Overview
//!
//! srcstat is built on top of srcstatlib. It scans each file in a single
//! streaming pass, prints a summary of lines per file (max and average for
//! every category) and can dump the detailed per-file table as TSV.
//!
//! ## Usage
//!
//! ```bash
//! # Summary for a batch of files
//! srcstat src/*.c
//!
//! # Per-line diagnostics on stderr
//! srcstat -debug main.c
//!
//! # Detailed per-file table to a file, or to stdout with "-"
//! srcstat -tsv stats.tsv src/*.c
//! srcstat -tsv - src/*.c
//!
//! # Machine-readable output
//! srcstat -json src/*.c
//! ```
//!
//! ## Exit status
//!
//! - `0`: success, even when some files could not be read
//! - `1`: usage error (no files, unknown flag, `-json` with `-tsv -`)
//! - `2`: an output destination could not be created or written

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use log::LevelFilter;
use srcstatlib::{scan_batch, to_json, write_summary, write_tsv, ScanOptions, SrcstatError};

const EXIT_USAGE: u8 = 1;
const EXIT_OUTPUT: u8 = 2;

/// Special `-tsv` target meaning standard output.
const STDOUT_TARGET: &str = "-";

/// Long flags that may also be spelled with a single dash.
const LONG_FLAGS: [&str; 6] = ["debug", "tsv", "json", "parallel", "help", "version"];

const USAGE_LINE: &str = "srcstat [-debug] [-tsv PATH] [-json] [-parallel] FILE [FILE...]";

fn usage() -> String {
    format!("USAGE: {USAGE_LINE}")
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("srcstat")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Line-oriented source statistics: code, comment and empty lines")
        .override_usage(USAGE_LINE)
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Files to scan"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Print per-line diagnostics to stderr"),
        )
        .arg(
            Arg::new("tsv")
                .long("tsv")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the per-file table as TSV to PATH (\"-\" for stdout)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the batch as JSON instead of the summary"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .action(ArgAction::SetTrue)
                .help("Scan files in parallel (output order is unchanged)"),
        )
}

fn is_single_dash_flag(arg: &str) -> bool {
    if arg.starts_with("--") {
        return false;
    }
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    let name = name.split_once('=').map_or(name, |(flag, _)| flag);
    LONG_FLAGS.contains(&name)
}

/// Rewrite `-tsv` style flags to `--tsv` so clap accepts both spellings.
///
/// Arguments that are not valid UTF-8 are never flags and pass through as is.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut rewrite = true;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if arg == "--" {
                rewrite = false;
            }
            if i == 0 || !rewrite {
                return arg;
            }
            let rewritten = arg
                .to_str()
                .filter(|s| is_single_dash_flag(s))
                .map(|s| OsString::from(format!("-{s}")));
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn init_logger(debug: bool) {
    if !debug {
        return;
    }
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

/// Open the TSV destination before scanning so a bad path fails fast.
fn open_tsv(target: &Path) -> Result<Box<dyn Write>, SrcstatError> {
    if target == Path::new(STDOUT_TARGET) {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file = File::create(target).map_err(|source| SrcstatError::OutputWrite {
        path: target.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let files: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("files")
        .map(|v| v.collect())
        .unwrap_or_default();

    if files.is_empty() {
        println!("{}", usage());
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let json = matches.get_flag("json");
    let tsv_target = matches.get_one::<PathBuf>("tsv");
    if json && tsv_target.is_some_and(|t| t.as_path() == Path::new(STDOUT_TARGET)) {
        let error = style("error:").red().bold().for_stderr();
        eprintln!("{error} -json and -tsv - cannot both write to stdout");
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let debug = matches.get_flag("debug");
    init_logger(debug);

    let mut tsv = tsv_target.map(|t| open_tsv(t)).transpose()?;

    let options = ScanOptions::new()
        .debug(debug)
        .parallel(matches.get_flag("parallel"));
    let batch = scan_batch(&files, &options);

    // with -debug the logger has already reported each failure
    if !debug {
        let warning = style("warning:").yellow().bold().for_stderr();
        for failed in batch.failures() {
            eprintln!("{} {}", warning, failed.error_message());
        }
    }

    let mut stdout = io::stdout().lock();
    let written = if json {
        writeln!(stdout, "{}", to_json(&batch)?)
    } else {
        write_summary(&batch, &mut stdout)
    };
    written.context("failed to write summary")?;
    drop(stdout);

    if let (Some(writer), Some(target)) = (tsv.as_mut(), tsv_target) {
        write_tsv(&batch, writer).map_err(|source| SrcstatError::OutputWrite {
            path: target.clone(),
            source,
        })?;
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = normalize_args(std::env::args_os());
    let matches = match build_command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
            let _ = e.print();
            return code;
        }
    };

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            println!("Error: {e:#}");
            ExitCode::from(EXIT_OUTPUT)
        }
    }
}
