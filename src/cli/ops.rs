//! Per-file compress / decompress / test jobs and their dispatch.
//!
//! Files are independent, so several are processed at once on a [`TPool`]
//! unless output goes to stdout, which forces input order on one thread.
//! Every job reports a [`FileReport`] or an error carrying the file name;
//! reports are printed in operand order.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};

use crate::cli::args::CliConfig;
use crate::cli::op_mode::{OpMode, COMPRESSOR_NAME};
use crate::config::NB_WORKERS_MAX;
use crate::display::display_level;
use crate::error::BzsError;
use crate::file::{compress_io, decompress_io, test_io};
use crate::threadpool::TPool;
use crate::util::{
    compressed_name, decompressed_name, expand_inputs, has_compressed_suffix, resolve_workers,
    set_file_stat, FileStat, Input,
};
use crate::{display, displaylevel};

/// Outcome of one successfully processed operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReport {
    Done {
        source: String,
        bytes_in: u64,
        bytes_out: u64,
    },
    Tested {
        source: String,
        bytes_out: u64,
    },
    Skipped {
        source: String,
        reason: String,
    },
}

/// Exit status of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ok: usize,
    pub failed: usize,
    pub corrupt: usize,
}

impl RunSummary {
    /// 0 on success, 2 if any input was corrupt, 1 for any other failure.
    pub fn exit_code(&self) -> i32 {
        if self.corrupt > 0 {
            2
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }

    fn record(&mut self, result: &anyhow::Result<FileReport>) {
        match result {
            Ok(_) => self.ok += 1,
            Err(e) if is_corruption(e) => self.corrupt += 1,
            Err(_) => self.failed += 1,
        }
    }
}

fn is_corruption(e: &anyhow::Error) -> bool {
    e.chain()
        .any(|cause| cause.downcast_ref::<BzsError>().is_some_and(BzsError::is_corruption))
}

// ─────────────────────────────────────────────────────────────────────────────
// stdin / stdout
// ─────────────────────────────────────────────────────────────────────────────

/// Processes stdin into stdout (or a sink in test mode).
pub fn run_stdio(cfg: &CliConfig) -> anyhow::Result<FileReport> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match cfg.op_mode {
        OpMode::Compress => {
            if stdout.is_terminal() && !cfg.force {
                bail!("I won't write compressed data to a terminal (use -f to force)");
            }
            let (bytes_in, bytes_out) =
                compress_io(stdin.lock(), stdout.lock(), &cfg.compressor).context("(stdin)")?;
            Ok(FileReport::Done { source: "(stdin)".into(), bytes_in, bytes_out })
        }
        OpMode::Decompress | OpMode::Test => {
            if stdin.is_terminal() && !cfg.force {
                bail!("I won't read compressed data from a terminal (use -f to force)");
            }
            if cfg.op_mode == OpMode::Test {
                let bytes_out = test_io(stdin.lock(), &cfg.decompressor).context("(stdin)")?;
                return Ok(FileReport::Tested { source: "(stdin)".into(), bytes_out });
            }
            let (bytes_in, bytes_out) =
                decompress_io(stdin.lock(), stdout.lock(), &cfg.decompressor).context("(stdin)")?;
            Ok(FileReport::Done { source: "(stdin)".into(), bytes_in, bytes_out })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

/// Processes one file operand according to `cfg`.
pub fn process_file(cfg: &CliConfig, path: &Path) -> anyhow::Result<FileReport> {
    let source = path.display().to_string();
    if !path.exists() {
        bail!("{source}: No such file or directory");
    }

    if cfg.op_mode == OpMode::Test {
        let reader = BufReader::new(File::open(path).with_context(|| source.clone())?);
        let bytes_out = test_io(reader, &cfg.decompressor).with_context(|| source.clone())?;
        return Ok(FileReport::Tested { source, bytes_out });
    }

    if cfg.to_stdout {
        let reader = BufReader::new(File::open(path).with_context(|| source.clone())?);
        let (bytes_in, bytes_out) = transform(cfg, reader, io::stdout().lock())
            .with_context(|| source.clone())?;
        return Ok(FileReport::Done { source, bytes_in, bytes_out });
    }

    let target = match cfg.op_mode {
        OpMode::Compress => {
            if has_compressed_suffix(path) {
                return Ok(FileReport::Skipped {
                    source,
                    reason: "already has a bzip2 suffix -- unchanged".into(),
                });
            }
            compressed_name(path)
        }
        _ => match decompressed_name(path) {
            Some(target) => {
                if !has_compressed_suffix(path) {
                    displaylevel!(
                        2,
                        "{}: {}: can't guess original name -- using {}\n",
                        COMPRESSOR_NAME,
                        source,
                        target.display()
                    );
                }
                target
            }
            None => bail!("{source}: can't derive an output name"),
        },
    };
    let (bytes_in, bytes_out) = transform_to_file(cfg, path, &target)?;

    if !cfg.keep {
        fs::remove_file(path).with_context(|| format!("{source}: can't remove input"))?;
    }
    Ok(FileReport::Done { source, bytes_in, bytes_out })
}

fn transform<R: Read, W: Write>(cfg: &CliConfig, reader: R, writer: W) -> Result<(u64, u64), BzsError> {
    match cfg.op_mode {
        OpMode::Compress => compress_io(reader, writer, &cfg.compressor),
        _ => decompress_io(reader, writer, &cfg.decompressor),
    }
}

/// Writes `target` from `path`, removing a partial output on failure.
fn transform_to_file(cfg: &CliConfig, path: &Path, target: &Path) -> anyhow::Result<(u64, u64)> {
    let source = path.display();
    if target.exists() {
        if !cfg.force {
            bail!("{}: output file {} already exists", source, target.display());
        }
        fs::remove_file(target)
            .with_context(|| format!("{source}: can't overwrite {}", target.display()))?;
    }

    let stat = FileStat::of(path).with_context(|| source.to_string())?;
    let reader = BufReader::new(File::open(path).with_context(|| source.to_string())?);
    let out = File::create(target)
        .with_context(|| format!("{source}: can't create {}", target.display()))?;

    match transform(cfg, reader, BufWriter::new(out)) {
        Ok(totals) => {
            set_file_stat(target, &stat)
                .with_context(|| format!("{}: can't copy file attributes", target.display()))?;
            Ok(totals)
        }
        Err(e) => {
            let _ = fs::remove_file(target);
            Err(anyhow::Error::new(e).context(source.to_string()))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

fn print_report(report: &FileReport) {
    match report {
        FileReport::Done { source, bytes_in, bytes_out } => {
            if *bytes_in == 0 || *bytes_out == 0 {
                displaylevel!(3, "  {}: no data compressed.\n", source);
                return;
            }
            let (plain, packed) = if bytes_in >= bytes_out {
                (*bytes_in as f64, *bytes_out as f64)
            } else {
                (*bytes_out as f64, *bytes_in as f64)
            };
            displaylevel!(
                3,
                "  {}: {:6.3}:1, {:6.3} bits/byte, {:5.2}% saved, {} in, {} out.\n",
                source,
                plain / packed,
                8.0 * packed / plain,
                100.0 * (1.0 - packed / plain),
                bytes_in,
                bytes_out
            );
        }
        FileReport::Tested { source, .. } => displaylevel!(3, "  {}: ok\n", source),
        FileReport::Skipped { source, reason } => {
            displaylevel!(2, "{}: {}: {}\n", COMPRESSOR_NAME, source, reason)
        }
    }
}

fn print_error(e: &anyhow::Error) {
    if display_level() >= 1 {
        display!("{}: {:#}\n", COMPRESSOR_NAME, e);
    }
}

/// Runs the whole command and returns the summary used for the exit code.
pub fn run(cfg: CliConfig) -> RunSummary {
    let mut summary = RunSummary::default();

    if cfg.files.is_empty() {
        let result = run_stdio(&cfg);
        summary.record(&result);
        match &result {
            Ok(report) => print_report(report),
            Err(e) => print_error(e),
        }
        return summary;
    }

    let operands: Vec<&Path> = cfg.files.iter().map(PathBuf::as_path).collect();
    let inputs = match expand_inputs(&operands, cfg.recursive) {
        Ok(inputs) => inputs,
        Err(e) => {
            print_error(&anyhow::Error::new(e).context("can't list input files"));
            summary.failed += 1;
            return summary;
        }
    };

    let mut files = Vec::new();
    for input in inputs {
        match input {
            Input::File(p) => files.push(p),
            Input::SkippedDirectory(p) => {
                displaylevel!(2, "{}: {}: is a directory -- ignored\n", COMPRESSOR_NAME, p.display());
            }
        }
    }
    for (u, p) in files.iter().enumerate() {
        displaylevel!(4, "{} {}\n", u, p.display());
    }

    let results = if cfg.to_stdout || files.len() < 2 {
        files.iter().map(|f| process_file(&cfg, f)).collect::<Vec<_>>()
    } else {
        run_parallel(cfg, files)
    };

    for result in &results {
        summary.record(result);
        match result {
            Ok(report) => print_report(report),
            Err(e) => print_error(e),
        }
    }
    summary
}

fn run_parallel(cfg: CliConfig, files: Vec<PathBuf>) -> Vec<anyhow::Result<FileReport>> {
    let workers = resolve_workers(cfg.nb_workers, NB_WORKERS_MAX, files.len());
    displaylevel!(4, "using {} worker threads\n", workers);
    let Some(pool) = TPool::new(workers, workers) else {
        displaylevel!(2, "warning: can't start worker threads, continuing on one thread\n");
        return files.iter().map(|f| process_file(&cfg, f)).collect();
    };
    let cfg = Arc::new(cfg);
    pool.map_ordered(files, move |f| process_file(&cfg, &f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Args;
    use crate::cli::op_mode::detect_alias;
    use clap::Parser;
    use tempfile::TempDir;

    fn config(args: &[&str], files: &[&Path]) -> CliConfig {
        let mut argv: Vec<String> = vec!["bzs".into(), "-q".into()];
        argv.extend(args.iter().map(|s| s.to_string()));
        argv.extend(files.iter().map(|p| p.display().to_string()));
        Args::try_parse_from(argv).unwrap().resolve(detect_alias("bzs")).unwrap()
    }

    #[test]
    fn compress_then_decompress_file() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("notes.txt");
        fs::write(&plain, b"notes notes notes").unwrap();

        let report = process_file(&config(&[], &[]), &plain).unwrap();
        assert!(matches!(report, FileReport::Done { bytes_in: 17, .. }));
        assert!(!plain.exists());
        let packed = dir.path().join("notes.txt.bz2");
        assert!(packed.exists());

        process_file(&config(&["-d"], &[]), &packed).unwrap();
        assert_eq!(fs::read(&plain).unwrap(), b"notes notes notes");
        assert!(!packed.exists());
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("a");
        fs::write(&plain, b"a").unwrap();
        fs::write(dir.path().join("a.bz2"), b"occupied").unwrap();

        let err = process_file(&config(&["-k"], &[]), &plain).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
        process_file(&config(&["-k", "-f"], &[]), &plain).unwrap();
        assert!(plain.exists());
    }

    #[test]
    fn bz2_suffix_is_skipped_when_compressing() {
        let dir = TempDir::new().unwrap();
        let packed = dir.path().join("x.bz2");
        fs::write(&packed, b"whatever").unwrap();
        let report = process_file(&config(&[], &[]), &packed).unwrap();
        assert!(matches!(report, FileReport::Skipped { .. }));
    }

    #[test]
    fn corrupt_input_is_classified_and_output_removed() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.bz2");
        fs::write(&bad, b"BZh9 definitely not a bzip2 body").unwrap();

        let mut summary = RunSummary::default();
        let result = process_file(&config(&["-d"], &[]), &bad);
        summary.record(&result);
        assert_eq!(summary.corrupt, 1);
        assert_eq!(summary.exit_code(), 2);
        assert!(bad.exists());
        assert!(!dir.path().join("bad").exists());
    }

    #[test]
    fn run_processes_many_files_in_parallel() {
        let dir = TempDir::new().unwrap();
        let mut names = Vec::new();
        for i in 0..6 {
            let p = dir.path().join(format!("f{i}.txt"));
            fs::write(&p, format!("file number {i}").repeat(100)).unwrap();
            names.push(p);
        }
        let paths: Vec<&Path> = names.iter().map(PathBuf::as_path).collect();
        let summary = run(config(&["-k", "-T", "3"], &paths));
        assert_eq!(summary, RunSummary { ok: 6, failed: 0, corrupt: 0 });
        for p in &names {
            assert!(compressed_name(p).exists());
        }

        let tests: Vec<PathBuf> = names.iter().map(|p| compressed_name(p)).collect();
        let test_paths: Vec<&Path> = tests.iter().map(PathBuf::as_path).collect();
        assert_eq!(run(config(&["-t"], &test_paths)).exit_code(), 0);
    }

    #[test]
    fn missing_file_fails() {
        let summary = run(config(&[], &[Path::new("/nonexistent/__bzs__/x")]));
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
    }
}
