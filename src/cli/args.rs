//! Command-line parsing for `bzs` / `bunzs` / `bzscat`.
//!
//! [`Args`] is the raw clap surface; [`Args::resolve`] layers it over the
//! alias and environment defaults and produces a validated [`CliConfig`].
//! Short flags aggregate (`-9kv`); `-1`..`-9` select the block size, the
//! largest given wins.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use crate::cli::op_mode::{init_block_size, AliasDefaults, OpMode};
use crate::config::{NB_WORKERS_DEFAULT, NB_WORKERS_MAX};
use crate::option::{CompressorOptions, DecompressorOptions};

/// Marker operand for stdin / stdout.
pub const STDIN_MARK: &str = "-";

#[derive(Debug, Parser)]
#[command(
    name = "bzs",
    version,
    about = "Compress or decompress files in the bzip2 format",
    after_help = "With no FILE, or when FILE is -, read standard input.\n\
                  Block size flags -1 .. -9 select 100k .. 900k blocks (default -9, or BZS_CLEVEL)."
)]
pub struct Args {
    /// Force compression
    #[arg(short = 'z', long, overrides_with_all = ["decompress", "test"])]
    pub compress: bool,

    /// Force decompression
    #[arg(short = 'd', long, overrides_with_all = ["compress", "test"])]
    pub decompress: bool,

    /// Test compressed file integrity
    #[arg(short = 't', long, overrides_with_all = ["compress", "decompress"])]
    pub test: bool,

    /// Write to standard output, keep input files
    #[arg(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Keep (don't delete) input files
    #[arg(short = 'k', long)]
    pub keep: bool,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Use less memory when decompressing (at most 2500k)
    #[arg(short = 's', long)]
    pub small: bool,

    /// Operate recursively on directories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Number of worker threads (0 = one per core)
    #[arg(short = 'T', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Fallback sorting threshold for repetitive input, 1..=250
    #[arg(long = "work-factor", value_name = "N")]
    pub work_factor: Option<i64>,

    /// Suppress noncritical messages
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Be verbose (repeat for more)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub level: LevelFlags,

    /// Files to process
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Default, clap::Args)]
pub struct LevelFlags {
    /// 100k blocks (fastest)
    #[arg(short = '1', long = "fast")]
    pub l1: bool,
    #[arg(short = '2', hide = true)]
    pub l2: bool,
    #[arg(short = '3', hide = true)]
    pub l3: bool,
    #[arg(short = '4', hide = true)]
    pub l4: bool,
    #[arg(short = '5', hide = true)]
    pub l5: bool,
    #[arg(short = '6', hide = true)]
    pub l6: bool,
    #[arg(short = '7', hide = true)]
    pub l7: bool,
    #[arg(short = '8', hide = true)]
    pub l8: bool,
    /// 900k blocks (best, default)
    #[arg(short = '9', long = "best")]
    pub l9: bool,
}

impl LevelFlags {
    /// Largest block size flag given, if any.
    pub fn block_size(&self) -> Option<u32> {
        let flags = [
            self.l1, self.l2, self.l3, self.l4, self.l5, self.l6, self.l7, self.l8, self.l9,
        ];
        flags.iter().rposition(|&set| set).map(|i| i as u32 + 1)
    }
}

/// Fully resolved CLI settings.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub op_mode: OpMode,
    pub to_stdout: bool,
    pub keep: bool,
    pub force: bool,
    pub recursive: bool,
    pub nb_workers: usize,
    pub display_level: i32,
    pub compressor: CompressorOptions,
    pub decompressor: DecompressorOptions,
    /// Operands; empty means stdin.
    pub files: Vec<PathBuf>,
}

impl Args {
    pub fn resolve(self, alias: AliasDefaults) -> anyhow::Result<CliConfig> {
        let op_mode = if self.test {
            OpMode::Test
        } else if self.decompress {
            OpMode::Decompress
        } else if self.compress {
            OpMode::Compress
        } else {
            alias.op_mode
        };

        let display_level = if self.quiet { 1 } else { 2 + i32::from(self.verbose) };
        let quiet_library = display_level < 4;

        let block_size = self.level.block_size().unwrap_or_else(init_block_size);
        let mut builder = CompressorOptions::builder()
            .try_block_size(i64::from(block_size))
            .quiet(quiet_library);
        if let Some(wf) = self.work_factor {
            builder = builder.try_work_factor(wf);
        }
        let compressor = builder.build().context("invalid compression settings")?;

        let decompressor = DecompressorOptions::builder()
            .small(self.small)
            .quiet(quiet_library)
            .build()
            .context("invalid decompression settings")?;

        let nb_workers = self.threads.unwrap_or(NB_WORKERS_DEFAULT);
        if nb_workers > NB_WORKERS_MAX {
            anyhow::bail!("bad usage: -T {nb_workers}: at most {NB_WORKERS_MAX} threads");
        }

        let files: Vec<PathBuf> = self
            .files
            .into_iter()
            .filter(|f| f.as_os_str() != STDIN_MARK)
            .collect();

        let to_stdout = self.stdout || alias.force_stdout;
        Ok(CliConfig {
            op_mode,
            to_stdout,
            keep: self.keep || to_stdout || op_mode == OpMode::Test,
            force: self.force,
            recursive: self.recursive,
            nb_workers,
            display_level,
            compressor,
            decompressor,
            files,
        })
    }
}
