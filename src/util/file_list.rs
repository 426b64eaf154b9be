//! Input list expansion for the CLI.
//!
//! [`expand_inputs`] turns the operands given on the command line into the
//! flat list of files the CLI will process. With `recursive` set, directories
//! are walked with [`walkdir`]; otherwise they are reported and skipped, as
//! the `bzip2` tool does.
//!
//! Symlinks are never followed inside a walk (`walkdir` defaults to
//! `follow_links(false)`); a symlink named directly on the command line is
//! passed through.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One operand after expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    /// A directory given without `-r`.
    SkippedDirectory(PathBuf),
}

/// Expands `inputs` into files, walking directories when `recursive` is set.
///
/// Directory entries are returned in walk order, sorted by file name within
/// each directory so output is reproducible.
pub fn expand_inputs(inputs: &[&Path], recursive: bool) -> io::Result<Vec<Input>> {
    let mut result = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            result.push(Input::File(input.to_path_buf()));
            continue;
        }
        if !recursive {
            result.push(Input::SkippedDirectory(input.to_path_buf()));
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| match e.io_error() {
                Some(inner) => io::Error::new(inner.kind(), e.to_string()),
                None => io::Error::other(e.to_string()),
            })?;
            if entry.file_type().is_file() {
                result.push(Input::File(entry.into_path()));
            }
        }
    }
    Ok(result)
}
