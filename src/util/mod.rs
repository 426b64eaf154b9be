//! Filesystem and platform helpers for the CLI.
//!
//! - [`cores`]      : CPU core counting and worker-count resolution
//! - [`file_status`]: regular-file checks, copying mtime / mode / owner
//! - [`file_list`]  : operand expansion, recursive directory walks

pub mod cores;
pub mod file_list;
pub mod file_status;

pub use cores::{count_cores, resolve_workers};
pub use file_list::{expand_inputs, Input};
pub use file_status::{is_reg_file, set_file_stat, FileStat};

use std::path::{Path, PathBuf};

use crate::config::BZ2_EXTENSION;

/// Output path for compressing `input`: `name` → `name.bz2`.
pub fn compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(BZ2_EXTENSION);
    PathBuf::from(name)
}

/// Output path for decompressing `input`, following the `bzip2` tool's
/// suffix table (`.bz2`, `.bz`, `.tbz2`, `.tbz`). Unknown suffixes get
/// `.out` appended. Returns `None` when stripping would leave an empty name.
pub fn decompressed_name(input: &Path) -> Option<PathBuf> {
    const SUFFIXES: [(&str, &str); 4] = [(".bz2", ""), (".bz", ""), (".tbz2", ".tar"), (".tbz", ".tar")];
    let name = input.file_name()?.to_str()?;
    for (suffix, replacement) in SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            if stem.is_empty() {
                return None;
            }
            return Some(input.with_file_name(format!("{stem}{replacement}")));
        }
    }
    Some(input.with_file_name(format!("{name}.out")))
}

/// `true` when `input` already carries a suffix the compressor would add.
pub fn has_compressed_suffix(input: &Path) -> bool {
    input
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| [".bz2", ".bz", ".tbz2", ".tbz"].iter().any(|s| n.ends_with(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_name_appends_suffix() {
        assert_eq!(compressed_name(Path::new("dir/a.txt")), PathBuf::from("dir/a.txt.bz2"));
    }

    #[test]
    fn decompressed_name_strips_known_suffixes() {
        assert_eq!(decompressed_name(Path::new("a.txt.bz2")), Some(PathBuf::from("a.txt")));
        assert_eq!(decompressed_name(Path::new("a.bz")), Some(PathBuf::from("a")));
        assert_eq!(decompressed_name(Path::new("x/a.tbz2")), Some(PathBuf::from("x/a.tar")));
        assert_eq!(decompressed_name(Path::new("a.tbz")), Some(PathBuf::from("a.tar")));
    }

    #[test]
    fn decompressed_name_unknown_suffix() {
        assert_eq!(decompressed_name(Path::new("a.dat")), Some(PathBuf::from("a.dat.out")));
        assert_eq!(decompressed_name(Path::new(".bz2")), None);
    }

    #[test]
    fn suffix_detection() {
        assert!(has_compressed_suffix(Path::new("a.bz2")));
        assert!(has_compressed_suffix(Path::new("a.tbz")));
        assert!(!has_compressed_suffix(Path::new("a.txt")));
    }
}
