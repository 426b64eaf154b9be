//! Operation mode, binary aliases and environment defaults.
//!
//! - [`OpMode`]: compress, decompress or test.
//! - [`detect_alias`]: `bunzs` decompresses, `bzscat` decompresses to stdout.
//! - [`init_block_size`]: default block size from `BZS_CLEVEL`.

use std::path::Path;

use crate::config::{DEFAULT_BLOCK_SIZE, ENV_CLEVEL, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};
use crate::displaylevel;

pub const COMPRESSOR_NAME: &str = "bzs";
pub const BUNZS: &str = "bunzs";
pub const BZSCAT: &str = "bzscat";

/// What the CLI does with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Compress,
    Decompress,
    /// Decode and discard, reporting integrity errors.
    Test,
}

/// Defaults implied by the name the binary was invoked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasDefaults {
    pub op_mode: OpMode,
    pub force_stdout: bool,
}

/// Inspects `argv[0]` (full path or bare name).
pub fn detect_alias(argv0: &str) -> AliasDefaults {
    let name = Path::new(argv0)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(COMPRESSOR_NAME);
    match name {
        BUNZS => AliasDefaults { op_mode: OpMode::Decompress, force_stdout: false },
        BZSCAT => AliasDefaults { op_mode: OpMode::Decompress, force_stdout: true },
        _ => AliasDefaults { op_mode: OpMode::Compress, force_stdout: false },
    }
}

/// Block size from `BZS_CLEVEL`, or the default (9).
pub fn init_block_size() -> u32 {
    init_block_size_from(std::env::var(ENV_CLEVEL).ok().as_deref())
}

/// Testable core of [`init_block_size`].
pub fn init_block_size_from(env_val: Option<&str>) -> u32 {
    if let Some(env) = env_val {
        match env.trim().parse::<u32>() {
            Ok(v) if (MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&v) => return v,
            _ => {
                displaylevel!(
                    2,
                    "Ignore environment variable setting {}={}: not a block size in {}..={}\n",
                    ENV_CLEVEL,
                    env,
                    MIN_BLOCK_SIZE,
                    MAX_BLOCK_SIZE
                );
            }
        }
    }
    DEFAULT_BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_detection() {
        assert_eq!(detect_alias("bzs").op_mode, OpMode::Compress);
        assert_eq!(detect_alias("/usr/bin/bunzs").op_mode, OpMode::Decompress);
        let cat = detect_alias("./bzscat");
        assert_eq!(cat.op_mode, OpMode::Decompress);
        assert!(cat.force_stdout);
        assert_eq!(detect_alias("bzs.exe").op_mode, OpMode::Compress);
    }

    #[test]
    fn block_size_from_env_value() {
        assert_eq!(init_block_size_from(Some("3")), 3);
        assert_eq!(init_block_size_from(Some(" 7 ")), 7);
        assert_eq!(init_block_size_from(None), DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn block_size_rejects_out_of_range() {
        assert_eq!(init_block_size_from(Some("0")), DEFAULT_BLOCK_SIZE);
        assert_eq!(init_block_size_from(Some("10")), DEFAULT_BLOCK_SIZE);
        assert_eq!(init_block_size_from(Some("fast")), DEFAULT_BLOCK_SIZE);
    }
}
