//! Command-line interface for the `bzs` binary.
//!
//! | Submodule   | Responsibility |
//! |-------------|---------------|
//! | [`op_mode`] | `OpMode`, alias detection for `bunzs` / `bzscat`, `BZS_CLEVEL`. |
//! | [`args`]    | clap surface and its resolution into a validated `CliConfig`. |
//! | [`ops`]     | Per-file compress / decompress / test jobs and their parallel dispatch. |
//!
//! Typical call sequence: `detect_alias` → `Args::parse` → `Args::resolve` → `ops::run`.

pub mod args;
pub mod op_mode;
pub mod ops;
