//! Binary entry point for `bzs` (and its `bunzs` / `bzscat` aliases).
//!
//! 1. [`detect_alias`] inspects `argv[0]` to pick the default mode.
//! 2. clap parses the flags; [`Args::resolve`] validates them into a `CliConfig`.
//! 3. [`ops::run`] processes every operand and yields the exit code.

use clap::{CommandFactory, FromArgMatches};

use bzs::cli::args::Args;
use bzs::cli::op_mode::{detect_alias, COMPRESSOR_NAME};
use bzs::cli::ops;
use bzs::display::set_display_level;
use bzs::{displaylevel, library_version, version_string};

fn main() {
    let argv0 = std::env::args().next().unwrap_or_else(|| COMPRESSOR_NAME.to_string());
    let alias = detect_alias(&argv0);

    let long_version: &'static str =
        Box::leak(format!("{} (libbz2 {})", version_string(), library_version()).into_boxed_str());
    let matches = Args::command()
        .long_version(long_version)
        .get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let cfg = match args.resolve(alias) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{COMPRESSOR_NAME}: {e:#}");
            std::process::exit(1);
        }
    };
    set_display_level(cfg.display_level);
    displaylevel!(
        4,
        "*** {} v{}, libbz2 {} ***\n",
        COMPRESSOR_NAME,
        version_string(),
        library_version()
    );

    let summary = ops::run(cfg);
    std::process::exit(summary.exit_code());
}
