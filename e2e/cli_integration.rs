// The `bzs` binary as a black box.
//
// Covers compress / decompress dispatch, -c / -k / -f, test mode, exit codes,
// stdin / stdout, the BZS_CLEVEL default and interop of the files it writes.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn bzs_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bzs"))
}

fn bzs(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(bzs_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("BZS_CLEVEL")
        .output()
        .expect("failed to run bzs")
}

fn make_temp_input() -> (TempDir, PathBuf, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    let content = "Hello, bzip2!\n".repeat(2_000).into_bytes();
    fs::write(&input, &content).unwrap();
    (dir, input, content)
}

#[test]
fn compress_decompress_round_trip() {
    let (dir, input, content) = make_temp_input();

    let out = bzs(dir.path(), &["input.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let packed = dir.path().join("input.txt.bz2");
    assert!(packed.exists());
    assert!(!input.exists(), "input removed without -k");

    let out = bzs(dir.path(), &["-d", "input.txt.bz2"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&input).unwrap(), content);
    assert!(!packed.exists());
}

#[test]
fn keep_and_force() {
    let (dir, input, _) = make_temp_input();

    assert!(bzs(dir.path(), &["-k", "input.txt"]).status.success());
    assert!(input.exists());

    let out = bzs(dir.path(), &["-k", "input.txt"]);
    assert_eq!(out.status.code(), Some(1), "existing output without -f must fail");
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));

    assert!(bzs(dir.path(), &["-kf", "input.txt"]).status.success());
}

#[test]
fn stdout_mode_keeps_input() {
    let (dir, input, content) = make_temp_input();
    let out = bzs(dir.path(), &["-c", "-3", "input.txt"]);
    assert!(out.status.success());
    assert!(input.exists());
    assert!(out.stdout.starts_with(b"BZh3"));
    assert_eq!(
        bzs::decompress(&out.stdout, &bzs::DecompressorOptions::default()).unwrap(),
        content
    );
}

#[test]
fn stdin_to_stdout_round_trip() {
    let dir = TempDir::new().unwrap();
    let payload = b"piped through stdin and stdout\n".repeat(100);

    let mut child = Command::new(bzs_bin())
        .args(["-z", "-c"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&payload).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());

    let mut child = Command::new(bzs_bin())
        .args(["-dc"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&packed.stdout).unwrap();
    let plain = child.wait_with_output().unwrap();
    assert!(plain.status.success());
    assert_eq!(plain.stdout, payload);
}

#[test]
fn test_mode_detects_corruption() {
    let (dir, _, _) = make_temp_input();
    assert!(bzs(dir.path(), &["-k", "input.txt"]).status.success());
    let out = bzs(dir.path(), &["-t", "input.txt.bz2"]);
    assert!(out.status.success());

    let packed = dir.path().join("input.txt.bz2");
    let mut bytes = fs::read(&packed).unwrap();
    let cut = bytes.len() / 2;
    bytes.truncate(cut);
    fs::write(&packed, &bytes).unwrap();
    let out = bzs(dir.path(), &["-t", "input.txt.bz2"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(packed.exists(), "test mode never removes its input");
}

#[test]
fn corrupt_decompress_leaves_no_partial_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.bz2"), b"BZh9 this is not a block").unwrap();
    let out = bzs(dir.path(), &["-d", "bad.bz2"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!dir.path().join("bad").exists());
    assert!(dir.path().join("bad.bz2").exists());
}

#[test]
fn missing_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = bzs(dir.path(), &["nope.txt"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn several_files_with_threads() {
    let dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..5).map(|i| format!("part{i}.log")).collect();
    for (i, name) in names.iter().enumerate() {
        fs::write(dir.path().join(name), format!("log entry {i}\n").repeat(500)).unwrap();
    }
    let mut args = vec!["-k", "-T", "3"];
    args.extend(names.iter().map(String::as_str));
    assert!(bzs(dir.path(), &args).status.success());

    for (i, name) in names.iter().enumerate() {
        let packed = fs::read(dir.path().join(format!("{name}.bz2"))).unwrap();
        let mut back = String::new();
        bzip2::read::BzDecoder::new(&packed[..]).read_to_string(&mut back).unwrap();
        assert_eq!(back, format!("log entry {i}\n").repeat(500));
    }
}

#[test]
fn recursive_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("tree/sub")).unwrap();
    fs::write(dir.path().join("tree/a.txt"), b"aaaa").unwrap();
    fs::write(dir.path().join("tree/sub/b.txt"), b"bbbb").unwrap();

    let out = bzs(dir.path(), &["tree"]);
    assert!(out.status.success(), "directory without -r is skipped, not an error");
    assert!(dir.path().join("tree/a.txt").exists());

    assert!(bzs(dir.path(), &["-r", "tree"]).status.success());
    assert!(dir.path().join("tree/a.txt.bz2").exists());
    assert!(dir.path().join("tree/sub/b.txt.bz2").exists());
}

#[test]
fn block_size_from_environment() {
    let (dir, _, _) = make_temp_input();
    let out = Command::new(bzs_bin())
        .args(["-c", "input.txt"])
        .current_dir(dir.path())
        .env("BZS_CLEVEL", "2")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.starts_with(b"BZh2"));
}

#[test]
fn version_and_help() {
    let dir = TempDir::new().unwrap();
    let out = bzs(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));

    let out = bzs(dir.path(), &["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("--decompress"));
}
