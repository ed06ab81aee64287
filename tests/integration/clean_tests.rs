//! End-to-end runs of the `scan` and `clean` subcommands through
//! `run_with_io`, with the prompt answer and the report captured in memory.

use clap::Parser;
use dups::cli::Cli;
use dups::error::ExitCode;
use dups::output::text::{DELETE_PROMPT, NO_DUPLICATES, SEPARATOR};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn cli(dir: &TempDir, args: &[&str]) -> Cli {
    // Point at a missing config file so the user's settings never leak in
    let config = dir.path().join("no-such-config.toml");
    let mut argv = vec![
        "dups".to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(argv).unwrap()
}

fn run(cli: Cli, answer: &str) -> (ExitCode, String) {
    let mut output = Vec::new();
    let code = dups::run_with_io(cli, answer.as_bytes(), &mut output).unwrap();
    (code, String::from_utf8(output).unwrap())
}

fn trivial_corpus() -> (TempDir, TempDir) {
    let config_dir = tempdir().unwrap();
    let data = tempdir().unwrap();
    fs::write(data.path().join("a.txt"), "hello\n").unwrap();
    fs::write(data.path().join("b.txt"), "hello\n").unwrap();
    fs::write(data.path().join("c.txt"), "world\n").unwrap();
    (config_dir, data)
}

fn path_arg(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

#[test]
fn test_clean_removes_redundant_copies() {
    let (config_dir, data) = trivial_corpus();
    let root = path_arg(data.path());

    let (code, out) = run(
        cli(&config_dir, &["clean", "--min-size", "0", &root]),
        "",
    );

    assert_eq!(code, ExitCode::Success);
    assert!(data.path().join("a.txt").exists());
    assert!(!data.path().join("b.txt").exists());
    assert!(data.path().join("c.txt").exists());

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "scanning path ...");
    assert_eq!(
        lines[1],
        "found 3 files. calculating hashes using md5 algorithm with multicore: true"
    );
    assert_eq!(lines[2], "scanning for duplicates ...");
    assert_eq!(lines[3], "found 1 files with total of 1 duplicates");
    assert_eq!(lines[4], format!("Path: {}/a.txt", root));
    assert_eq!(lines[5], "Size: 6");
    assert_eq!(lines[6], format!("{}/b.txt", root));
    assert_eq!(lines[7], SEPARATOR);
    assert_eq!(lines[8], "removed 1 files with the total size of 6 bytes.");
    assert_eq!(lines.len(), 9);
}

#[test]
fn test_clean_without_duplicates() {
    let config_dir = tempdir().unwrap();
    let data = tempdir().unwrap();
    fs::write(data.path().join("solo"), "nothing else looks like this").unwrap();

    let (code, out) = run(cli(&config_dir, &["clean", &path_arg(data.path())]), "");

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("found 0 files with total of 0 duplicates"));
    assert!(out.ends_with(&format!("{}\n", NO_DUPLICATES)));
    assert!(!out.contains("removed"));
}

#[test]
fn test_clean_flat_prints_only_redundant_paths() {
    let (config_dir, data) = trivial_corpus();
    let root = path_arg(data.path());

    let (_, out) = run(
        cli(&config_dir, &["clean", "--flat", "--min-size", "0", &root]),
        "",
    );

    assert_eq!(out, format!("{}/b.txt\n", root));
    assert!(!data.path().join("b.txt").exists());
}

#[test]
fn test_scan_prompt_declined_keeps_files() {
    let (config_dir, data) = trivial_corpus();
    let root = path_arg(data.path());

    let (code, out) = run(
        cli(&config_dir, &["scan", "--min-size", "0", &root]),
        "n\n",
    );

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("Listing completed."));
    assert!(out.contains(DELETE_PROMPT));
    assert!(!out.contains("removed"));
    assert!(data.path().join("b.txt").exists());
}

#[test]
fn test_scan_prompt_accepted_removes_files() {
    let (config_dir, data) = trivial_corpus();
    let root = path_arg(data.path());

    let (_, out) = run(
        cli(&config_dir, &["scan", "--min-size", "0", &root]),
        "yes\n",
    );

    assert!(out.ends_with("removed 1 files with the total size of 6 bytes.\n"));
    assert!(!data.path().join("b.txt").exists());
    assert!(data.path().join("a.txt").exists());
}

#[test]
fn test_scan_eof_on_prompt_is_no() {
    let (config_dir, data) = trivial_corpus();

    run(
        cli(&config_dir, &["scan", "--min-size", "0", &path_arg(data.path())]),
        "",
    );

    assert!(data.path().join("b.txt").exists());
}

#[test]
fn test_scan_flat_never_prompts() {
    let (config_dir, data) = trivial_corpus();
    let root = path_arg(data.path());

    let (_, out) = run(
        cli(&config_dir, &["scan", "-f", "--min-size", "0", &root]),
        "y\n",
    );

    assert_eq!(out, format!("{}/b.txt\n", root));
    assert!(data.path().join("b.txt").exists());
}

#[test]
fn test_scan_without_duplicates_skips_prompt() {
    let config_dir = tempdir().unwrap();
    let data = tempdir().unwrap();
    fs::write(data.path().join("one"), "first file body").unwrap();
    fs::write(data.path().join("two"), "second file body!").unwrap();

    let (_, out) = run(cli(&config_dir, &["scan", &path_arg(data.path())]), "y\n");

    assert!(!out.contains(DELETE_PROMPT));
    assert!(out.contains("found 0 files with total of 0 duplicates"));
}

#[test]
fn test_scan_reports_selected_algorithm_and_mode() {
    let (config_dir, data) = trivial_corpus();

    let (_, out) = run(
        cli(
            &config_dir,
            &[
                "scan",
                "-s",
                "--algorithm",
                "XXHASH",
                "--min-size",
                "0",
                &path_arg(data.path()),
            ],
        ),
        "n\n",
    );

    assert!(out.contains("calculating hashes using xxhash algorithm with multicore: false"));
    assert!(out.contains("found 1 files with total of 1 duplicates"));
}

#[test]
fn test_scan_config_file_is_applied() {
    let (config_dir, data) = trivial_corpus();
    fs::write(
        config_dir.path().join("settings.toml"),
        "min_size = 0\nalgorithm = \"sha256\"\n",
    )
    .unwrap();

    let settings = path_arg(&config_dir.path().join("settings.toml"));
    let root = path_arg(data.path());
    let cli = Cli::try_parse_from(["dups", "--config", settings.as_str(), "scan", root.as_str()])
        .unwrap();
    let (_, out) = run(cli, "n\n");

    assert!(out.contains("using sha256 algorithm"));
    assert!(out.contains("found 1 files with total of 1 duplicates"));
}

#[cfg(unix)]
#[test]
fn test_scan_accepts_backslash_separators() {
    let config_dir = tempdir().unwrap();
    let data = tempdir().unwrap();
    let sub = data.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("p"), "backslash separated").unwrap();
    fs::write(sub.join("q"), "backslash separated").unwrap();

    let root = format!("{}\\sub", path_arg(data.path()));
    let (_, out) = run(cli(&config_dir, &["scan", "-f", &root]), "");

    assert_eq!(out, format!("{}/sub/q\n", path_arg(data.path())));
}

#[test]
fn test_clean_full_false_ignores_subdirectories() {
    let config_dir = tempdir().unwrap();
    let data = tempdir().unwrap();
    let root = path_arg(data.path());
    let sub = data.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(data.path().join("top1"), "top level content").unwrap();
    fs::write(data.path().join("top2"), "top level content").unwrap();
    fs::write(sub.join("deep1"), "only inside sub dir").unwrap();
    fs::write(sub.join("deep2"), "only inside sub dir").unwrap();

    let (_, out) = run(cli(&config_dir, &["clean", "--full=false", &root]), "");

    assert!(out.contains("found 2 files. calculating hashes"));
    assert!(out.contains("found 1 files with total of 1 duplicates"));
    assert!(!out.contains("deep"));
    assert!(!data.path().join("top2").exists());
    assert!(sub.join("deep1").exists());
    assert!(sub.join("deep2").exists());

    // Recursion is back on without the flag
    let (_, out) = run(cli(&config_dir, &["clean", "-f", &root]), "");
    assert_eq!(out, format!("{}/sub/deep2\n", root));
}

#[cfg(unix)]
#[test]
fn test_clean_never_deletes_through_symlinks() {
    let (config_dir, data) = trivial_corpus();
    let root = path_arg(data.path());
    // Both links sort before the real files
    std::os::unix::fs::symlink("c.txt", data.path().join("0link")).unwrap();
    std::os::unix::fs::symlink("a.txt", data.path().join("0copy")).unwrap();

    let (_, out) = run(
        cli(&config_dir, &["clean", "--min-size", "0", &root]),
        "",
    );

    assert!(out.contains("found 3 files. calculating hashes"));
    assert!(out.contains(&format!("Path: {}/a.txt", root)));
    assert!(!out.contains("0link"));
    assert!(!out.contains("0copy"));
    assert!(out.ends_with("removed 1 files with the total size of 6 bytes.\n"));

    assert_eq!(fs::read_to_string(data.path().join("0link")).unwrap(), "world\n");
    assert_eq!(fs::read_to_string(data.path().join("0copy")).unwrap(), "hello\n");
    assert!(!data.path().join("b.txt").exists());
}
