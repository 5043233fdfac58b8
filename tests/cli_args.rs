//! Integration tests for CLI argument handling and the interactive prompt
//!
//! Runs the binary with scripted stdin. Only offline commands are used, so no
//! request ever reaches the network.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Helper to run the CLI with given args and stdin, capturing output
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pokedex"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute pokedex");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for pokedex")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], "");
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pokedex"), "Help should mention pokedex");
    assert!(stdout.contains("--cache-interval"), "Help should mention --cache-interval");
    assert!(stdout.contains("--page-size"), "Help should mention --page-size");
}

#[test]
fn test_zero_page_size_prints_error_and_exits() {
    let output = run_cli(&["--page-size", "0"], "");
    assert!(!output.status.success(), "Expected zero page size to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid page size"),
        "Should print error message about page size: {}",
        stderr
    );
}

#[test]
fn test_non_numeric_interval_is_rejected() {
    let output = run_cli(&["--cache-interval", "soon"], "");
    assert!(!output.status.success());
}

#[test]
fn test_exit_command_ends_session() {
    let output = run_cli(&[], "help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pokedex > "));
    assert!(stdout.contains("Welcome to the Pokedex!"));
    assert!(stdout.contains("Goodbye"));
}

#[test]
fn test_end_of_input_ends_session() {
    let output = run_cli(&["--cache-interval", "0"], "pokedex\ninspect\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("You haven't caught any pokemon yet!"));
    assert!(stdout.contains("You have 0 pokemon in your pokedex"));
}

#[test]
fn test_unknown_command_keeps_running() {
    let output = run_cli(&[], "surf\npokedex\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unknown command: 'surf'"));
    assert!(stdout.contains("You haven't caught any pokemon yet!"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use pokedex::cli::{Cli, StartupConfig};
    use std::time::Duration;

    #[test]
    fn test_startup_config_from_cli_custom_interval() {
        let cli = Cli::parse_from(["pokedex", "--cache-interval", "5"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cache_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_startup_config_from_cli_custom_page_size() {
        let cli = Cli::parse_from(["pokedex", "--page-size", "5"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_cli_rejects_negative_interval() {
        let result = Cli::try_parse_from(["pokedex", "--cache-interval", "-1"]);
        assert!(result.is_err());
    }
}
