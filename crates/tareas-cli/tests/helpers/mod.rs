#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness for running CLI commands against a temporary database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command configured for testing. It runs inside the temp
    /// directory so no stray `tareas.toml` is picked up.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tareas").expect("Failed to find tareas binary");
        cmd.current_dir(self.temp_dir.path());
        cmd.env("TAREAS_DATABASE_PATH", &self.db_path);
        cmd.env_remove("TAREAS_DEFAULT_USER");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Write a `tareas.toml` into the working directory of every command
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.temp_dir.path().join("tareas.toml"), contents)
            .expect("Failed to write config file");
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created task"))
    }

    pub fn has_occurrence_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Date")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Status"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
    }
}
