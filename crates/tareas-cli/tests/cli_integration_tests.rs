//! Black-box tests of the `tareas` binary against a temporary database.

use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("recurring tasks"))
        .stdout(predicate::str::contains("calendar"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("tareas"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_add_and_list() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add", "Comprar pan", "--category", "personal", "--due", "2030-01-15"])
        .stdout(assertions::task_created_successfully())
        .stdout(predicate::str::contains("Due 2030-01-15"));

    harness
        .run_success(&["add", "Standup", "--category", "work", "--due", "2024-01-01", "--every", "daily"])
        .stdout(assertions::task_created_successfully())
        .stdout(predicate::str::contains("Repeats daily"));

    assert!(harness.db_path().exists());

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Comprar pan"))
        .stdout(predicate::str::contains("Standup"))
        .stdout(predicate::str::contains("2030-01-15"));
}

#[test]
fn test_add_validation_errors() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Sin fecha", "--every", "weekly"])
        .stderr(assertions::has_error())
        .stderr(predicate::str::contains("start date"));

    harness
        .run_failure(&["add", "Al revés", "--due", "2024-05-01", "--every", "daily", "--until", "2024-04-01"])
        .stderr(predicate::str::contains("Invalid input"));

    harness
        .run_failure(&["add", "Rara", "--category", "hobby"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_range_lists_occurrences_in_order() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Semanal", "--due", "2024-01-01", "--every", "weekly"]);
    harness.run_success(&["add", "Puntual", "--due", "2024-01-17"]);

    let output = harness
        .run_success(&["range", "2024-01-10", "2024-01-31"])
        .stdout(assertions::has_occurrence_table_headers())
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    let positions: Vec<usize> = ["2024-01-15", "2024-01-17", "2024-01-22", "2024-01-29"]
        .iter()
        .map(|date| stdout.find(date).unwrap_or_else(|| panic!("{date} missing from:\n{stdout}")))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(!stdout.contains("2024-01-08"));

    harness
        .run_failure(&["range", "2024-02-01", "2024-01-01"])
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_set_occurrence_state() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Correr", "--due", "2024-03-01", "--every", "daily", "--interval", "2"]);

    harness
        .run_success(&["set", "1", "2024-03-03", "completed", "--notes", "5 km"])
        .stdout(predicate::str::contains("is now completed"))
        .stdout(predicate::str::contains("5 km"));

    harness
        .run_success(&["day", "2024-03-03"])
        .stdout(predicate::str::contains("Completed"))
        .stdout(predicate::str::contains("5 km"));

    harness
        .run_success(&["day", "2024-03-05"])
        .stdout(predicate::str::contains("Pending"));

    // 2024-03-04 is not an occurrence of an every-other-day task.
    harness
        .run_failure(&["set", "1", "2024-03-04", "completed"])
        .stderr(predicate::str::contains("not an occurrence"));

    harness
        .run_failure(&["set", "99", "2024-03-03", "completed"])
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_users_are_isolated() {
    let harness = CliTestHarness::new();

    harness.run_success(&["--user", "1", "add", "De Ana", "--due", "2024-06-01"]);

    harness
        .run_success(&["--user", "2", "list"])
        .stdout(predicate::str::contains("No tasks found."));

    harness
        .run_failure(&["--user", "2", "set", "1", "2024-06-01", "completed"])
        .stderr(predicate::str::contains("not found"));

    harness
        .run_success(&["--user", "1", "list"])
        .stdout(predicate::str::contains("De Ana"));
}

#[test]
fn test_stats_and_calendar() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Informe", "--due", "2024-02-10"]);
    harness.run_success(&["add", "Repaso", "--category", "study", "--due", "2024-02-01", "--every", "weekly"]);
    harness.run_success(&["set", "1", "2024-02-10", "in_progress"]);

    harness
        .run_success(&["stats"])
        .stdout(predicate::str::contains("Total"))
        .stdout(predicate::str::contains("2"));

    harness
        .run_success(&["calendar", "2024-02-01", "2024-02-14"])
        .stdout(predicate::str::contains("Recurring occurrences"))
        .stdout(predicate::str::contains("2024-02-08"))
        .stdout(predicate::str::contains("Informe"))
        .stdout(predicate::str::contains("In progress"));
}

#[test]
fn test_delete_requires_existing_task() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Temporal"]);

    harness
        .run_success(&["delete", "1", "--force"])
        .stdout(predicate::str::contains("Deleted task: Temporal"));

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("No tasks found."));

    harness
        .run_failure(&["delete", "1", "--force"])
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_delete_without_terminal_keeps_task() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Persistente"]);

    harness
        .run_failure(&["delete", "1"])
        .stderr(predicate::str::contains("--force"));

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Persistente"));
}

#[test]
fn test_config_file_sets_default_user() {
    let harness = CliTestHarness::new();
    harness.write_config("default_user = 5\n");

    harness.run_success(&["add", "Configurada"]);

    harness
        .run_success(&["--user", "5", "list"])
        .stdout(predicate::str::contains("Configurada"));
    harness
        .run_success(&["--user", "1", "list"])
        .stdout(predicate::str::contains("No tasks found."));
}
