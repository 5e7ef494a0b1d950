//! End-to-end runs of the `todo` binary against a throwaway database file.

#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestDb {
    _dir: TempDir,
    url: String,
}

impl TestDb {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("todo.db").display());
        Self { _dir: dir, url }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("todo"));
        cmd.env_remove("RUST_LOG").env("DATABASE_URL", &self.url);
        cmd
    }

    fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.cmd().args(args).assert().success()
    }

    fn initialized() -> Self {
        let db = Self::new();
        db.run(&["initialize"])
            .stdout(predicate::str::contains("Database Initialized"));
        db
    }
}

#[test]
fn test_bob_scenario() {
    let db = TestDb::initialized();

    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("ID: 1, Text: Wash dishes, Username: bob, Done: false"));

    db.run(&["add-task", "bob", "Buy milk"])
        .stdout(predicate::str::contains("Task added for user"));

    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("Wash dishes"))
        .stdout(predicate::str::contains("ID: 2, Text: Buy milk, Username: bob"));

    db.run(&["toggle-todo", "1", "bob"])
        .stdout(predicate::str::contains("done state set to true"));

    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("Text: Wash dishes, Username: bob, Done: true"));
}

#[test]
fn test_initialize_wipes_previous_data() {
    let db = TestDb::initialized();
    db.run(&["add-task", "bob", "Buy milk"]);

    db.run(&["initialize"]);
    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("Buy milk").not());
}

#[test]
fn test_empty_database_reports_no_data() {
    let db = TestDb::new();
    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("No data"));
}

#[test]
fn test_unknown_user_is_reported() {
    let db = TestDb::initialized();
    db.run(&["add-task", "nobody", "Buy milk"])
        .stdout(predicate::str::contains("User nobody doesn't exist"));
}

#[test]
fn test_toggle_by_other_user_is_refused() {
    let db = TestDb::initialized();
    db.run(&["create-user", "alice", "alice@mail.com", "pw"])
        .stdout(predicate::str::contains("User alice created"));

    db.run(&["toggle-todo", "1", "alice"])
        .stdout(predicate::str::contains("Todo 1 doesn't belong to alice"));
    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("Done: false"));
}

#[test]
fn test_categories_flow() {
    let db = TestDb::initialized();

    db.run(&["create-category", "bob", "chores"])
        .stdout(predicate::str::contains("added for user"));
    db.run(&["create-category", "bob", "chores"])
        .stdout(predicate::str::contains("exists! Skipping creation"));

    db.run(&["assign-category-to-todo", "bob", "1", "kitchen"])
        .stdout(predicate::str::contains("didn't exist for user"))
        .stdout(predicate::str::contains("Added category to todo"));
    db.run(&["assign-category-to-todo", "bob", "1", "kitchen"])
        .stdout(predicate::str::contains("already assigned"));

    db.run(&["list-user-categories", "bob"])
        .stdout(predicate::str::contains(r#"["chores", "kitchen"]"#));
    db.run(&["list-todo-categories", "1", "bob"])
        .stdout(predicate::str::contains(r#"Categories: ["kitchen"]"#));
}

#[test]
fn test_delete_todo() {
    let db = TestDb::initialized();

    db.run(&["delete-todo", "99"])
        .stdout(predicate::str::contains("99 not found! Unable to delete todo id."));
    db.run(&["delete-todo", "1", "--username", "eve"])
        .stdout(predicate::str::contains("doesn't belong to eve"));
    db.run(&["delete-todo", "1"])
        .stdout(predicate::str::contains("1 deleted"));
    db.run(&["toggle-todo", "1", "bob"])
        .stdout(predicate::str::contains("Todo 1 doesn't exist"));
}

#[test]
fn test_toggle_todo_done() {
    let db = TestDb::initialized();
    db.run(&["add-task", "bob", "Buy milk"]);

    db.run(&["toggle-todo-done", "1"])
        .stdout(predicate::str::contains("set to completed"));
    db.run(&["list-todo-data"])
        .stdout(predicate::str::contains("Done: false").not());

    db.run(&["toggle-todo-done", "42"])
        .stdout(predicate::str::contains("User with id 42 doesn't exist"));
}

#[test]
fn test_non_integer_id_is_usage_error() {
    let db = TestDb::new();
    db.cmd()
        .args(["toggle-todo", "one", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_unopenable_database_fails() {
    let db = TestDb::new();
    db.cmd()
        .args(["--database-url", "sqlite:///nonexistent-dir/sub/todo.db", "list-todo-data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open database"));
}
