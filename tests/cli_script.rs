use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitbook_cli").unwrap();
    cmd.env("SPLITBOOK_CLI_SCRIPT", "1")
        .env("SPLITBOOK_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "group-new Trip Alice Bob\n\
                 expense-add Trip Dinner 100 Alice\n\
                 balances Trip\n\
                 exit\n";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Group `Trip` created"))
        .stdout(contains("Bob owes Alice ₹50.00"));

    let json = fs::read_to_string(home.path().join("data/groups.json")).unwrap();
    let groups: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(groups[0]["name"], "Trip");
    assert_eq!(groups[0]["expenses"][0]["paidBy"], "Alice");
}

#[test]
fn groups_survive_between_runs() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("group-new Flat Ann Ben\nexpense-add Flat Rent 60 Ann Ben=60\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("groups\nsettle Flat\nbalances Flat\n")
        .assert()
        .success()
        .stdout(contains("Flat"))
        .stdout(contains("Recorded: Ben owes Ann ₹60.00"))
        .stdout(contains("Everyone is settled up."));
}

#[test]
fn command_errors_do_not_stop_the_script() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("balances Nowhere\nblances\ngroup-new Trip Alice\ngroups\n")
        .assert()
        .success()
        .stdout(contains("Group not found: Nowhere"))
        .stdout(contains("Did you mean `balances`?"))
        .stdout(contains("Trip"));
}

#[test]
fn mismatched_split_is_reported() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("group-new Trip Alice Bob\nexpense-add Trip Taxi 30 Alice Alice=10 Bob=10\n")
        .assert()
        .success()
        .stdout(contains("split does not match total amount"));
}

#[test]
fn saves_rotate_into_backups() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("group-new Trip Alice Bob\nmember-add Trip Carol\nbackups\n")
        .assert()
        .success()
        .stdout(contains("groups_"));
}
