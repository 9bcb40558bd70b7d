#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("roulement-cli").unwrap();
    cmd.current_dir(dir).args([
        "--employees",
        "employees.csv",
        "--leaves",
        "leaves.csv",
        "--holidays",
        "holidays.csv",
    ]);
    cmd
}

fn week(args: &[&str]) -> Vec<String> {
    args.iter()
        .map(|s| s.to_string())
        .chain(["--year", "2024", "--week", "10"].map(String::from))
        .collect()
}

#[test]
fn plan_generate_and_report_issues() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("employees.csv"),
        "handle,display_name,country\nalice,Alice,FR\nbob,Bob,FR\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("leaves.csv"),
        "handle,from,to,reason\nbob,2024-03-07,2024-03-07,sick\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("holidays.csv"),
        "date,name\n2024-03-06,Fête locale\n",
    )
    .unwrap();

    cli(dir.path())
        .args(["new-plan", "--year", "2024", "--week", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024 Week 10 (2024-03-04 - 2024-03-10)"));

    cli(dir.path())
        .args(["new-plan", "--year", "2024", "--week", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("constraint violation"));

    cli(dir.path())
        .args([
            "save-template",
            "--id",
            "morning",
            "--name",
            "Morning",
            "--start",
            "9.5",
            "--end",
            "17.25",
        ])
        .assert()
        .success();

    cli(dir.path())
        .args(week(&["generate"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 shift(s) created"));

    cli(dir.path())
        .args(week(&["set-template", "--employee", "bob", "--template", "morning"]))
        .assert()
        .success();

    cli(dir.path())
        .args(week(&["set-day", "--employee", "bob", "--day", "3", "--template", "morning"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("on leave"));

    cli(dir.path())
        .args(week(&["unassign", "--employee", "bob", "--day", "9"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid day number: 9"));

    cli(dir.path())
        .args(week(&["unassign", "--employee", "carla", "--day", "0"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown employee: carla"));

    cli(dir.path())
        .args(week(&["issues"]))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("bob on leave: Thursday"));

    cli(dir.path())
        .args(week(&["list", "--out-csv", "lines.csv"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Wednesday holiday"));

    let csv = fs::read_to_string(dir.path().join("lines.csv")).unwrap();
    assert!(csv.starts_with("plan,employee,day,date,template,start,end,state"));
    assert!(csv.contains("bob,Monday,2024-03-04,morning,2024-03-04T09:30:00+00:00"));
    assert!(csv.contains("bob,Thursday,2024-03-07,,"));
    assert!(csv.contains("on_leave"));
}
