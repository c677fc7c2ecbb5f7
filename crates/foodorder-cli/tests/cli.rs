use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

const ORDERS_CSV: &str = "\
Timestamp,Email Address,meal
2020/01/02 12:00,ada.lovelace@x.com,[Fafa] Salad
2020/01/02 12:05,alan.turing@x.com,[Fafa] Salad
2020/01/02 12:07,grace.hopper@x.com,[Sushi Bar] Maki
";

fn run(db_path: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("foodorder")
        .env("XDG_CONFIG_HOME", db_path.parent().expect("parent"))
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(db_path: &Path, args: &[&str]) -> String {
    let output = run(db_path, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(db_path: &Path, args: &[&str]) -> Value {
    let mut all = vec!["--json"];
    all.extend_from_slice(args);
    let output = run(db_path, &all);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn upload_then_render_latest_batch() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("foodorder.sqlite3");
    let csv = write_csv(temp.path(), "orders.csv", ORDERS_CSV);

    let report = run_cmd_json(
        &db_path,
        &["upload", csv.to_str().expect("csv"), "--user", "omid"],
    );
    assert_eq!(report["id"], 1);
    assert_eq!(report["rows"], 3);

    let tally = run_cmd_json(&db_path, &["tally"]);
    assert_eq!(tally["[fafa]"]["Salad"], 2);
    assert_eq!(tally["[sushi bar]"]["Maki"], 1);

    let who = run_cmd_json(&db_path, &["who", "--search", "TURING"]);
    let entries = who.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "alan turing");
    assert_eq!(entries[0]["meal"], "[Fafa] Salad");

    let latest = run_cmd_json(&db_path, &["latest"]);
    assert_eq!(latest["username"], "omid");
    assert_eq!(latest["survey_data"].as_array().expect("rows").len(), 3);

    let mail = run_cmd_json(&db_path, &["mail"]);
    let restaurants = mail.as_array().expect("array");
    assert_eq!(restaurants.len(), 2);
    assert_eq!(restaurants[0]["display_name"], "fafa");
    assert_eq!(restaurants[0]["recipients"], 2);
    let link = restaurants[0]["links"][0].as_str().expect("link");
    assert!(link.starts_with("mailto:?"));
    assert!(link.ends_with("bcc=ada.lovelace@x.com;alan.turing@x.com"));

    let notice = run_cmd_json(&db_path, &["notice"]);
    assert_eq!(notice["total_meals"], 3);
    assert_eq!(notice["is_stale"], true);

    let text = run_cmd(&db_path, &["tally"]);
    assert!(text.contains("fafa (2 meals)"));
    assert!(text.contains("  2 x Salad"));
}

#[test]
fn invalid_upload_exits_with_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("foodorder.sqlite3");
    let csv = write_csv(
        temp.path(),
        "bad.csv",
        "Timestamp,Email Address,meal\nyesterday,not-an-email,Salad\n",
    );

    let output = run(&db_path, &["upload", csv.to_str().expect("csv")]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("row 1: \"Email Address\" must be a valid email"));
    assert!(stderr.contains("hint: prefix the meal with its restaurant"));

    let list = run_cmd_json(&db_path, &["list"]);
    assert!(list.as_array().expect("array").is_empty());
}

#[test]
fn list_show_and_clear() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("foodorder.sqlite3");
    let csv = write_csv(temp.path(), "orders.csv", ORDERS_CSV);

    run_cmd(&db_path, &["upload", csv.to_str().expect("csv")]);
    let cleared = run_cmd_json(&db_path, &["clear", "--user", "ada"]);
    assert_eq!(cleared["id"], 2);

    let list = run_cmd_json(&db_path, &["list"]);
    let ids: Vec<i64> = list
        .as_array()
        .expect("array")
        .iter()
        .map(|batch| batch["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![2, 1]);

    let first = run_cmd_json(&db_path, &["show", "1"]);
    assert_eq!(first["survey_data"].as_array().expect("rows").len(), 3);

    let latest = run_cmd_json(&db_path, &["latest"]);
    assert!(latest["survey_data"].as_array().expect("rows").is_empty());

    let tally = run_cmd(&db_path, &["tally"]);
    assert_eq!(tally.trim(), "no orders");

    let old_tally = run_cmd_json(&db_path, &["tally", "--id", "1"]);
    assert_eq!(old_tally["[fafa]"]["Salad"], 2);
}

#[test]
fn missing_batches_exit_with_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("foodorder.sqlite3");

    assert_eq!(run(&db_path, &["latest"]).status.code(), Some(2));
    assert_eq!(run(&db_path, &["tally"]).status.code(), Some(2));
    assert_eq!(run(&db_path, &["show", "9"]).status.code(), Some(2));
    assert_eq!(run(&db_path, &["show", "nine"]).status.code(), Some(3));
}

#[test]
fn unreachable_gateway_falls_back_to_session_cache() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("foodorder.sqlite3");
    let csv = write_csv(temp.path(), "orders.csv", ORDERS_CSV);

    let config_dir = temp.path().join("foodorder");
    fs::create_dir_all(&config_dir).expect("config dir");
    let config_path = config_dir.join("config.toml");
    fs::write(&config_path, "[session]\npersist = true\n").expect("write config");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600)).expect("chmod");
    }

    run_cmd(&db_path, &["upload", csv.to_str().expect("csv")]);
    assert!(temp.path().join("session.json").exists());

    let unreachable = ["--server", "http://127.0.0.1:9"];

    let mut args = unreachable.to_vec();
    args.extend_from_slice(&["--json", "tally"]);
    let output = run(&db_path, &args);
    assert!(output.status.success(), "command failed: {:?}", output);
    let tally: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(tally["[fafa]"]["Salad"], 2);
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("showing the last cached orders"));

    fs::remove_file(temp.path().join("session.json")).expect("remove session");
    let mut args = unreachable.to_vec();
    args.push("tally");
    assert_eq!(run(&db_path, &args).status.code(), Some(4));
}
