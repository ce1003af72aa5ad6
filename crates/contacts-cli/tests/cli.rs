use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command with data dir and config file pointed into a temp directory
fn contacts(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("contacts").unwrap();
    cmd.env("CONTACTS_DATA_DIR", temp_dir.path().join("data"))
        .env("CONTACTS_CONFIG", temp_dir.path().join("config.toml"))
        .env_remove("CONTACTS_FILE")
        .env_remove("CONTACTS_LOG_LEVEL")
        .env_remove("CONTACTS_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn contacts_file(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data").join("contacts.json")
}

fn add(temp_dir: &TempDir, name: &str, phone: &str) {
    contacts(temp_dir)
        .args(["add", "--name", name, "--phone", phone])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Added contact: {}", name)));
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn init_creates_empty_file() {
    let temp_dir = TempDir::new().unwrap();

    contacts(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created contacts file"));

    assert_eq!(
        fs::read_to_string(contacts_file(&temp_dir)).unwrap(),
        "[]"
    );

    // Second run leaves the file alone
    contacts(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));

    assert_eq!(
        fs::read_to_string(contacts_file(&temp_dir)).unwrap(),
        "[]"
    );
}

#[test]
fn list_empty_directory() {
    let temp_dir = TempDir::new().unwrap();

    contacts(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts yet."));
}

#[test]
fn add_list_show() {
    let temp_dir = TempDir::new().unwrap();

    contacts(&temp_dir)
        .args([
            "add",
            "--name",
            "Alice",
            "--phone",
            "111",
            "--field",
            "email=alice@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added contact: Alice"));
    add(&temp_dir, "Bob", "222");

    contacts(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("2 contact(s)"));

    contacts(&temp_dir)
        .args(["show", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("111"))
        .stdout(predicate::str::contains("alice@example.com"));

    assert_eq!(
        read_json(&contacts_file(&temp_dir)),
        serde_json::json!([
            {"name": "Alice", "phone": "111", "email": "alice@example.com"},
            {"name": "Bob", "phone": "222"}
        ])
    );
}

#[test]
fn duplicate_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    add(&temp_dir, "Alice", "111");

    contacts(&temp_dir)
        .args(["add", "--name", "Alice", "--phone", "222"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name already registered: Alice"));

    // Different case is a different contact
    add(&temp_dir, "alice", "333");

    let stored = read_json(&contacts_file(&temp_dir));
    assert_eq!(stored.as_array().unwrap().len(), 2);
}

#[test]
fn show_unknown_contact_fails() {
    let temp_dir = TempDir::new().unwrap();
    add(&temp_dir, "Alice", "111");

    contacts(&temp_dir)
        .args(["show", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact not found: Nobody"));
}

#[test]
fn add_rejects_blank_name_and_bad_field() {
    let temp_dir = TempDir::new().unwrap();

    contacts(&temp_dir)
        .args(["add", "--name", "  ", "--phone", "111"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name must not be empty"));

    contacts(&temp_dir)
        .args(["add", "--name", "Alice", "--field", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}

#[test]
fn json_output() {
    let temp_dir = TempDir::new().unwrap();
    add(&temp_dir, "Alice", "111");

    let assert = contacts(&temp_dir)
        .args(["--json", "list"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let listed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listed, serde_json::json!([{"name": "Alice", "phone": "111"}]));

    let assert = contacts(&temp_dir)
        .args(["show", "ALICE", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let shown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["name"], "Alice");
}

#[test]
fn quiet_list_prints_names_only() {
    let temp_dir = TempDir::new().unwrap();
    add(&temp_dir, "Alice", "111");
    add(&temp_dir, "Bob", "222");

    contacts(&temp_dir)
        .args(["-q", "list"])
        .assert()
        .success()
        .stdout("Alice\nBob\n");
}

#[test]
fn corrupt_file_lists_as_empty_with_warning() {
    let temp_dir = TempDir::new().unwrap();
    contacts(&temp_dir).arg("init").assert().success();
    fs::write(contacts_file(&temp_dir), "{}").unwrap();

    contacts(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts yet."))
        .stderr(predicate::str::contains("malformed"));

    add(&temp_dir, "Alice", "111");

    let backup = temp_dir
        .path()
        .join("data")
        .join("contacts.json.corrupt.backup");
    assert_eq!(fs::read_to_string(backup).unwrap(), "{}");

    // A second damaged file gets its own backup
    fs::write(contacts_file(&temp_dir), "oops").unwrap();
    add(&temp_dir, "Bob", "222");

    let second = temp_dir
        .path()
        .join("data")
        .join("contacts.json.corrupt.backup.1");
    assert_eq!(fs::read_to_string(second).unwrap(), "oops");
    assert_eq!(
        fs::read_to_string(
            temp_dir
                .path()
                .join("data")
                .join("contacts.json.corrupt.backup")
        )
        .unwrap(),
        "{}"
    );
}

#[test]
fn hand_edited_records_survive_list_and_add() {
    let temp_dir = TempDir::new().unwrap();
    contacts(&temp_dir).arg("init").assert().success();
    fs::write(
        contacts_file(&temp_dir),
        r#"[{"name":"Alice","phone":"111"},{"name":"Bob","phone":5551234},{"phone":"999"}]"#,
    )
    .unwrap();

    contacts(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("5551234"))
        .stdout(predicate::str::contains("2 contact(s)"))
        .stderr(predicate::str::contains("skipped 1 record(s)"));

    contacts(&temp_dir)
        .args(["show", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5551234"));

    add(&temp_dir, "Carol", "333");

    assert_eq!(
        read_json(&contacts_file(&temp_dir)),
        serde_json::json!([
            {"name": "Alice", "phone": "111"},
            {"name": "Bob", "phone": 5551234},
            {"name": "Carol", "phone": "333"}
        ])
    );
}

#[test]
fn add_without_phone_writes_no_phone_key() {
    let temp_dir = TempDir::new().unwrap();

    contacts(&temp_dir)
        .args(["add", "--name", "Dana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added contact: Dana"));

    assert_eq!(
        read_json(&contacts_file(&temp_dir)),
        serde_json::json!([{"name": "Dana"}])
    );
}

#[test]
fn config_set_and_show() {
    let temp_dir = TempDir::new().unwrap();

    contacts(&temp_dir)
        .args(["config", "set", "contacts_file", "people.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set contacts_file = people.json"));

    contacts(&temp_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("people.json"));

    add(&temp_dir, "Alice", "111");
    assert!(temp_dir.path().join("data").join("people.json").exists());

    // Show reports the configuration the other commands run with
    let assert = contacts(&temp_dir)
        .env("CONTACTS_FILE", "override.json")
        .args(["config", "show", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let shown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["contacts_file"], "override.json");
    assert_eq!(
        shown["contacts_path"],
        temp_dir
            .path()
            .join("data")
            .join("override.json")
            .to_string_lossy()
            .as_ref()
    );

    contacts(&temp_dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
