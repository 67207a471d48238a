use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn roulette_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_decision-roulette").expect("decision-roulette test binary not built")
}

fn temp_store(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("roulette_cli_{tag}_{nanos}.json"))
}

#[test]
fn help_mentions_name() {
    let output = Command::new(roulette_bin())
        .arg("--help")
        .output()
        .expect("run --help");
    assert!(output.status.success());
    assert!(combined_output(&output).contains("Decision Roulette"));
}

#[test]
fn whoami_without_identity() {
    let output = Command::new(roulette_bin())
        .args(["--whoami"])
        .env_remove("DECISION_ROULETTE_USER")
        .output()
        .expect("run --whoami");
    assert!(output.status.success());
    assert!(combined_output(&output).contains("not signed in"));
}

#[test]
fn profile_update_requires_user() {
    let output = Command::new(roulette_bin())
        .args(["--set-username", "ada"])
        .env_remove("DECISION_ROULETTE_USER")
        .output()
        .expect("run --set-username");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--user"));
}

#[test]
fn profile_update_then_whoami_round_trips() {
    let store = temp_store("roundtrip");
    let store_arg = store.display().to_string();

    let output = Command::new(roulette_bin())
        .args([
            "--user",
            "u1",
            "--profile-store",
            &store_arg,
            "--set-username",
            "Ada_99",
            "--set-full-name",
            "Ada Lovelace",
        ])
        .output()
        .expect("run profile update");
    assert!(output.status.success(), "{}", combined_output(&output));

    let output = Command::new(roulette_bin())
        .args(["--user", "u1", "--profile-store", &store_arg, "--whoami"])
        .output()
        .expect("run --whoami");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("ada_99"), "{combined}");
    assert!(combined.contains("Ada Lovelace"), "{combined}");

    let _ = std::fs::remove_file(&store);
}

#[test]
fn duplicate_username_fails_with_conflict() {
    let store = temp_store("conflict");
    let store_arg = store.display().to_string();

    let output = Command::new(roulette_bin())
        .args([
            "--user",
            "u1",
            "--profile-store",
            &store_arg,
            "--set-username",
            "taken",
        ])
        .output()
        .expect("first update");
    assert!(output.status.success(), "{}", combined_output(&output));

    let output = Command::new(roulette_bin())
        .args([
            "--user",
            "u2",
            "--profile-store",
            &store_arg,
            "--set-username",
            "taken",
        ])
        .output()
        .expect("second update");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("already taken"));

    let _ = std::fs::remove_file(&store);
}
