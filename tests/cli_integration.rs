//! CLI integration tests for Capstan.
//!
//! These tests drive the binary through override-only paths so they do
//! not depend on the machine's real toolchain.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// The override names the binary reads from its environment.
const OVERRIDE_VARS: &[&str] = &[
    "CAPSTAN_NETWORK",
    "CAPSTAN_COMM",
    "CAPSTAN_COMM_SUBSTRATE",
    "CAPSTAN_NETWORK_ATOMICS",
    "CAPSTAN_ATOMICS",
    "CAPSTAN_TARGET_RPMALLOC",
    "CAPSTAN_TARGET_MEM",
    "CAPSTAN_HOST_MEM",
    "CAPSTAN_TARGET_PLATFORM",
    "CAPSTAN_HOST_PLATFORM",
    "CAPSTAN_TARGET_COMPILER",
    "CAPSTAN_HOST_COMPILER",
];

/// Get the capstan binary with a scrubbed override environment and a
/// temp working directory (so no project config leaks in).
fn capstan(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("capstan").unwrap();
    cmd.current_dir(cwd.path());
    for var in OVERRIDE_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// capstan print
// ============================================================================

#[test]
fn test_print_writes_token_and_newline() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["print", "network"])
        .env("CAPSTAN_NETWORK", "slingshot")
        .assert()
        .success()
        .stdout("slingshot\n");
}

#[test]
fn test_print_comm_follows_network_override() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["print", "comm"])
        .env("CAPSTAN_NETWORK", "infiniband")
        .assert()
        .success()
        .stdout("gasnet\n");
}

#[test]
fn test_print_invalid_network_override_fails() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["print", "network"])
        .env("CAPSTAN_NETWORK", "token-ring")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be one of"))
        .stderr(predicate::str::contains("token-ring"));
}

#[test]
fn test_print_network_atomics_gasnet_fails_distinctly() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["print", "atomics", "--network"])
        .env("CAPSTAN_NETWORK_ATOMICS", "gasnet")
        .env("CAPSTAN_NETWORK", "none")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "CAPSTAN_NETWORK_ATOMICS=gasnet is not supported",
        ));
}

#[test]
fn test_print_rpmalloc_host_fails() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["print", "rpmalloc", "--host"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "not yet supported for host builds",
        ));
}

#[test]
fn test_print_user_intrinsics_warns_on_stderr() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["print", "atomics"])
        .env("CAPSTAN_ATOMICS", "intrinsics")
        .env("CAPSTAN_TARGET_PLATFORM", "linux64")
        .assert()
        .success()
        .stdout("intrinsics\n")
        .stderr(predicate::str::contains("known performance issue"));
}

// ============================================================================
// capstan env
// ============================================================================

#[test]
fn test_env_prints_all_variables_with_markers() {
    let tmp = temp_dir();
    capstan(&tmp)
        .args(["env"])
        .env("CAPSTAN_NETWORK", "none")
        .env("CAPSTAN_ATOMICS", "cstdlib")
        .assert()
        .success()
        .stdout(predicate::str::contains("CAPSTAN_NETWORK: none *"))
        .stdout(predicate::str::contains("CAPSTAN_COMM: none"))
        .stdout(predicate::str::contains("CAPSTAN_COMM_SUBSTRATE: none"))
        .stdout(predicate::str::contains("CAPSTAN_ATOMICS: cstdlib *"))
        .stdout(predicate::str::contains("CAPSTAN_NETWORK_ATOMICS: none"))
        .stdout(predicate::str::contains("CAPSTAN_TARGET_MEM: jemalloc"))
        .stdout(predicate::str::contains("CAPSTAN_TARGET_RPMALLOC: none"));
}

// ============================================================================
// project config
// ============================================================================

#[test]
fn test_project_config_supplies_overrides() {
    let tmp = temp_dir();
    let config_dir = tmp.path().join(".capstan");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[env]\nCAPSTAN_NETWORK = \"efa\"\n",
    )
    .unwrap();

    capstan(&tmp)
        .args(["print", "network"])
        .assert()
        .success()
        .stdout("efa\n");
}

#[test]
fn test_process_env_beats_project_config() {
    let tmp = temp_dir();
    let config_dir = tmp.path().join(".capstan");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[env]\nCAPSTAN_NETWORK = \"efa\"\n",
    )
    .unwrap();

    capstan(&tmp)
        .args(["print", "network"])
        .env("CAPSTAN_NETWORK", "aries")
        .assert()
        .success()
        .stdout("aries\n");
}
