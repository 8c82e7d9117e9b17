use predicates::prelude::*;

use super::common::{ARCHIVE, MANIFEST_PATH, TestEnv, VERSION};

#[test]
fn resolve_prints_the_chosen_archive() {
  let mut env = TestEnv::new();
  let manifest = env.serve_manifest();

  env
    .boostup_cmd()
    .args(["resolve", "--boost-version", VERSION])
    .assert()
    .success()
    .stdout(predicate::str::contains(ARCHIVE))
    .stdout(predicate::str::contains(env.archive_url()));

  manifest.assert();
  assert!(!env.root_path().exists());
}

#[test]
fn resolve_with_shared_link_picks_the_shared_archive() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();

  env
    .boostup_cmd()
    .args(["resolve", "--boost-version", VERSION, "--link", "shared"])
    .assert()
    .success()
    .stdout(predicate::str::contains("boost-1.74.0-test-shared.tar.gz"));
}

#[test]
fn resolve_json_reports_notices() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();

  let output = env
    .boostup_cmd()
    .args(["resolve", "--boost-version", VERSION, "--arch", "x86", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["filename"], ARCHIVE);
  let notices = json["notices"].as_array().unwrap();
  assert_eq!(notices.len(), 1);
  assert!(notices[0].as_str().unwrap().contains("the option had no effect"));
}

#[test]
fn resolve_with_unmatched_platform_version_fails() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();

  env
    .boostup_cmd()
    .args(["resolve", "--boost-version", VERSION, "--platform-version", "1999"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not find boost version 1.74.0"));
}

#[test]
fn manifest_http_error_is_fatal() {
  let mut env = TestEnv::new();
  let _manifest = env.server.mock("GET", MANIFEST_PATH).with_status(500).create();

  env
    .boostup_cmd()
    .args(["resolve", "--boost-version", VERSION])
    .assert()
    .failure()
    .stderr(predicate::str::contains("HTTP 500"));
}

#[test]
fn malformed_manifest_is_fatal() {
  let mut env = TestEnv::new();
  let _manifest = env
    .server
    .mock("GET", MANIFEST_PATH)
    .with_status(200)
    .with_body("{not json")
    .create();

  env
    .boostup_cmd()
    .args(["resolve", "--boost-version", VERSION])
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed manifest"));
}
