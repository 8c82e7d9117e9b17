//! `boostup install` end to end. Extraction shells out to `tar`, so these
//! only run on Unix hosts.
#![cfg(unix)]

use predicates::prelude::*;

use super::common::{ARCHIVE, ARCHIVE_BASE, TestEnv, VERSION};

#[test]
fn install_prints_outputs_and_cleans_up() {
  let mut env = TestEnv::new();
  let manifest = env.serve_manifest();
  let archive = env.serve_archive(1);
  let root = env.root_path();

  env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION, "--cache", "false"])
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("BOOST_ROOT={}", root.join("boost").display())))
    .stdout(predicate::str::contains(format!("BOOST_VER={}", ARCHIVE_BASE)));

  manifest.assert();
  archive.assert();
  assert!(root.join("boost/include/version.hpp").exists());
  assert!(!root.join(ARCHIVE).exists());
  assert!(!root.join(format!("{}.tar", ARCHIVE_BASE)).exists());
}

#[test]
fn legacy_mode_renames_extracted_folder() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();
  let archive = env.serve_archive(1);
  let root = env.root_path();

  env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION, "--cache", "false", "--mode", "legacy"])
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("BOOST_ROOT={}", root.join(ARCHIVE_BASE).display())))
    .stdout(predicate::str::contains(format!("BOOST_VER={}", ARCHIVE_BASE)));

  archive.assert();
  assert!(root.join(ARCHIVE_BASE).join("include/version.hpp").exists());
  assert!(!root.join("boost").exists());
}

#[test]
fn legacy_mode_warns_about_ignored_inputs() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();
  let _archive = env.serve_archive(1);

  env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION, "--cache", "false", "--mode", "legacy"])
    .args(["--link", "shared"])
    .assert()
    .success()
    .stderr(predicate::str::contains("not supported in legacy mode"));
}

#[test]
fn outputs_are_appended_to_github_output() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();
  let _archive = env.serve_archive(1);
  let root = env.root_path();
  let output_file = env.temp.path().join("github-output");
  std::fs::write(&output_file, "EARLIER=1\n").unwrap();

  env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION, "--cache", "false"])
    .env("GITHUB_OUTPUT", &output_file)
    .assert()
    .success()
    .stdout(predicate::str::contains("Outputs written to"))
    .stdout(predicate::str::contains("BOOST_ROOT=").not());

  let contents = std::fs::read_to_string(&output_file).unwrap();
  assert_eq!(
    contents,
    format!(
      "EARLIER=1\nBOOST_ROOT={}\nBOOST_VER={}\n",
      root.join("boost").display(),
      ARCHIVE_BASE
    )
  );
}

#[test]
fn second_install_is_restored_from_cache() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();
  let archive = env.serve_archive(1);
  let root = env.root_path();

  env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION])
    .assert()
    .success();

  std::fs::remove_dir_all(&root).unwrap();

  env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION])
    .assert()
    .success()
    .stdout(predicate::str::contains("Restored Boost from cache"))
    .stdout(predicate::str::contains(format!("BOOST_VER={}", ARCHIVE_BASE)));

  archive.assert();
  assert!(root.join("boost/include/version.hpp").exists());
}

#[test]
fn json_output_is_valid() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();
  let _archive = env.serve_archive(1);
  let root = env.root_path();

  let output = env
    .boostup_cmd()
    .args(["install", "--boost-version", VERSION, "--cache", "false", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["outputs"]["root"], root.join("boost").display().to_string());
  assert_eq!(json["outputs"]["version"], ARCHIVE_BASE);
  assert_eq!(json["source"]["source"], "download");
  assert_eq!(json["source"]["artifact"]["filename"], ARCHIVE);
}

#[test]
fn unknown_version_fails_without_download() {
  let mut env = TestEnv::new();
  let _manifest = env.serve_manifest();
  let archive = env.serve_archive(0);

  env
    .boostup_cmd()
    .args(["install", "--boost-version", "1.99.0", "--cache", "false"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not find boost version 1.99.0"));

  archive.assert();
  assert!(!env.root_path().exists());
}
