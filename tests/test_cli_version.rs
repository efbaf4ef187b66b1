use predicates::prelude::*;

#[test]
fn test_version_prints_semantic_version() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("omada-monitor");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"omada-monitor \d+\.\d+\.\d+").unwrap());
}

#[test]
fn test_version_includes_build_commit() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("omada-monitor");
    cmd.arg("-V");

    // "omada-monitor 1.0.0 (abc1234)", or "(unknown)" outside a git checkout
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"omada-monitor \S+ \([0-9a-z]+\)").unwrap());
}
