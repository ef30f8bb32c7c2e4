#[test]
fn check_filegen_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("filegen").unwrap();
    cmd.arg("--help").assert();
}

#[test]
fn check_rsift_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("rsift").unwrap();
    cmd.arg("--help").assert();
}

// generate a tree with filegen, harvest it with rsift
#[test]
fn filegen_output_feeds_rsift() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dest = tmp_dir.path().join("dest");

    assert_cmd::Command::cargo_bin("filegen")
        .unwrap()
        .arg(tmp_dir.path())
        .args(["2,2", "1", "1KiB"])
        .assert()
        .success();

    assert_cmd::Command::cargo_bin("rsift")
        .unwrap()
        .args(["false", ".txt"])
        .arg(tmp_dir.path().join("filegen"))
        .arg(&dest)
        .args(["2", "2"])
        .assert()
        .success();

    // 1 file per directory: filegen root, 2 children, 4 grandchildren; the
    // shared destination flattens same-named files onto one another
    let copied = std::fs::read_dir(&dest).unwrap().count();
    assert_eq!(copied, 1);
    assert_eq!(
        std::fs::metadata(dest.join("file0.txt")).unwrap().len(),
        1024
    );
}
