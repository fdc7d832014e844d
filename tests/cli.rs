//! End-to-end tests for the `zipdir` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tempfile::tempdir;

fn sample_tree(root: &Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), b"hello").unwrap();
    fs::write(root.join("sub").join("b.txt"), b"world").unwrap();
    fs::write(root.join("sub").join("trace.log"), b"noise").unwrap();
}

#[test]
fn test_cli_compress_then_extract() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let root = tmp.path().join("root");
    sample_tree(&root);
    let archive = tmp.path().join("root.zip");
    let out = tmp.path().join("out");

    Command::cargo_bin("zipdir")?
        .arg("compress")
        .arg(&root)
        .arg(&archive)
        .arg("-r")
        .assert()
        .success()
        .stdout(predicate::str::contains("  adding: root/\n"))
        .stdout(predicate::str::contains("  adding: root/sub/b.txt\n"))
        .stdout(predicate::str::contains("created"));

    Command::cargo_bin("zipdir")?
        .arg("extract")
        .arg(&archive)
        .arg("-d")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("  extracting: root/a.txt\n"))
        .stdout(predicate::str::contains("  extracting: root/sub/\n"))
        .stdout(predicate::str::contains("2 directories"));

    assert_eq!(fs::read_to_string(out.join("root").join("a.txt"))?, "hello");
    assert_eq!(
        fs::read_to_string(out.join("root").join("sub").join("b.txt"))?,
        "world"
    );
    Ok(())
}

#[test]
fn test_cli_exclude_pattern() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let root = tmp.path().join("root");
    sample_tree(&root);
    let archive = tmp.path().join("root.zip");

    Command::cargo_bin("zipdir")?
        .arg("compress")
        .arg(&root)
        .arg(&archive)
        .arg("-q")
        .arg("-x")
        .arg("*.log")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("excluding"));

    Command::cargo_bin("zipdir")?
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("sub/b.txt"))
        .stdout(predicate::str::contains("trace.log").not());
    Ok(())
}

#[test]
fn test_cli_list_verbose() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let root = tmp.path().join("root");
    sample_tree(&root);
    let archive = tmp.path().join("root.zip");
    zipdir::compress(&root, &archive, false)?;

    Command::cargo_bin("zipdir")?
        .arg("list")
        .arg("-v")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Length"))
        .stdout(predicate::str::contains("3 files"));
    Ok(())
}

#[test]
fn test_cli_extract_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let root = tmp.path().join("root");
    sample_tree(&root);
    let archive = tmp.path().join("root.zip");
    zipdir::compress(&root, &archive, false)?;
    let out = tmp.path().join("out");

    Command::cargo_bin("zipdir")?
        .arg("extract")
        .arg("-")
        .arg("-d")
        .arg(&out)
        .arg("-q")
        .write_stdin(fs::read(&archive)?)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(out.join("a.txt"))?, "hello");
    Ok(())
}

#[test]
fn test_cli_rejects_escaping_entries_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let archive = tmp.path().join("evil.zip");
    {
        let mut zip = zipdir::ZipWriter::new(fs::File::create(&archive)?);
        zip.start_file("../evil.txt", UNIX_EPOCH)?;
        zip.write_all(b"gotcha")?;
        zip.finish()?;
    }
    let out = tmp.path().join("out");

    Command::cargo_bin("zipdir")?
        .arg("extract")
        .arg(&archive)
        .arg("-d")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("escapes the destination"));
    assert!(!tmp.path().join("evil.txt").exists());

    Command::cargo_bin("zipdir")?
        .arg("extract")
        .arg(&archive)
        .arg("-d")
        .arg(&out)
        .arg("--allow-unsafe-paths")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(tmp.path().join("evil.txt"))?, "gotcha");
    Ok(())
}

#[test]
fn test_cli_missing_source_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;

    Command::cargo_bin("zipdir")?
        .arg("compress")
        .arg(tmp.path().join("missing"))
        .arg(tmp.path().join("out.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to compress"));
    assert!(!tmp.path().join("out.zip").exists());
    Ok(())
}
