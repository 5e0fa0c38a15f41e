
use fixtures::*;

use assert_cmd::prelude::*;
use oval_syschar::{ParserSettings, SysCharDocument};
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::process::Command;
use tempfile::tempdir;

#[test]
fn it_respects_directory_output() {
    let d = tempdir().unwrap();
    let f = d.as_ref().join("test.out");

    let sample = unix_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args(["-f", &f.to_string_lossy(), sample.to_str().unwrap()]);

    assert!(
        cmd.output().unwrap().stdout.is_empty(),
        "Expected output to be printed to file, but was printed to stdout"
    );

    let mut expected = vec![];

    File::open(&f).unwrap().read_to_end(&mut expected).unwrap();
    assert!(
        !expected.is_empty(),
        "Expected output to be printed to file"
    )
}

#[test]
fn test_it_refuses_to_overwrite_directory() {
    let d = tempdir().unwrap();

    let sample = unix_sample();
    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args(["-f", &d.path().to_string_lossy(), sample.to_str().unwrap()]);

    cmd.assert().failure().code(1);
}

#[test]
fn test_it_overwrites_file_anyways_if_passed_flag() {
    let d = tempdir().unwrap();
    let f = d.as_ref().join("test.out");

    let mut file = File::create(&f).unwrap();
    file.write_all(b"I'm a file!").unwrap();

    let sample = unix_sample();
    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args([
        "-f",
        &f.to_string_lossy(),
        "--no-confirm-overwrite",
        sample.to_str().unwrap(),
    ]);

    cmd.assert().success();

    let written = fs::read_to_string(&f).unwrap();
    assert!(written.starts_with("<?xml"), "{}", written);
}

#[test]
fn it_supports_stdin_input_with_dash() {
    let xml = fs::read_to_string(windows_sample()).unwrap();

    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args(["-o", "json", "-"]).write_stdin(xml);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""subtype": "windows:registry""#));
}

#[test]
fn test_xml_output_matches_library_rendering() {
    let sample = unix_sample();

    let output = Command::new(assert_cmd::cargo_bin!("syschar_dump"))
        .args(["--no-indent", sample.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings = ParserSettings::new().indent(false);
    let document = SysCharDocument::from_path(&sample, &settings).unwrap();
    let expected = SysCharDocument::to_xml(&document.model, &settings).unwrap();

    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn test_text_output_hides_masked_values() {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args(["-o", "text", unix_sample().to_str().unwrap()]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SYSDATA[1].ID            = item1"))
        .stdout(predicate::str::contains("root:$6$").not());
}

#[test]
fn test_validate_fails_on_invalid_items() {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args([
        "--validate",
        sample_with_invalid_items().to_str().unwrap(),
    ]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("1 of 2 items are invalid: 1"));
}

#[test]
fn test_validate_passes_on_valid_sample() {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.args(["--validate", windows_sample().to_str().unwrap()]);

    cmd.assert().success();
}

#[test]
fn test_foreign_document_fails() {
    let d = tempdir().unwrap();
    let f = d.as_ref().join("other.xml");
    fs::write(&f, "<html><body/></html>").unwrap();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("syschar_dump"));
    cmd.arg(f.to_str().unwrap());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("oval_system_characteristics"));
}
