use anyhow::Result;
use assert_cmd::Command;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::write_fleet;

fn run(data: &TempDir, path: &str) -> Result<std::process::Output> {
    let home = TempDir::new()?;
    let root = data.path().to_str().expect("temp paths are utf-8");
    Ok(Command::cargo_bin("logbrowser")?
        .env("LOGBROWSER_HOME", home.path())
        .args(["first-timestamp", "--root", root, path])
        .output()?)
}

#[test]
fn prints_start_of_session_and_file() -> Result<()> {
    let data = TempDir::new()?;
    write_fleet(data.path())?;

    let session = run(&data, "EEEE0001/00000002")?;
    assert!(session.status.success(), "{session:?}");
    assert_eq!(String::from_utf8(session.stdout)?, "2020-08-28T12:00:00Z\n");

    let file = run(&data, "/EEEE0001/00000001/00000003.MF4")?;
    assert!(file.status.success(), "{file:?}");
    assert_eq!(String::from_utf8(file.stdout)?, "2020-06-05T08:00:00Z\n");
    Ok(())
}

#[test]
fn device_root_prints_start_of_its_first_session() -> Result<()> {
    let data = TempDir::new()?;
    write_fleet(data.path())?;

    let output = run(&data, "EEEE0002")?;
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8(output.stdout)?, "2020-07-01T10:00:00Z\n");

    let output = run(&data, "EEEE0001")?;
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8(output.stdout)?, "2020-06-03T08:00:00Z\n");
    Ok(())
}

#[test]
fn directory_without_log_files_prints_nothing() -> Result<()> {
    let data = TempDir::new()?;
    write_fleet(data.path())?;
    std::fs::create_dir_all(data.path().join("EEEE0003/00000001"))?;

    let output = run(&data, "EEEE0003")?;
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8(output.stdout)?, "");
    Ok(())
}

#[test]
fn missing_path_fails() -> Result<()> {
    let data = TempDir::new()?;
    write_fleet(data.path())?;

    let output = run(&data, "EEEE0003")?;
    assert!(!output.status.success());
    Ok(())
}
