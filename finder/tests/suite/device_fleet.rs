use anyhow::Result;
use logbrowser_finder::ExtensionFilter;
use logbrowser_finder::FsPath;
use logbrowser_finder::LogFileFinder;
use logbrowser_finder::TimeWindow;
use logbrowser_finder::fs::MemoryFileSystem;
use logbrowser_finder::fs::NativeFileSystem;
use logbrowser_finder::fs::RelativeFileSystem;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tempfile::tempdir;
use time::OffsetDateTime;
use time::macros::datetime;

use super::fixtures::first_session;
use super::fixtures::later_sessions;
use super::fixtures::mdf;
use super::fixtures::strings;
use super::fixtures::write_fleet;

fn local_fleet() -> Result<(TempDir, RelativeFileSystem<NativeFileSystem>)> {
    let tmp = tempdir()?;
    write_fleet(tmp.path())?;
    let fs = RelativeFileSystem::local(tmp.path());
    Ok((tmp, fs))
}

fn find_in_window(window: TimeWindow) -> Result<Vec<String>> {
    let (_tmp, fs) = local_fleet()?;
    let found = LogFileFinder::new(&fs).window(window).find(&["EEEE0001"])?;
    Ok(strings(found))
}

fn concat(parts: [Vec<String>; 2]) -> Vec<String> {
    parts.into_iter().flatten().collect()
}

fn everything() -> Vec<String> {
    concat([first_session(1..=9), later_sessions(2..=5)])
}

#[test]
fn lists_every_log_file_without_window() -> Result<()> {
    assert_eq!(find_in_window(TimeWindow::unbounded())?, everything());
    Ok(())
}

#[test]
fn start_date_inside_first_session() -> Result<()> {
    let found = find_in_window(TimeWindow::starting_at(datetime!(2020-06-05 00:00 UTC)))?;

    assert_eq!(found, concat([first_session(3..=9), later_sessions(2..=5)]));
    Ok(())
}

#[test]
fn start_date_near_the_last_session() -> Result<()> {
    let found = find_in_window(TimeWindow::starting_at(datetime!(2021-05-12 00:00 UTC)))?;

    assert_eq!(found, later_sessions(4..=5));
    Ok(())
}

#[test]
fn stop_date_inside_first_session() -> Result<()> {
    let found = find_in_window(TimeWindow::ending_at(datetime!(2020-06-06 07:00 UTC)))?;

    assert_eq!(found, first_session(1..=6));
    Ok(())
}

#[test]
fn stop_date_inside_second_session() -> Result<()> {
    let found = find_in_window(TimeWindow::ending_at(datetime!(2020-08-29 07:00 UTC)))?;

    assert_eq!(found, concat([first_session(1..=9), later_sessions([2])]));
    Ok(())
}

#[test]
fn start_and_stop_inside_one_session() -> Result<()> {
    let found = find_in_window(TimeWindow::between(
        datetime!(2020-06-05 00:00 UTC),
        datetime!(2020-06-06 07:00 UTC),
    ))?;

    assert_eq!(found, first_session(3..=6));
    Ok(())
}

#[test]
fn start_and_stop_across_sessions() -> Result<()> {
    let found = find_in_window(TimeWindow::between(
        datetime!(2020-06-05 00:00 UTC),
        datetime!(2020-08-29 07:00 UTC),
    ))?;

    assert_eq!(found, concat([first_session(3..=9), later_sessions([2])]));
    Ok(())
}

#[test]
fn bounds_outside_the_data_clamp() -> Result<()> {
    let before_all: OffsetDateTime = datetime!(2020-01-05 00:00 UTC);
    let after_all: OffsetDateTime = datetime!(2022-01-05 00:00 UTC);

    assert_eq!(find_in_window(TimeWindow::starting_at(before_all))?, everything());
    assert_eq!(find_in_window(TimeWindow::ending_at(after_all))?, everything());
    assert_eq!(
        find_in_window(TimeWindow::between(before_all, after_all))?,
        everything()
    );
    Ok(())
}

#[test]
fn extension_filter_is_case_insensitive() -> Result<()> {
    let (_tmp, fs) = local_fleet()?;

    for extension in ["me", "ME"] {
        let found = LogFileFinder::new(&fs)
            .extensions(ExtensionFilter::new([extension])?)
            .find(&["EEEE0001"])?;
        assert_eq!(strings(found), vec!["/EEEE0001/00000001/ignore.me"], "{extension}");
    }

    let lower = LogFileFinder::new(&fs)
        .extensions(ExtensionFilter::new(["mf4"])?)
        .find(&["EEEE0001", "EEEE0002"])?;
    let upper = LogFileFinder::new(&fs)
        .extensions(ExtensionFilter::new(["MF4"])?)
        .find(&["EEEE0001", "EEEE0002"])?;
    assert_eq!(lower, upper);
    Ok(())
}

#[test]
fn missing_devices_contribute_nothing() -> Result<()> {
    let (_tmp, fs) = local_fleet()?;

    assert_eq!(LogFileFinder::new(&fs).find(&["FFFF0001"])?, Vec::<FsPath>::new());
    assert_eq!(
        strings(LogFileFinder::new(&fs).find(&["FFFF0001", "EEEE0002"])?),
        vec!["/EEEE0002/00000001/00000001.MF4"]
    );
    Ok(())
}

#[test]
fn merged_devices_equal_sorted_union() -> Result<()> {
    let (_tmp, fs) = local_fleet()?;
    let finder =
        LogFileFinder::new(&fs).window(TimeWindow::starting_at(datetime!(2020-06-05 00:00 UTC)));

    let merged = finder.find(&["EEEE0002", "EEEE0001"])?;
    let mut union = finder.find(&["EEEE0001"])?;
    union.extend(finder.find(&["EEEE0002"])?);
    union.sort();

    assert_eq!(merged, union);
    assert!(merged.contains(&FsPath::new("/EEEE0002/00000001/00000001.MF4")));
    Ok(())
}

#[test]
fn root_prefix_selects_the_device_parent() -> Result<()> {
    let tmp = tempdir()?;
    write_fleet(&tmp.path().join("LOG"))?;
    let fs = RelativeFileSystem::local(tmp.path());

    let found = LogFileFinder::new(&fs).root("/LOG").find(&["EEEE0002"])?;
    assert_eq!(strings(found), vec!["/LOG/EEEE0002/00000001/00000001.MF4"]);
    Ok(())
}

fn memory_device(files: &[(&str, OffsetDateTime)]) -> MemoryFileSystem {
    let fs = MemoryFileSystem::new();
    for (path, at) in files {
        fs.add_file(format!("/DEV/{path}"), mdf(*at));
    }
    fs
}

#[test]
fn start_date_inside_a_single_session_device() -> Result<()> {
    let fs = memory_device(&[
        ("00000001/00000001.MF4", datetime!(2021-01-01 00:00 UTC)),
        ("00000001/00000002.MF4", datetime!(2021-01-02 00:00 UTC)),
        ("00000001/00000003.MF4", datetime!(2021-01-03 00:00 UTC)),
    ]);

    let found = LogFileFinder::new(&fs)
        .window(TimeWindow::starting_at(datetime!(2021-01-02 12:00 UTC)))
        .find(&["DEV"])?;
    assert_eq!(
        strings(found),
        vec!["/DEV/00000001/00000002.MF4", "/DEV/00000001/00000003.MF4"]
    );
    Ok(())
}

#[test]
fn window_inside_the_last_session() -> Result<()> {
    let fs = memory_device(&[
        ("00000001/00000001.MF4", datetime!(2021-01-01 00:00 UTC)),
        ("00000002/00000001.MF4", datetime!(2021-02-01 00:00 UTC)),
        ("00000002/00000002.MF4", datetime!(2021-02-02 00:00 UTC)),
        ("00000002/00000003.MF4", datetime!(2021-02-03 00:00 UTC)),
    ]);

    let found = LogFileFinder::new(&fs)
        .window(TimeWindow::between(
            datetime!(2021-02-01 12:00 UTC),
            datetime!(2021-02-05 00:00 UTC),
        ))
        .find(&["DEV"])?;
    assert_eq!(
        strings(found),
        vec![
            "/DEV/00000002/00000001.MF4",
            "/DEV/00000002/00000002.MF4",
            "/DEV/00000002/00000003.MF4",
        ]
    );
    Ok(())
}
