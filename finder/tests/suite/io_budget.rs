use anyhow::Result;
use logbrowser_finder::LogFileFinder;
use logbrowser_finder::TimeWindow;
use logbrowser_finder::fs::MemoryFileSystem;
use pretty_assertions::assert_eq;
use time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

use super::fixtures::mdf;
use super::fixtures::memory_fleet;
use super::fixtures::strings;

const SESSIONS: i64 = 64;
const FILES_PER_SESSION: i64 = 64;
const BASE: OffsetDateTime = datetime!(2022-03-01 00:00 UTC);

fn recorded_at(session: i64, file: i64) -> OffsetDateTime {
    BASE + Duration::minutes(session * FILES_PER_SESSION + file)
}

/// 4096 files, one per minute, in 64 sessions of 64 files.
fn large_device() -> MemoryFileSystem {
    let fs = MemoryFileSystem::new();
    for session in 0..SESSIONS {
        for file in 0..FILES_PER_SESSION {
            fs.add_file(
                format!("/BIG/{session:08}/{file:08}.MF4"),
                mdf(recorded_at(session, file)),
            );
        }
    }
    fs
}

#[test]
fn no_window_opens_no_files() -> Result<()> {
    let fs = memory_fleet();

    let found = LogFileFinder::new(&fs).find(&["EEEE0001", "EEEE0002"])?;
    assert_eq!(found.len(), 14);
    assert_eq!(fs.open_count(), 0);
    Ok(())
}

#[test]
fn window_search_opens_a_logarithmic_number_of_files() -> Result<()> {
    let fs = large_device();
    let lower = recorded_at(10, 20) + Duration::seconds(30);
    let upper = recorded_at(50, 40);

    let found = LogFileFinder::new(&fs)
        .window(TimeWindow::between(lower, upper))
        .find(&["BIG"])?;

    // Boundary margin keeps 00000020 of session 10; session 50 is cut after 00000040.
    assert_eq!(found.len(), 44 + 39 * 64 + 41);
    assert_eq!(
        found.first().map(|path| path.as_str()),
        Some("/BIG/00000010/00000020.MF4")
    );
    assert_eq!(
        found.last().map(|path| path.as_str()),
        Some("/BIG/00000050/00000040.MF4")
    );

    // Two searches over 64 sessions, then one over each boundary session.
    let opens = fs.open_count();
    assert!(opens <= 4 * 7, "opened {opens} files");
    Ok(())
}

#[test]
fn lower_bound_only_touches_the_first_boundary() -> Result<()> {
    let fs = large_device();

    let found = LogFileFinder::new(&fs)
        .window(TimeWindow::starting_at(recorded_at(63, 0)))
        .find(&["BIG"])?;

    // The margin pulls session 62 in as the first boundary, but every one of
    // its files precedes the bound, so only session 63 contributes.
    assert_eq!(found.len(), 64);
    assert!(found.iter().all(|path| path.as_str().starts_with("/BIG/00000063/")));
    assert!(fs.open_count() <= 2 * 7, "opened {} files", fs.open_count());
    Ok(())
}

#[test]
fn lower_bound_inside_the_last_session() -> Result<()> {
    let fs = large_device();

    let found = LogFileFinder::new(&fs)
        .window(TimeWindow::starting_at(recorded_at(63, 30)))
        .find(&["BIG"])?;

    // Files 30 onwards are in the window and the margin keeps 00000029.
    let expected: Vec<String> = (29..FILES_PER_SESSION)
        .map(|file| format!("/BIG/00000063/{file:08}.MF4"))
        .collect();
    assert_eq!(strings(found), expected);
    assert!(fs.open_count() <= 2 * 7, "opened {} files", fs.open_count());
    Ok(())
}
