use anyhow::Result;
use logbrowser_finder::DecodeError;
use logbrowser_finder::FinderError;
use logbrowser_finder::FsPath;
use logbrowser_finder::LogFileFinder;
use logbrowser_finder::TimeWindow;
use logbrowser_finder::fs::FileHandle;
use pretty_assertions::assert_eq;
use time::OffsetDateTime;
use time::macros::datetime;

use super::fixtures::memory_fleet;

const FIRST_FILE: &str = "/EEEE0001/00000001/00000001.MF4";

#[test]
fn corrupt_probed_file_fails_the_whole_request() -> Result<()> {
    let fs = memory_fleet();
    fs.add_file(FIRST_FILE, b"truncated".to_vec());

    let err = LogFileFinder::new(&fs)
        .window(TimeWindow::starting_at(datetime!(2020-06-05 00:00 UTC)))
        .find(&["EEEE0002", "EEEE0001"])
        .unwrap_err();

    match err {
        FinderError::Decode { path, .. } => assert_eq!(path, FsPath::new(FIRST_FILE)),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn corrupt_file_is_harmless_without_window() -> Result<()> {
    let fs = memory_fleet();
    fs.add_file(FIRST_FILE, b"truncated".to_vec());

    let found = LogFileFinder::new(&fs).find(&["EEEE0001"])?;
    assert_eq!(found.len(), 13);
    Ok(())
}

#[test]
fn custom_decoder_errors_propagate() -> Result<()> {
    let fs = memory_fleet();
    let refuse = |_: &mut dyn FileHandle| -> Result<OffsetDateTime, DecodeError> {
        Err(DecodeError::Malformed("no measurements".to_string()))
    };

    let err = LogFileFinder::new(&fs)
        .decoder(refuse)
        .window(TimeWindow::ending_at(datetime!(2021-01-01 00:00 UTC)))
        .find(&["EEEE0002"])
        .unwrap_err();

    assert!(
        matches!(err, FinderError::Decode { source: DecodeError::Malformed(_), .. }),
        "unexpected error: {err}"
    );
    Ok(())
}

#[test]
fn invalid_device_lists_are_rejected_before_io() {
    let fs = memory_fleet();
    let finder = LogFileFinder::new(&fs);

    let none: [String; 0] = [];
    for err in [
        finder.find(&none).unwrap_err(),
        finder.find(&["EEEE0001", ""]).unwrap_err(),
        finder.find(&["../EEEE0001"]).unwrap_err(),
        finder.find(&["EEEE0001/00000001"]).unwrap_err(),
    ] {
        assert!(matches!(err, FinderError::InvalidArgument(_)), "unexpected error: {err}");
    }
    assert_eq!(fs.listing_count(), 0);
    assert_eq!(fs.open_count(), 0);
}

#[test]
fn first_timestamp_of_device_session_and_missing_path() -> Result<()> {
    let fs = memory_fleet();
    let finder = LogFileFinder::new(&fs);

    assert_eq!(
        finder.first_timestamp(&FsPath::new("/EEEE0001/00000002"))?,
        Some(datetime!(2020-08-28 12:00 UTC))
    );
    assert_eq!(
        finder.first_timestamp(&FsPath::new("/EEEE0001"))?,
        Some(datetime!(2020-06-03 08:00 UTC))
    );
    assert_eq!(
        finder.first_timestamp(&FsPath::new("/EEEE0002"))?,
        Some(datetime!(2020-07-01 10:00 UTC))
    );
    assert!(
        finder
            .first_timestamp(&FsPath::new("/EEEE0003"))
            .unwrap_err()
            .is_not_found()
    );
    Ok(())
}
