use crate::import::plan::ResumePlan;
use crate::import::source::FileStat;
use crate::store::ImportProgress;
use chrono::{Duration, TimeZone, Utc};
use std::path::PathBuf;

fn stat(size: u64) -> FileStat {
    FileStat {
        size,
        mtime: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

fn progress(offset: u64, size: u64) -> ImportProgress {
    ImportProgress {
        file_path: PathBuf::from("/logs/access.log"),
        byte_offset: offset,
        file_size: size,
        file_mtime: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

#[test]
fn no_checkpoint_reads_from_start() {
    assert_eq!(ResumePlan::decide(None, &stat(100), false), ResumePlan::ReadFrom(0));
    assert_eq!(ResumePlan::decide(None, &stat(100), true), ResumePlan::ReadFrom(0));
}

#[test]
fn unchanged_plain_file_resumes_at_offset() {
    let p = progress(40, 100);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(100), false), ResumePlan::ReadFrom(40));
}

#[test]
fn fully_consumed_plain_file_is_skipped() {
    let p = progress(100, 100);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(100), false), ResumePlan::Skip);
}

#[test]
fn empty_plain_file_is_skipped_once_checkpointed() {
    let p = progress(0, 0);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(0), false), ResumePlan::Skip);
}

#[test]
fn changed_size_restarts_plain_file() {
    let p = progress(100, 100);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(60), false), ResumePlan::ReadFrom(0));
    assert_eq!(ResumePlan::decide(Some(&p), &stat(160), false), ResumePlan::ReadFrom(0));
}

#[test]
fn changed_mtime_restarts_plain_file() {
    let p = progress(40, 100);
    let touched = FileStat {
        mtime: stat(100).mtime + Duration::seconds(1),
        ..stat(100)
    };
    assert_eq!(ResumePlan::decide(Some(&p), &touched, false), ResumePlan::ReadFrom(0));
}

#[test]
fn fully_consumed_gzip_is_skipped() {
    let p = progress(512, 512);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(512), true), ResumePlan::Skip);
}

#[test]
fn partially_consumed_gzip_is_reread_from_start() {
    let p = progress(200, 512);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(512), true), ResumePlan::ReadFrom(0));
}

#[test]
fn replaced_gzip_is_reread_from_start() {
    let p = progress(512, 512);
    assert_eq!(ResumePlan::decide(Some(&p), &stat(600), true), ResumePlan::ReadFrom(0));
}
