use std::fs;

use cctv_core::StreamEntry;
use cctv_engine::{
    debug_artifact_name, dump_debug_body, write_atomically, write_stream_file, FixedClock, Clock,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn at() -> chrono::DateTime<chrono::FixedOffset> {
    FixedClock::shanghai(2024, 3, 9, 6, 5, 4).unwrap().now()
}

fn entries() -> Vec<StreamEntry> {
    vec![
        StreamEntry::new("CCTV-1 综合", "http://example.com/cctv1.m3u8"),
        StreamEntry::new("CCTV-5 体育", "http://example.com/cctv5.flv"),
    ]
}

#[test]
fn writes_header_and_entries() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("CCTV.txt");

    let summary = write_stream_file(&path, &entries(), &at(), "CCTV").unwrap();
    assert_eq!(summary.entry_count, 2);
    assert!(!summary.placeholder);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("# 抓取时间: 2024-03-09 06:05:04\n# 共找到 2 个CCTV直播源\n"));
    assert!(text.ends_with("CCTV-5 体育,http://example.com/cctv5.flv\n"));
}

#[test]
fn empty_result_writes_placeholder_instead_of_failing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("CCTV.txt");

    let summary = write_stream_file(&path, &[], &at(), "CCTV").unwrap();
    assert!(summary.placeholder);

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.is_empty());
    assert_eq!(text, "# 未找到CCTV直播源 (2024-03-09 06:05:04)\n");
}

#[test]
fn rewriting_same_entries_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("CCTV.txt");

    write_stream_file(&path, &entries(), &at(), "CCTV").unwrap();
    let first = fs::read(&path).unwrap();
    write_stream_file(&path, &entries(), &at(), "CCTV").unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn written_file_round_trips_by_comma_split() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("CCTV.txt");
    write_stream_file(&path, &entries(), &at(), "CCTV").unwrap();

    let recovered: Vec<StreamEntry> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(','))
        .map(|(channel, url)| StreamEntry::new(channel, url))
        .collect();
    assert_eq!(recovered, entries());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out.txt");

    write_atomically(&path, "hello").unwrap();
    write_atomically(&path, "world").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "world");
}

#[test]
fn atomic_write_creates_missing_parent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("out.txt");
    write_atomically(&path, "x").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "x");
}

#[test]
fn no_partial_file_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_stream_file(&blocker.join("CCTV.txt"), &entries(), &at(), "CCTV");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn debug_artifact_is_timestamp_named() {
    assert_eq!(debug_artifact_name(&at()), "debug_20240309_060504.html");

    let temp = TempDir::new().unwrap();
    let path = dump_debug_body(temp.path(), &at(), "<html>raw</html>").unwrap();
    assert_eq!(path.file_name().unwrap(), "debug_20240309_060504.html");
    assert_eq!(fs::read_to_string(path).unwrap(), "<html>raw</html>");
}

#[test]
fn debug_artifact_failure_is_swallowed() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("file");
    fs::write(&blocker, "x").unwrap();
    assert!(dump_debug_body(&blocker, &at(), "body").is_none());
}
