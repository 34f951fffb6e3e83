//! Golden fixture tests for mediatab-report.
//!
//! Fixtures are MediaInfo reports captured with `Complete=1` and
//! `Output=CSV`. The `.expected.json` files pin the key casing and the
//! duplicate handling for the whole report.

use mediatab_report::{structure, Info, ReportError};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(name: &str) -> String {
    let path = fixture_dir().join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

fn structure_fixture(name: &str) -> Info {
    structure(&load_fixture(name)).expect("fixture should structure")
}

#[test]
fn test_movie_complete_matches_golden() {
    let info = structure_fixture("movie_complete.csv");
    let expected: serde_json::Value =
        serde_json::from_str(&load_fixture("movie_complete.expected.json")).unwrap();

    let actual = serde_json::to_value(info.into_map()).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_movie_complete_sections() {
    let info = structure_fixture("movie_complete.csv");
    let names: Vec<&str> = info.sections().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Audio", "General", "Video"]);
}

#[test]
fn test_repeated_names_keep_raw_value() {
    // MediaInfo lists the raw value first and human-readable variants after.
    let info = structure_fixture("movie_complete.csv");
    assert_eq!(info.get("General", "File_Size"), Some("1048576"));
    assert_eq!(info.get("General", "Duration"), Some("10000"));
    assert_eq!(info.get("Video", "Width"), Some("1920"));
    assert_eq!(info.get("Audio", "Sampling_Rate"), Some("48000"));
}

#[test]
fn test_colliding_human_names_keep_first() {
    let info = structure_fixture("movie_complete.csv");
    // "Frame/Rate" and "Frame rate" both normalize to Frame_Rate.
    assert_eq!(info.get("Video", "Frame_Rate"), Some("29.970"));
    // "Format settings, CABAC" splits into "Format settings" and is discarded.
    assert_eq!(
        info.get("Video", "Format_Settings"),
        Some("CABAC / 4 Ref Frames")
    );
}

#[test]
fn test_extensions_only_first() {
    let info = structure_fixture("movie_complete.csv");
    assert_eq!(info.get("General", "Format_Extensions_Usually_Used"), Some("braw"));
    // Singular "extension" fields are not truncated.
    assert_eq!(info.get("General", "File_Name_Extension"), Some("movie.mp4"));
}

#[test]
fn test_numbered_streams() {
    let info = structure_fixture("multi_audio.csv");
    assert_eq!(info.len(), 3);
    assert_eq!(info.get("General", "Format_Extensions_Usually_Used"), Some("mkv"));
    assert_eq!(info.get("Audio #2", "Format"), Some("AC-3"));
    assert_eq!(info.get("Audio #2", "Channel(S)"), Some("6"));
}

#[test]
fn test_repeated_stream_header_starts_over() {
    let info = structure_fixture("multi_audio.csv");
    let first = info.section("Audio #1").unwrap();
    assert_eq!(first.get("Format"), Some("Opus"));
    assert_eq!(first.get("Channel(S)"), None);
    assert_eq!(first.get("Title"), Some("Commentary, director"));
    assert_eq!(first.len(), 2);
}

#[test]
fn test_truncated_report_keeps_complete_lines() {
    let report = load_fixture("movie_complete.csv");
    let cut = report.find("\nAudio\n").unwrap();
    let info = structure(&report[..cut]).unwrap();
    assert!(info.section("Audio").is_none());
    assert_eq!(info.get("Video", "Format"), Some("AVC"));
}

#[test]
fn test_report_with_leading_fields_drops_them() {
    let report = format!("Count,12\nFormat,Orphan\n{}", load_fixture("multi_audio.csv"));
    let info = structure(&report).unwrap();
    assert_eq!(info.len(), 3);
    assert_eq!(info.get("General", "Format"), Some("Matroska"));
}

#[test]
fn test_whitespace_report_is_empty() {
    assert_eq!(structure("\n\n   \n"), Err(ReportError::EmptyReport));
}

#[cfg(feature = "serde")]
#[test]
fn test_serialized_shape() {
    let info = structure("General\nComplete_name,movie.mp4\nExtensions,mp4 mov\nVideo\nFrame/Rate,29.970\n")
        .unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "General": {"Complete_Name": "movie.mp4", "Extensions": "mp4"},
            "Video": {"Frame_Rate": "29.970"}
        })
    );
}
