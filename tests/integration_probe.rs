//! Probe integration tests
//!
//! Drive [`Prober`] through the in-memory fixture backend.

use mediatab::config::{Config, OrphanLines};
use mediatab::probe::Prober;
use mediatab_source::testing::FixtureBackend;
use mediatab_source::StreamKind;
use std::path::Path;

const REPORT: &str = "\
Width,1920
General
Complete name,/test/movie.mkv
Format,Matroska
Format/Extensions usually used,mkv mk3d mka mks

Video
Format,HEVC
Width,3 840 pixels
Frame/Rate,23.976

Audio #1
Language,en
Audio #2
Language,ja
";

fn prober(backend: &FixtureBackend, config: &Config) -> Prober {
    Prober::with_backend(Box::new(backend.clone()), config)
}

#[test]
fn test_info_from_path() {
    let backend = FixtureBackend::new(REPORT);
    let info = prober(&backend, &Config::default())
        .info(Path::new("/test/movie.mkv"), 0, false)
        .unwrap();

    assert_eq!(info.len(), 4);
    assert_eq!(info.get("General", "Format_Extensions_Usually_Used"), Some("mkv"));
    assert_eq!(info.get("Video", "Width"), Some("3 840 pixels"));
    assert_eq!(info.get("Audio #2", "Language"), Some("ja"));

    let journal = backend.journal();
    assert_eq!(journal.opened, 1);
    assert_eq!(journal.closed, 1);
    assert!(journal.fed.is_empty());
}

#[test]
fn test_info_buffered_streams_file() {
    let dir = tempfile::tempdir().unwrap();
    let media = dir.path().join("movie.mkv");
    let payload: Vec<u8> = (0..100u8).collect();
    std::fs::write(&media, &payload).unwrap();

    let mut config = Config::default();
    config.source.chunk_size = 32;

    let backend = FixtureBackend::new(REPORT);
    let info = prober(&backend, &config).info(&media, 0, true).unwrap();
    assert_eq!(info.get("Video", "Format"), Some("HEVC"));

    let journal = backend.journal();
    assert_eq!(journal.buffer_size, Some(100));
    assert_eq!(journal.feeds, 4);
    assert_eq!(journal.fed, payload);
    assert!(journal.finished);
    assert_eq!(journal.closed, 1);
}

#[test]
fn test_info_buffered_missing_file() {
    let backend = FixtureBackend::new(REPORT);
    let err = prober(&backend, &Config::default())
        .info(Path::new("/nonexistent/movie.mkv"), 0, true)
        .unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
    assert_eq!(backend.journal().opened, 0);
}

#[test]
fn test_info_orphan_policy_from_config() {
    let mut config = Config::default();
    config.report.orphan_lines = OrphanLines::Collect;
    config.report.orphan_section = "Preamble".to_string();

    let backend = FixtureBackend::new(REPORT);
    let info = prober(&backend, &config)
        .info(Path::new("/test/movie.mkv"), 0, false)
        .unwrap();
    assert_eq!(info.get("Preamble", "Width"), Some("1920"));

    let dropped = prober(&backend, &Config::default())
        .info(Path::new("/test/movie.mkv"), 0, false)
        .unwrap();
    assert!(dropped.section("Preamble").is_none());
}

#[test]
fn test_info_empty_report_closes_handle() {
    let backend = FixtureBackend::new("");
    let err = prober(&backend, &Config::default())
        .info(Path::new("/test/movie.mkv"), 0, false)
        .unwrap_err();

    assert!(err.to_string().contains("Failed to read report"));
    assert!(matches!(
        err.root_cause().downcast_ref::<mediatab_source::Error>(),
        Some(mediatab_source::Error::EmptyReport)
    ));
    assert_eq!(backend.journal().closed, 1);
}

#[test]
fn test_info_cannot_open() {
    let backend = FixtureBackend::new(REPORT).with_unreadable("/test/locked.mkv");
    let err = prober(&backend, &Config::default())
        .info(Path::new("/test/locked.mkv"), 0, false)
        .unwrap_err();
    assert!(err.to_string().contains("cannot open"));
}

#[test]
fn test_get_field() {
    let backend =
        FixtureBackend::new(REPORT).with_field(StreamKind::Audio, 1, "Language", "ja");
    let prober = prober(&backend, &Config::default());

    assert_eq!(
        prober
            .get(Path::new("/test/movie.mkv"), "Language", StreamKind::Audio, 1)
            .unwrap(),
        "ja"
    );

    let err = prober
        .get(Path::new("/test/movie.mkv"), "Language", StreamKind::Audio, 0)
        .unwrap_err();
    assert_eq!(err.to_string(), "no value for Language in Audio stream 0");
    assert_eq!(backend.journal().closed, 2);
}

#[test]
fn test_backend_name() {
    let backend = FixtureBackend::new(REPORT);
    assert_eq!(prober(&backend, &Config::default()).backend_name(), "fixture");
}
