//! # mediatab-report
//!
//! Turns the textual report MediaInfo produces with `Complete=1` and
//! `Output=CSV` into a normalized section/field map.
//!
//! The report is line oriented. A line without a delimiter names a section
//! (`General`, `Video`, `Audio #2`); every other line is a `name,value` pair
//! belonging to the last named section.
//!
//! - Field names are normalized (`Frame/Rate` becomes `Frame_Rate`), see
//!   [`normalize_key`].
//! - Values are split from names at the first delimiter only, so values may
//!   contain commas.
//! - The first value for a name within a section wins.
//! - A repeated section header starts that section over.
//! - `*Extensions*` fields keep only their first extension.
//!
//! ## Quick Start
//!
//! ```
//! use mediatab_report::structure;
//!
//! let report = "General\nComplete_name,movie.mp4\nExtensions,mp4 mov\nVideo\nFrame/Rate,29.970\n";
//! let info = structure(report).unwrap();
//!
//! assert_eq!(info.get("General", "Complete_Name"), Some("movie.mp4"));
//! assert_eq!(info.get("General", "Extensions"), Some("mp4"));
//! assert_eq!(info.get("Video", "Frame_Rate"), Some("29.970"));
//! ```
//!
//! ## Configurable Structuring
//!
//! ```
//! use mediatab_report::Structurer;
//! use mediatab_report::config::{OrphanPolicy, StructurerConfig};
//!
//! let config = StructurerConfig::builder()
//!     .orphan_policy(OrphanPolicy::collect())
//!     .build();
//!
//! let info = Structurer::new(config).structure("Format,AVC\n").unwrap();
//! assert_eq!(info.get("Unknown", "Format"), Some("AVC"));
//! ```

pub mod config;
mod error;
mod key;
mod model;
mod structurer;

pub use config::{OrphanPolicy, StructurerConfig};
pub use error::ReportError;
pub use key::normalize_key;
pub use model::{Info, Section};

/// Structure a report using default settings.
///
/// Field lines that appear before any section header are dropped.
///
/// # Errors
///
/// Returns [`ReportError::EmptyReport`] when the report is empty or
/// whitespace only.
pub fn structure(report: &str) -> Result<Info, ReportError> {
    Structurer::default().structure(report)
}

/// A configurable report structurer.
///
/// Holds no state between calls; one instance can be shared freely across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Structurer {
    config: StructurerConfig,
}

impl Structurer {
    /// Create a new structurer with the given configuration.
    pub fn new(config: StructurerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &StructurerConfig {
        &self.config
    }

    /// Structure a report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::EmptyReport`] when the report is empty or
    /// whitespace only.
    pub fn structure(&self, report: &str) -> Result<Info, ReportError> {
        structurer::structure_with_config(report, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_example() {
        let report = "General\nComplete_name,movie.mp4\nExtensions,mp4 mov\nVideo\nFrame/Rate,29.970\n";
        let info = structure(report).unwrap();

        assert_eq!(info.len(), 2);
        assert_eq!(info.get("General", "Complete_Name"), Some("movie.mp4"));
        assert_eq!(info.get("General", "Extensions"), Some("mp4"));
        assert_eq!(info.get("Video", "Frame_Rate"), Some("29.970"));
        assert_eq!(info.section("General").map(Section::len), Some(2));
        assert_eq!(info.section("Video").map(Section::len), Some(1));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(structure(""), Err(ReportError::EmptyReport));
        assert_eq!(structure("  \n\t\n"), Err(ReportError::EmptyReport));
    }

    #[test]
    fn test_first_write_wins() {
        let info = structure("Audio\nFormat,AAC\nFormat,AC-3\n").unwrap();
        assert_eq!(info.get("Audio", "Format"), Some("AAC"));
    }

    #[test]
    fn test_collision_after_normalization() {
        let info = structure("Video\nFrame rate,25.000\nFrame/rate,29.970\n").unwrap();
        assert_eq!(info.get("Video", "Frame_Rate"), Some("25.000"));
        assert_eq!(info.section("Video").map(Section::len), Some(1));
    }

    #[test]
    fn test_repeated_header_resets_section() {
        let info = structure("Video\nWidth,1920\nVideo\nHeight,1080\n").unwrap();
        let video = info.section("Video").unwrap();
        assert_eq!(video.get("Width"), None);
        assert_eq!(video.get("Height"), Some("1080"));
    }

    #[test]
    fn test_value_keeps_delimiters() {
        let info = structure("General\nTitle,Part One, The Beginning\n").unwrap();
        assert_eq!(info.get("General", "Title"), Some("Part One, The Beginning"));
    }

    #[test]
    fn test_extensions_first_token() {
        let info = structure("General\nExtensions,mp4 mov m4v\n").unwrap();
        assert_eq!(info.get("General", "Extensions"), Some("mp4"));
    }

    #[test]
    fn test_orphan_lines_dropped_by_default() {
        let info = structure("Format,AVC\nGeneral\nFormat,MPEG-4\n").unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("General", "Format"), Some("MPEG-4"));
    }

    #[test]
    fn test_orphan_lines_only() {
        let info = structure("Format,AVC\n").unwrap();
        assert!(info.is_empty());
    }

    #[test]
    fn test_orphan_lines_collected() {
        let structurer = Structurer::new(
            StructurerConfig::builder()
                .orphan_policy(OrphanPolicy::Collect {
                    section: "Preamble".to_string(),
                })
                .build(),
        );
        let info = structurer
            .structure("Format,AVC\nFormat,HEVC\nGeneral\nFormat,MPEG-4\n")
            .unwrap();
        assert_eq!(info.get("Preamble", "Format"), Some("AVC"));
        assert_eq!(info.get("General", "Format"), Some("MPEG-4"));
    }

    #[test]
    fn test_blank_line_ends_current_section() {
        let report = "General\nFormat,Matroska\n\nFile size,1.2 GiB\nVideo\nWidth,1920\n";

        let info = structure(report).unwrap();
        assert_eq!(info.len(), 2);
        assert_eq!(info.get("General", "Format"), Some("Matroska"));
        assert_eq!(info.get("General", "File_Size"), None);
        assert_eq!(info.get("Video", "Width"), Some("1920"));

        let structurer = Structurer::new(
            StructurerConfig::builder()
                .orphan_policy(OrphanPolicy::collect())
                .build(),
        );
        let info = structurer.structure(report).unwrap();
        assert_eq!(info.get("Unknown", "File_Size"), Some("1.2 GiB"));
        assert_eq!(info.get("General", "File_Size"), None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let info = structure("General\r\nFormat,MPEG-4\r\nVideo\r\nWidth,1920\r\n").unwrap();
        assert_eq!(info.get("General", "Format"), Some("MPEG-4"));
        assert_eq!(info.get("Video", "Width"), Some("1920"));
    }

    #[test]
    fn test_empty_section_is_kept() {
        let info = structure("General\nMenu\n").unwrap();
        assert_eq!(info.len(), 2);
        assert!(info.section("Menu").is_some_and(Section::is_empty));
    }

    #[test]
    fn test_custom_delimiter() {
        let structurer = Structurer::new(StructurerConfig::builder().delimiter(';').build());
        let info = structurer.structure("General\nTitle;A, B\n").unwrap();
        assert_eq!(info.get("General", "Title"), Some("A, B"));
    }
}
