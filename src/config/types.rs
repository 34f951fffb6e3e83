use mediatab_report::config::{OrphanPolicy, StructurerConfig, DEFAULT_ORPHAN_SECTION};
use mediatab_source::{BackendKind, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Where reports come from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Engine implementation: auto, tool or native
    #[serde(default)]
    pub backend: BackendKind,

    /// Path to the mediainfo program (PATH lookup when unset)
    #[serde(default)]
    pub tool_path: Option<PathBuf>,

    /// Bytes per chunk when streaming input to the engine
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            tool_path: None,
            chunk_size: default_chunk_size(),
        }
    }
}

/// Field lines seen before the first section header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanLines {
    #[default]
    Drop,
    Collect,
}

/// How reports are structured.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub orphan_lines: OrphanLines,

    /// Section that collects orphan lines (only with `orphan_lines = "collect"`)
    #[serde(default = "default_orphan_section")]
    pub orphan_section: String,

    /// Name/value separator of the report
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_orphan_section() -> String {
    DEFAULT_ORPHAN_SECTION.to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            orphan_lines: OrphanLines::default(),
            orphan_section: default_orphan_section(),
            delimiter: default_delimiter(),
        }
    }
}

impl ReportConfig {
    /// Settings for the report structurer.
    pub fn structurer_config(&self) -> StructurerConfig {
        let orphan_policy = match self.orphan_lines {
            OrphanLines::Drop => OrphanPolicy::Drop,
            OrphanLines::Collect => OrphanPolicy::Collect {
                section: self.orphan_section.clone(),
            },
        };

        StructurerConfig::builder()
            .delimiter(self.delimiter)
            .orphan_policy(orphan_policy)
            .build()
    }
}
