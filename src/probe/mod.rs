//! Media analysis on top of mediatab-source, driven by [`Config`].

use crate::config::{Config, ReportConfig};
use anyhow::{Context, Result};
use mediatab_report::{Info, Section, Structurer, StructurerConfig};
use mediatab_source::{Backend, MediaInfo, StreamKind};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use mediatab_source::{check_tools, ToolInfo};

/// Opens media through one backend with configured settings.
pub struct Prober {
    backend: Box<dyn Backend>,
    chunk_size: usize,
    structurer: StructurerConfig,
}

impl Prober {
    /// Build the backend named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = mediatab_source::backend(
            config.source.backend,
            config.source.tool_path.as_deref(),
        )?;
        Ok(Self::with_backend(backend, config))
    }

    /// Use an existing backend with the rest of `config`.
    pub fn with_backend(backend: Box<dyn Backend>, config: &Config) -> Self {
        Self {
            backend,
            chunk_size: config.source.chunk_size,
            structurer: config.report.structurer_config(),
        }
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn open(&self, path: &Path, buffered: bool) -> Result<MediaInfo> {
        if buffered {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            tracing::debug!(
                "Streaming {} in {} byte chunks",
                path.display(),
                self.chunk_size
            );
            Ok(MediaInfo::open_reader(
                self.backend.as_ref(),
                BufReader::new(file),
                self.chunk_size,
            )?)
        } else {
            Ok(MediaInfo::open(self.backend.as_ref(), path)?)
        }
    }

    /// Structured report for a file. `buffered` streams the file through
    /// the engine's buffer interface instead of letting it open the path.
    pub fn info(&self, path: &Path, stream: usize, buffered: bool) -> Result<Info> {
        tracing::info!("Analyzing {}", path.display());

        let mut handle = self.open(path, buffered)?;
        let info = handle
            .info_with(stream, &self.structurer)
            .with_context(|| format!("Failed to read report for {}", path.display()))?;
        handle.close();

        tracing::debug!("{} sections", info.len());
        Ok(info)
    }

    /// One field of one stream.
    pub fn get(&self, path: &Path, key: &str, kind: StreamKind, stream: usize) -> Result<String> {
        let mut handle = self.open(path, false)?;
        let value = handle.get(key, stream, kind)?;
        handle.close();
        Ok(value)
    }
}

/// Structure a saved report with the configured settings.
pub fn structure_report(report: &str, config: &ReportConfig) -> Result<Info> {
    Structurer::new(config.structurer_config())
        .structure(report)
        .context("Failed to structure report")
}

/// Human-readable rendering, one block per section.
pub fn format_info(info: &Info) -> String {
    let mut out = String::new();
    for (i, (name, section)) in info.sections().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(name);
        out.push('\n');
        out.push_str(&format_section(section));
    }
    out
}

/// Fields of one section, names padded to a common width.
pub fn format_section(section: &Section) -> String {
    let width = section.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    section
        .iter()
        .map(|(key, value)| format!("  {key:<width$} : {value}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_info() {
        let info = mediatab_report::structure(
            "General\nFormat,Matroska\nFile size,1.2 GiB\nVideo\nFormat,AVC\n",
        )
        .unwrap();

        assert_eq!(
            format_info(&info),
            "General\n  File_Size : 1.2 GiB\n  Format    : Matroska\n\nVideo\n  Format : AVC\n"
        );
    }

    #[test]
    fn test_format_empty_section() {
        let info = mediatab_report::structure("Menu\n").unwrap();
        assert_eq!(format_info(&info), "Menu\n");
    }

    #[test]
    fn test_structure_report_uses_config() {
        let config = ReportConfig {
            orphan_lines: crate::config::OrphanLines::Collect,
            ..ReportConfig::default()
        };
        let info = structure_report("Format,AVC\n", &config).unwrap();
        assert_eq!(info.get("Unknown", "Format"), Some("AVC"));

        let err = structure_report("  \n", &config).unwrap_err();
        assert!(err.to_string().contains("Failed to structure report"));
    }
}
