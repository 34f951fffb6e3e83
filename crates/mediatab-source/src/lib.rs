//! # mediatab-source
//!
//! Owned access to the MediaInfo engine.
//!
//! This crate provides:
//! - [`MediaInfo`], a handle over one analyzed file or byte stream
//! - Single-field lookup ([`MediaInfo::get`]) and stream counts
//! - Complete reports structured into sections ([`MediaInfo::info`])
//! - Detection of the engine installation ([`tools`])
//!
//! ## Features
//!
//! - `native` - Link libmediainfo and call its C API directly
//! - `testing` - In-memory [`testing::FixtureBackend`] for dependent crates
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use mediatab_source::{backend, BackendKind, MediaInfo, StreamKind};
//!
//! let engine = backend(BackendKind::Auto, None)?;
//! let mut handle = MediaInfo::open(engine.as_ref(), "/path/to/video.mkv")?;
//! println!("Codec: {}", handle.get("Format", 0, StreamKind::Video)?);
//!
//! let info = handle.info(0)?;
//! if let Some(general) = info.section("General") {
//!     println!("{} general fields", general.len());
//! }
//! # Ok::<(), mediatab_source::Error>(())
//! ```

pub mod backend;
mod error;
mod handle;
mod stream;
pub mod tools;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports
pub use backend::{Backend, FeedStatus, Session, ToolBackend};
pub use error::{Error, Result};
pub use handle::{MediaInfo, DEFAULT_CHUNK_SIZE};
pub use stream::{ParseStreamKindError, StreamKind};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};

#[cfg(feature = "native")]
pub use backend::NativeBackend;

pub use mediatab_report::{Info, OrphanPolicy, Section, StructurerConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which engine implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The native library when compiled in, otherwise the `mediainfo` program.
    #[default]
    Auto,
    /// The `mediainfo` command-line program.
    Tool,
    /// libmediainfo through its C API (requires the `native` feature).
    Native,
}

impl BackendKind {
    /// Whether this build can serve the kind.
    pub fn is_supported(self) -> bool {
        match self {
            BackendKind::Auto | BackendKind::Tool => true,
            BackendKind::Native => cfg!(feature = "native"),
        }
    }
}

/// Build a backend of the given kind.
///
/// `tool_path` overrides the PATH lookup of the `mediainfo` program.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `Native` is requested from a build
/// without the `native` feature.
pub fn backend(kind: BackendKind, tool_path: Option<&Path>) -> Result<Box<dyn Backend>> {
    let tool = || -> Box<dyn Backend> {
        match tool_path {
            Some(path) => Box::new(ToolBackend::with_program(path)),
            None => Box::new(ToolBackend::new()),
        }
    };

    match kind {
        BackendKind::Tool => Ok(tool()),
        #[cfg(feature = "native")]
        BackendKind::Auto | BackendKind::Native => Ok(Box::new(NativeBackend::new())),
        #[cfg(not(feature = "native"))]
        BackendKind::Auto => Ok(tool()),
        #[cfg(not(feature = "native"))]
        BackendKind::Native => Err(Error::InvalidInput(
            "native backend requires building with the `native` feature".to_string(),
        )),
    }
}
