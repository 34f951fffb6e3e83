//! Engine backends.
//!
//! A [`Backend`] opens analysis sessions; a [`Session`] is one open file or
//! buffer inside the engine. Two backends ship with the crate:
//!
//! - **Tool** (always available): drives the `mediainfo` command-line program
//! - **Native** (`native` feature): calls libmediainfo's C API directly

mod tool;

#[cfg(feature = "native")]
mod native;

pub use tool::ToolBackend;

#[cfg(feature = "native")]
pub use native::NativeBackend;

use crate::{Result, StreamKind};
use std::path::Path;

/// Answer of the engine after a chunk of buffered input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Send more data.
    Continue,
    /// The engine has what it needs; stop feeding.
    Stop,
}

impl FeedStatus {
    /// Interpret a raw `Open_Buffer_Continue` status: zero continues,
    /// anything else stops.
    pub fn from_raw(status: usize) -> Self {
        if status == 0 {
            FeedStatus::Continue
        } else {
            FeedStatus::Stop
        }
    }
}

/// An implementation of the MediaInfo engine.
pub trait Backend: Send + Sync {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Process-wide setup. Idempotent; called before every open.
    fn init(&self) -> Result<()>;

    /// Open and analyze a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotOpen`](crate::Error::CannotOpen) when the
    /// engine rejects the file.
    fn open(&self, path: &Path) -> Result<Box<dyn Session>>;

    /// Prepare a session that receives the input through
    /// [`Session::feed`]. `total_size` is the full input length in bytes.
    fn open_buffer(&self, total_size: u64) -> Result<Box<dyn Session>>;
}

/// One analysis inside the engine.
///
/// A session is owned by one caller at a time; it may move between threads
/// but is never shared.
pub trait Session: Send {
    /// Pass the next chunk of buffered input.
    fn feed(&mut self, bytes: &[u8]) -> Result<FeedStatus>;

    /// Signal the end of buffered input. No-op for file sessions.
    fn finish(&mut self) -> Result<()>;

    /// Set an engine option and return the engine's answer.
    fn option(&mut self, key: &str, value: &str) -> Result<String>;

    /// Fetch one field. Empty when the engine has no value.
    fn get(&mut self, key: &str, stream: usize, kind: StreamKind) -> Result<String>;

    /// Fetch the full report in the currently configured output format.
    fn inform(&mut self, stream: usize) -> Result<String>;

    /// Number of streams of a kind.
    fn count(&mut self, kind: StreamKind) -> Result<usize>;

    /// Release engine resources. Must tolerate repeated calls.
    fn close(&mut self);
}
