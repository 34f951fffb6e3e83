//! The owned analysis handle.

use crate::backend::{Backend, FeedStatus, Session};
use crate::{Error, Result, StreamKind};
use mediatab_report::{Info, Structurer, StructurerConfig};
use std::fmt;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Chunk size used by [`MediaInfo::open_reader`] callers that have no
/// preference.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An open analysis of one file or stream.
///
/// The handle owns its engine session and releases it exactly once, either
/// through [`MediaInfo::close`] or on drop. It can move to another thread
/// but is never shared: every query takes `&mut self`.
///
/// # Example
///
/// ```no_run
/// use mediatab_source::{MediaInfo, StreamKind, ToolBackend};
///
/// let backend = ToolBackend::new();
/// let mut handle = MediaInfo::open(&backend, "movie.mkv")?;
/// let width = handle.get("Width", 0, StreamKind::Video)?;
/// let info = handle.info(0)?;
/// println!("{width} px, {} sections", info.len());
/// # Ok::<(), mediatab_source::Error>(())
/// ```
pub struct MediaInfo {
    session: Option<Box<dyn Session>>,
    backend: &'static str,
}

impl MediaInfo {
    /// Open and analyze the file at `path`.
    ///
    /// # Errors
    ///
    /// [`Error::CannotOpen`] when the engine cannot open or recognize the
    /// file; backend setup errors otherwise.
    pub fn open(backend: &dyn Backend, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        backend.init()?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Opening {} with {} backend", path.display(), backend.name());

        let session = backend.open(path)?;
        Ok(Self::from_session(backend.name(), session))
    }

    /// Analyze data read from `reader`, passed to the engine in chunks of
    /// `chunk_size` bytes until the input ends or the engine has enough.
    ///
    /// The reader's total length is taken by seeking to its end; reading
    /// starts from the beginning.
    pub fn open_reader<R: Read + Seek>(
        backend: &dyn Backend,
        mut reader: R,
        chunk_size: usize,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidInput("chunk size must be positive".to_string()));
        }

        let total_size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        backend.init()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Opening {} byte stream with {} backend",
            total_size,
            backend.name()
        );

        // Wrapped before feeding so an error below still closes the session.
        let mut handle = Self::from_session(backend.name(), backend.open_buffer(total_size)?);
        let session = handle.session()?;

        let mut chunk = vec![0u8; chunk_size];
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if session.feed(&chunk[..read])? == FeedStatus::Stop {
                break;
            }
        }
        session.finish()?;

        Ok(handle)
    }

    fn from_session(backend: &'static str, session: Box<dyn Session>) -> Self {
        Self {
            session: Some(session),
            backend,
        }
    }

    fn session(&mut self) -> Result<&mut (dyn Session + 'static)> {
        self.session.as_deref_mut().ok_or(Error::Closed)
    }

    /// Name of the backend serving this handle.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Set an engine option for this handle and return the engine's answer.
    pub fn option(&mut self, key: &str, value: &str) -> Result<String> {
        self.session()?.option(key, value)
    }

    /// Fetch one field of one stream.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the engine has no value for the key.
    pub fn get(&mut self, key: &str, stream: usize, kind: StreamKind) -> Result<String> {
        let value = self.session()?.get(key, stream, kind)?;
        if value.is_empty() {
            return Err(Error::not_found(key, kind, stream));
        }
        Ok(value)
    }

    /// Number of streams of `kind`.
    pub fn count(&mut self, kind: StreamKind) -> Result<usize> {
        self.session()?.count(kind)
    }

    /// The raw report in whatever output format is currently configured.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyReport`] when the engine returns nothing.
    pub fn inform(&mut self, stream: usize) -> Result<String> {
        let report = self.session()?.inform(stream)?;
        if report.is_empty() {
            return Err(Error::EmptyReport);
        }
        Ok(report)
    }

    /// Complete report, structured into sections.
    ///
    /// Switches the handle to complete CSV output; the options stay set
    /// for later calls.
    pub fn info(&mut self, stream: usize) -> Result<Info> {
        self.info_with(stream, &StructurerConfig::default())
    }

    /// Like [`MediaInfo::info`] with custom structuring settings.
    pub fn info_with(&mut self, stream: usize, config: &StructurerConfig) -> Result<Info> {
        self.option("Complete", "1")?;
        self.option("Output", "CSV")?;
        let report = self.inform(stream)?;
        let info = Structurer::new(config.clone()).structure(&report)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Structured report into {} sections", info.len());

        Ok(info)
    }

    /// Release the engine session now. Dropping the handle does the same.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            #[cfg(feature = "tracing")]
            tracing::trace!("Closing {} session", self.backend);

            session.close();
        }
    }
}

impl Drop for MediaInfo {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for MediaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaInfo")
            .field("backend", &self.backend)
            .field("open", &self.session.is_some())
            .finish()
    }
}
