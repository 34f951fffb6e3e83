//! In-memory backend for tests.
//!
//! [`FixtureBackend`] answers from canned data and records what callers
//! did with it, so handle behavior can be tested without the engine.

use crate::backend::{Backend, FeedStatus, Session};
use crate::{Error, Result, StreamKind};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// What callers did with a [`FixtureBackend`] and its sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    /// Calls to [`Backend::init`].
    pub inits: usize,
    /// Sessions opened, file or buffer.
    pub opened: usize,
    /// Sessions closed (repeated closes of one session count once).
    pub closed: usize,
    /// Options in the order they were set.
    pub options: Vec<(String, String)>,
    /// Total size announced to `open_buffer`.
    pub buffer_size: Option<u64>,
    /// Bytes passed to `feed`.
    pub fed: Vec<u8>,
    /// Number of `feed` calls.
    pub feeds: usize,
    /// Whether `finish` was called.
    pub finished: bool,
}

/// Backend answering from canned data.
#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    report: String,
    fields: HashMap<(StreamKind, usize, String), String>,
    counts: HashMap<StreamKind, usize>,
    unreadable: HashSet<PathBuf>,
    stop_after: Option<usize>,
    init_error: Option<String>,
    journal: Arc<Mutex<Journal>>,
}

impl FixtureBackend {
    /// Backend whose sessions return `report` from `inform`.
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            ..Self::default()
        }
    }

    /// Serve `value` for `key` in stream `stream` of `kind`.
    pub fn with_field(
        mut self,
        kind: StreamKind,
        stream: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.fields.insert((kind, stream, key.into()), value.into());
        self
    }

    /// Report `count` streams of `kind`.
    pub fn with_count(mut self, kind: StreamKind, count: usize) -> Self {
        self.counts.insert(kind, count);
        self
    }

    /// Make opening `path` fail with [`Error::CannotOpen`].
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    /// Answer [`FeedStatus::Stop`] once `bytes` have been fed.
    pub fn stop_after(mut self, bytes: usize) -> Self {
        self.stop_after = Some(bytes);
        self
    }

    /// Make `init` fail.
    pub fn failing_init(mut self, message: impl Into<String>) -> Self {
        self.init_error = Some(message.into());
        self
    }

    /// Snapshot of everything recorded so far.
    pub fn journal(&self) -> Journal {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Journal> {
        // A panicking test must not hide the journal from the others.
        self.journal.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn session(&self) -> FixtureSession {
        self.lock().opened += 1;
        FixtureSession {
            fixture: self.clone(),
            open: true,
        }
    }
}

impl Backend for FixtureBackend {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn init(&self) -> Result<()> {
        self.lock().inits += 1;
        match &self.init_error {
            Some(message) => Err(Error::InitFailed(message.clone())),
            None => Ok(()),
        }
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Session>> {
        if self.unreadable.contains(path) {
            return Err(Error::cannot_open(path));
        }
        Ok(Box::new(self.session()))
    }

    fn open_buffer(&self, total_size: u64) -> Result<Box<dyn Session>> {
        self.lock().buffer_size = Some(total_size);
        Ok(Box::new(self.session()))
    }
}

struct FixtureSession {
    fixture: FixtureBackend,
    open: bool,
}

impl FixtureSession {
    fn journal(&self) -> Result<MutexGuard<'_, Journal>> {
        self.ensure_open()?;
        Ok(self.fixture.lock())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::Closed)
        }
    }
}

impl Session for FixtureSession {
    fn feed(&mut self, bytes: &[u8]) -> Result<FeedStatus> {
        let stop_after = self.fixture.stop_after;
        let mut journal = self.journal()?;
        journal.fed.extend_from_slice(bytes);
        journal.feeds += 1;
        match stop_after {
            Some(limit) if journal.fed.len() >= limit => Ok(FeedStatus::Stop),
            _ => Ok(FeedStatus::Continue),
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.journal()?.finished = true;
        Ok(())
    }

    fn option(&mut self, key: &str, value: &str) -> Result<String> {
        self.journal()?
            .options
            .push((key.to_string(), value.to_string()));
        Ok(String::new())
    }

    fn get(&mut self, key: &str, stream: usize, kind: StreamKind) -> Result<String> {
        self.ensure_open()?;
        Ok(self
            .fixture
            .fields
            .get(&(kind, stream, key.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn inform(&mut self, _stream: usize) -> Result<String> {
        self.ensure_open()?;
        Ok(self.fixture.report.clone())
    }

    fn count(&mut self, kind: StreamKind) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.fixture.counts.get(&kind).copied().unwrap_or_default())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.fixture.lock().closed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_session_rejects_queries() {
        let backend = FixtureBackend::new("General\nFormat,AVC\n")
            .with_field(StreamKind::General, 0, "Format", "AVC")
            .with_count(StreamKind::Audio, 2);
        let mut session = backend.open(Path::new("/test/movie.mkv")).unwrap();
        assert_eq!(session.get("Format", 0, StreamKind::General).unwrap(), "AVC");
        assert_eq!(session.count(StreamKind::Audio).unwrap(), 2);

        session.close();
        assert!(matches!(
            session.get("Format", 0, StreamKind::General),
            Err(Error::Closed)
        ));
        assert!(matches!(session.inform(0), Err(Error::Closed)));
        assert!(matches!(session.count(StreamKind::Audio), Err(Error::Closed)));
        assert_eq!(backend.journal().closed, 1);
    }
}
