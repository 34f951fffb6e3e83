//! Backend driving the `mediainfo` command-line program.
//!
//! Every query is one invocation of the program. Options set on a session
//! are replayed as `--Key=Value` arguments; single fields use an inform
//! template (`--Inform=Video;%Format%\n`) and pick the requested stream's
//! line out of the result. Buffered input is spooled to a temporary file
//! that the program reads once the caller finishes feeding.

use super::{Backend, FeedStatus, Session};
use crate::tools::{get_tool_path, MEDIAINFO_TOOL};
use crate::{Error, Result, StreamKind};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tempfile::NamedTempFile;

/// Options that select the output format. They are dropped for single
/// field queries, which carry their own template.
const OUTPUT_OPTIONS: &[&str] = &["Output", "Inform"];

/// Backend running the `mediainfo` program.
#[derive(Debug, Default)]
pub struct ToolBackend {
    configured: Option<PathBuf>,
    program: OnceLock<PathBuf>,
}

impl ToolBackend {
    /// Look the program up on PATH at first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific program path, falling back to PATH if it does not exist.
    pub fn with_program(path: impl Into<PathBuf>) -> Self {
        Self {
            configured: Some(path.into()),
            program: OnceLock::new(),
        }
    }

    /// Resolved program path, once [`Backend::init`] succeeded.
    pub fn program(&self) -> Option<&Path> {
        self.program.get().map(PathBuf::as_path)
    }

    fn resolved(&self) -> Result<PathBuf> {
        self.init()?;
        self.program
            .get()
            .cloned()
            .ok_or_else(|| Error::tool_not_found(MEDIAINFO_TOOL))
    }
}

impl Backend for ToolBackend {
    fn name(&self) -> &'static str {
        "tool"
    }

    fn init(&self) -> Result<()> {
        if self.program.get().is_some() {
            return Ok(());
        }

        let path = get_tool_path(MEDIAINFO_TOOL, self.configured.as_deref())?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Using mediainfo at {}", path.display());

        // A concurrent init may have won; both resolved the same path.
        let _ = self.program.set(path);
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Session>> {
        let program = self.resolved()?;

        if !path.is_file() {
            return Err(Error::cannot_open(path));
        }
        File::open(path).map_err(|_| Error::cannot_open(path))?;

        Ok(Box::new(ToolSession::new(
            program,
            Input::File(path.to_path_buf()),
        )))
    }

    fn open_buffer(&self, total_size: u64) -> Result<Box<dyn Session>> {
        let program = self.resolved()?;
        let spool = NamedTempFile::new()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Spooling {} bytes to {}",
            total_size,
            spool.path().display()
        );

        Ok(Box::new(ToolSession::new(
            program,
            Input::Spool {
                file: spool,
                expected: total_size,
                received: 0,
            },
        )))
    }
}

enum Input {
    File(PathBuf),
    Spool {
        file: NamedTempFile,
        expected: u64,
        received: u64,
    },
}

impl Input {
    fn path(&self) -> &Path {
        match self {
            Input::File(path) => path,
            Input::Spool { file, .. } => file.path(),
        }
    }
}

struct ToolSession {
    program: PathBuf,
    input: Option<Input>,
    options: Vec<(String, String)>,
}

impl ToolSession {
    fn new(program: PathBuf, input: Input) -> Self {
        Self {
            program,
            input: Some(input),
            options: Vec::new(),
        }
    }

    fn input(&self) -> Result<&Input> {
        self.input.as_ref().ok_or(Error::Closed)
    }

    /// Run the program on the session input with the stored options
    /// (minus output selection when `template` is given) and return stdout.
    fn run(&self, template: Option<String>) -> Result<String> {
        let input = self.input()?;

        let mut command = Command::new(&self.program);
        for (key, value) in &self.options {
            if template.is_some() && OUTPUT_OPTIONS.iter().any(|o| o.eq_ignore_ascii_case(key)) {
                continue;
            }
            command.arg(format!("--{key}={value}"));
        }
        if let Some(template) = template {
            command.arg(format!("--Inform={template}"));
        }
        command.arg(input.path());

        #[cfg(feature = "tracing")]
        tracing::trace!("Running {:?}", command);

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found(MEDIAINFO_TOOL)
            } else {
                Error::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed(MEDIAINFO_TOOL, stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn version(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--Version")
            .output()
            .map_err(|_| Error::tool_not_found(MEDIAINFO_TOOL))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed(MEDIAINFO_TOOL, stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or_default()
            .to_string())
    }
}

impl Session for ToolSession {
    fn feed(&mut self, bytes: &[u8]) -> Result<FeedStatus> {
        match self.input.as_mut() {
            None => Err(Error::Closed),
            Some(Input::File(_)) => Err(Error::InvalidInput(
                "cannot feed data to a file session".to_string(),
            )),
            Some(Input::Spool {
                file,
                expected,
                received,
            }) => {
                file.write_all(bytes)?;
                *received += bytes.len() as u64;
                if *received >= *expected {
                    Ok(FeedStatus::Stop)
                } else {
                    Ok(FeedStatus::Continue)
                }
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self.input.as_mut() {
            None => Err(Error::Closed),
            Some(Input::File(_)) => Ok(()),
            Some(Input::Spool { file, .. }) => {
                file.flush()?;
                Ok(())
            }
        }
    }

    fn option(&mut self, key: &str, value: &str) -> Result<String> {
        self.input()?;

        if key.eq_ignore_ascii_case("Info_Version") {
            return self.version();
        }

        match self
            .options
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.options.push((key.to_string(), value.to_string())),
        }
        Ok(String::new())
    }

    fn get(&mut self, key: &str, stream: usize, kind: StreamKind) -> Result<String> {
        let output = self.run(Some(format!("{kind};%{key}%\\n")))?;
        Ok(output
            .lines()
            .nth(stream)
            .unwrap_or_default()
            .trim_end()
            .to_string())
    }

    fn inform(&mut self, _stream: usize) -> Result<String> {
        self.run(None)
    }

    fn count(&mut self, kind: StreamKind) -> Result<usize> {
        self.input()?;
        if kind == StreamKind::General {
            return Ok(1);
        }

        let output = self.run(Some(format!("General;%{kind}Count%")))?;
        let count = output.trim();
        if count.is_empty() {
            return Ok(0);
        }
        count.parse().map_err(|_| {
            Error::tool_failed(MEDIAINFO_TOOL, format!("unexpected stream count '{count}'"))
        })
    }

    fn close(&mut self) {
        // Dropping the spool removes the temporary file.
        self.input = None;
    }
}
