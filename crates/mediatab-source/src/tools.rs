//! Detection of the `mediainfo` program and the native library.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the MediaInfo command-line program.
pub const MEDIAINFO_TOOL: &str = "mediainfo";

/// Availability of one engine flavour.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool or library.
    pub name: String,
    /// Whether it can be used.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the executable, when it is one.
    pub path: Option<PathBuf>,
}

/// Check if a program is available and get its version line.
///
/// # Example
///
/// ```no_run
/// use mediatab_source::tools::check_tool;
/// use std::path::Path;
///
/// let info = check_tool(Path::new("mediainfo"));
/// if info.available {
///     println!("mediainfo version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(program: &Path) -> ToolInfo {
    check_tool_with_arg(program, "--Version")
}

/// Check if a program is available using a custom version argument.
pub fn check_tool_with_arg(program: &Path, version_arg: &str) -> ToolInfo {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    match Command::new(program).arg(version_arg).output() {
        Ok(output) if output.status.success() => ToolInfo {
            name,
            available: true,
            version: version_line(&String::from_utf8_lossy(&output.stdout)),
            path: which::which(program).ok(),
        },
        _ => ToolInfo {
            name,
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check every engine flavour this build can use.
///
/// The command-line program is always listed; the native library only
/// when the crate was built with the `native` feature.
pub fn check_tools(tool_path: Option<&Path>) -> Vec<ToolInfo> {
    let program = tool_path.unwrap_or_else(|| Path::new(MEDIAINFO_TOOL));

    #[allow(unused_mut)]
    let mut tools = vec![check_tool(program)];

    #[cfg(feature = "native")]
    tools.push(native_library_info());

    tools
}

#[cfg(feature = "native")]
fn native_library_info() -> ToolInfo {
    use crate::backend::{Backend, NativeBackend};

    let backend = NativeBackend::new();
    let version = backend.init().ok().and_then(|_| backend.version());
    ToolInfo {
        name: "libmediainfo".to_string(),
        available: version.is_some(),
        version,
        path: None,
    }
}

/// Require that a program is available on PATH, returning its path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if the program is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a program, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    require_tool(name)
}

/// `mediainfo --Version` prints a banner line first; the version is on
/// the last non-empty line (`MediaInfoLib - v23.10`).
fn version_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
}
