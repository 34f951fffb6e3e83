//! Backend calling libmediainfo's C API.
//!
//! # Safety
//!
//! Every engine handle is owned by exactly one [`NativeSession`], which
//! deletes it on close or drop. Strings returned by the library point into
//! a per-handle buffer that the next call overwrites, so they are copied
//! out immediately.

#![allow(non_camel_case_types)]

use super::{Backend, FeedStatus, Session};
use crate::{Error, Result, StreamKind};
use libc::{c_char, c_int, c_void, size_t};
use std::ffi::{CStr, CString};
use std::path::Path;
use std::ptr;
use std::sync::OnceLock;

type MediaInfo_stream_C = c_int;
type MediaInfo_info_C = c_int;

const INFO_NAME: MediaInfo_info_C = 0;
const INFO_TEXT: MediaInfo_info_C = 1;

#[link(name = "mediainfo")]
extern "C" {
    fn MediaInfoA_New() -> *mut c_void;
    fn MediaInfoA_Delete(handle: *mut c_void);
    fn MediaInfoA_Open(handle: *mut c_void, file: *const c_char) -> size_t;
    fn MediaInfoA_Open_Buffer_Init(handle: *mut c_void, file_size: u64, file_offset: u64)
        -> size_t;
    fn MediaInfoA_Open_Buffer_Continue(
        handle: *mut c_void,
        buffer: *const u8,
        buffer_size: size_t,
    ) -> size_t;
    fn MediaInfoA_Open_Buffer_Finalize(handle: *mut c_void) -> size_t;
    fn MediaInfoA_Close(handle: *mut c_void);
    fn MediaInfoA_Inform(handle: *mut c_void, reserved: size_t) -> *const c_char;
    fn MediaInfoA_Get(
        handle: *mut c_void,
        stream_kind: MediaInfo_stream_C,
        stream_number: size_t,
        parameter: *const c_char,
        kind_of_info: MediaInfo_info_C,
        kind_of_search: MediaInfo_info_C,
    ) -> *const c_char;
    fn MediaInfoA_Option(
        handle: *mut c_void,
        option: *const c_char,
        value: *const c_char,
    ) -> *const c_char;
    fn MediaInfoA_Count_Get(
        handle: *mut c_void,
        stream_kind: MediaInfo_stream_C,
        stream_number: size_t,
    ) -> size_t;
}

/// Library version, set once per process by [`NativeBackend::init`].
static LIBRARY_VERSION: OnceLock<String> = OnceLock::new();

fn c_string(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::InvalidInput(format!("embedded NUL in '{value}'")))
}

/// Copy a library-owned string. Null reads as empty.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Set a process-wide option (null handle).
fn global_option(key: &str, value: &str) -> Result<String> {
    let key = c_string(key)?;
    let value = c_string(value)?;
    // SAFETY: both strings outlive the call; a null handle addresses the
    // library's static options.
    Ok(unsafe { owned_string(MediaInfoA_Option(ptr::null_mut(), key.as_ptr(), value.as_ptr())) })
}

/// Backend linking libmediainfo.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }

    /// Version reported by the library, once initialized.
    pub fn version(&self) -> Option<String> {
        LIBRARY_VERSION.get().cloned()
    }

    fn new_handle() -> Result<*mut c_void> {
        // SAFETY: no preconditions; null signals allocation failure.
        let handle = unsafe { MediaInfoA_New() };
        if handle.is_null() {
            return Err(Error::InitFailed(
                "libmediainfo could not allocate a handle".to_string(),
            ));
        }
        Ok(handle)
    }
}

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn init(&self) -> Result<()> {
        if LIBRARY_VERSION.get().is_some() {
            return Ok(());
        }

        global_option("CharSet", "UTF-8")?;
        let version = global_option("Info_Version", "")?;
        if version.is_empty() {
            return Err(Error::InitFailed(
                "libmediainfo reported no version".to_string(),
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Loaded {}", version);

        let _ = LIBRARY_VERSION.set(version);
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Session>> {
        let file = path
            .to_str()
            .ok_or_else(|| Error::InvalidInput(format!("non UTF-8 path {}", path.display())))
            .and_then(c_string)?;

        let session = NativeSession::new(Self::new_handle()?, false);
        // SAFETY: handle is live and owned by `session`; `file` outlives the call.
        let opened = unsafe { MediaInfoA_Open(session.handle, file.as_ptr()) };
        if opened == 0 {
            return Err(Error::cannot_open(path));
        }

        Ok(Box::new(session))
    }

    fn open_buffer(&self, total_size: u64) -> Result<Box<dyn Session>> {
        let mut session = NativeSession::new(Self::new_handle()?, true);
        session.option("File_IsSeekable", "0")?;
        // SAFETY: handle is live and owned by `session`.
        unsafe { MediaInfoA_Open_Buffer_Init(session.handle, total_size, 0) };
        Ok(Box::new(session))
    }
}

/// One libmediainfo handle.
struct NativeSession {
    handle: *mut c_void,
    buffered: bool,
}

// SAFETY: the handle is only reached through `&mut self`, so it is never
// used from two threads at once.
unsafe impl Send for NativeSession {}

impl NativeSession {
    fn new(handle: *mut c_void, buffered: bool) -> Self {
        Self { handle, buffered }
    }

    fn handle(&self) -> Result<*mut c_void> {
        if self.handle.is_null() {
            Err(Error::Closed)
        } else {
            Ok(self.handle)
        }
    }
}

impl Session for NativeSession {
    fn feed(&mut self, bytes: &[u8]) -> Result<FeedStatus> {
        let handle = self.handle()?;
        if !self.buffered {
            return Err(Error::InvalidInput(
                "cannot feed data to a file session".to_string(),
            ));
        }
        // SAFETY: handle is live; the slice is valid for `bytes.len()` bytes.
        let status =
            unsafe { MediaInfoA_Open_Buffer_Continue(handle, bytes.as_ptr(), bytes.len()) };
        Ok(FeedStatus::from_raw(status))
    }

    fn finish(&mut self) -> Result<()> {
        let handle = self.handle()?;
        if self.buffered {
            // SAFETY: handle is live.
            unsafe { MediaInfoA_Open_Buffer_Finalize(handle) };
        }
        Ok(())
    }

    fn option(&mut self, key: &str, value: &str) -> Result<String> {
        let handle = self.handle()?;
        let key = c_string(key)?;
        let value = c_string(value)?;
        // SAFETY: handle is live; strings outlive the call; the result is
        // copied before the next library call.
        Ok(unsafe { owned_string(MediaInfoA_Option(handle, key.as_ptr(), value.as_ptr())) })
    }

    fn get(&mut self, key: &str, stream: usize, kind: StreamKind) -> Result<String> {
        let handle = self.handle()?;
        let parameter = c_string(key)?;
        // SAFETY: as for `option`.
        Ok(unsafe {
            owned_string(MediaInfoA_Get(
                handle,
                kind.id() as MediaInfo_stream_C,
                stream,
                parameter.as_ptr(),
                INFO_TEXT,
                INFO_NAME,
            ))
        })
    }

    fn inform(&mut self, stream: usize) -> Result<String> {
        let handle = self.handle()?;
        // SAFETY: as for `option`.
        Ok(unsafe { owned_string(MediaInfoA_Inform(handle, stream)) })
    }

    fn count(&mut self, kind: StreamKind) -> Result<usize> {
        let handle = self.handle()?;
        // SAFETY: handle is live; `size_t::MAX` asks for the stream count.
        Ok(unsafe { MediaInfoA_Count_Get(handle, kind.id() as MediaInfo_stream_C, size_t::MAX) })
    }

    fn close(&mut self) {
        if self.handle.is_null() {
            return;
        }
        // SAFETY: handle is live and never used again after this.
        unsafe {
            MediaInfoA_Close(self.handle);
            MediaInfoA_Delete(self.handle);
        }
        self.handle = ptr::null_mut();
    }
}

impl Drop for NativeSession {
    fn drop(&mut self) {
        self.close();
    }
}
