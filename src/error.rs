// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Hexer return `error::Result<T>`.  No panics
// in production paths; errors surface as log records and, for user-driven
// opens, as an error dialog (see `platform::win32::window::show_error_dialog`).

/// Every error that Hexer can produce.
#[derive(Debug, thiserror::Error)]
pub enum HexerError {
    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A standard I/O error (file open, read, write, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be encoded or decoded.
    #[error("settings format error: {0}")]
    Json(#[from] serde_json::Error),

    /// A data source refused to open a resource.
    #[error("cannot open {path}: {reason}")]
    Open {
        /// The data path as requested by the user.
        path: String,
        /// Human-readable cause.
        reason: String,
    },
}

// Convert a windows-crate error (HRESULT) directly into a HexerError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for HexerError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HexerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_display_is_hex_padded() {
        let e = HexerError::Win32 {
            function: "AppendMenuW",
            code: 5,
        };
        assert_eq!(e.to_string(), "AppendMenuW failed (error 0x00000005)");
    }

    #[test]
    fn io_error_keeps_source() {
        let e: HexerError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&e).is_some());
        assert!(e.to_string().starts_with("I/O error"));
    }

    #[test]
    fn open_error_names_path() {
        let e = HexerError::Open {
            path: r"C:\a.bin".to_owned(),
            reason: "not a file".to_owned(),
        };
        assert_eq!(e.to_string(), r"cannot open C:\a.bin: not a file");
    }
}
