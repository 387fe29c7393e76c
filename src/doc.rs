// ── Documents ─────────────────────────────────────────────────────────────────
//
// What a user can open (file, device, process), how an open request is
// described, and how an opened document is named in titles, menus and logs.
// No Win32 imports; pure Rust.

use serde::{Deserialize, Serialize};

// ── Open mode ─────────────────────────────────────────────────────────────────

/// The kind of resource a document was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum OpenMode {
    File,
    Device,
    Process,
}

impl OpenMode {
    /// Display name used in titles and log lines.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Device => "Device",
            Self::Process => "Process",
        }
    }
}

/// `\\.\PhysicalDrive0`, `\\.\C:`: paths opened as raw devices.
pub(crate) fn is_device_namespace(path: &str) -> bool {
    path.starts_with(r"\\.\")
}

// ── Open request ──────────────────────────────────────────────────────────────

/// A request to open one resource.  Also the record type of the last-opened
/// list in `AppSettings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DataOpen {
    /// File path, device path (`\\.\PhysicalDrive0`) or process image name.
    pub(crate) path: String,
    pub(crate) mode: OpenMode,
    /// Process id; 0 unless `mode == OpenMode::Process`.
    #[serde(default)]
    pub(crate) proc_id: u32,
}

impl DataOpen {
    pub(crate) fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: OpenMode::File,
            proc_id: 0,
        }
    }

    pub(crate) fn device(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: OpenMode::Device,
            proc_id: 0,
        }
    }

    // The shell has no process picker yet; process records only arrive
    // through the settings file.
    #[cfg(test)]
    pub(crate) fn process(name: impl Into<String>, proc_id: u32) -> Self {
        Self {
            path: name.into(),
            mode: OpenMode::Process,
            proc_id,
        }
    }

    /// Classify an entry picked from the recent-file menu.
    ///
    /// Only the device namespace counts as a device here; UNC shares
    /// (`\\server\share\…`) carry the same `\\` prefix but are files.
    pub(crate) fn from_recent(path: &str) -> Self {
        if is_device_namespace(path) {
            Self::device(path)
        } else {
            Self::file(path)
        }
    }

    /// Whether `other` refers to the same resource (same path and process).
    pub(crate) fn same_resource(&self, other: &Self) -> bool {
        self.path == other.path && self.proc_id == other.proc_id
    }

    /// A name that tells two open documents apart.
    ///
    /// Processes may share an image name, so their id is part of the name.
    pub(crate) fn unique_name(&self) -> String {
        match self.mode {
            OpenMode::Process => format!("Process: {} (ID: {})", self.path, self.proc_id),
            OpenMode::File | OpenMode::Device => self.path.clone(),
        }
    }

    /// Window / tab title for the document.
    ///
    /// | Mode | Path | Title |
    /// |---|---|---|
    /// | File | `C:\dir\a.bin` | `a.bin` |
    /// | Device | `\\.\PhysicalDrive0` | `Device: PhysicalDrive0` |
    /// | Process | `app.exe`, pid 7 | `Process: app.exe (ID: 7)` |
    ///
    /// A file or device path without any `\` yields an empty title.
    pub(crate) fn title(&self) -> String {
        if self.mode == OpenMode::Process {
            return self.unique_name();
        }
        let Some(pos) = self.path.rfind('\\') else {
            return String::new();
        };
        let name = &self.path[pos + 1..];
        match self.mode {
            OpenMode::Device => format!("{}: {name}", OpenMode::Device.name()),
            _ => name.to_owned(),
        }
    }
}

// ── HexerDoc ──────────────────────────────────────────────────────────────────

/// One opened document.
#[derive(Debug, Clone)]
pub(crate) struct HexerDoc {
    pub(crate) open_mode: OpenMode,
    /// Path exactly as requested.
    pub(crate) data_path: String,
    /// Text after the last `\` of `data_path` (the whole path if none).
    pub(crate) file_name: String,
    pub(crate) proc_id: u32,
    pub(crate) title: String,
    pub(crate) unique_name: String,
    /// Size reported by the data source when the document was opened.
    pub(crate) data_size: u64,
}

impl HexerDoc {
    pub(crate) fn new(dos: &DataOpen, data_size: u64) -> Self {
        let file_name = dos
            .path
            .rsplit_once('\\')
            .map_or(dos.path.as_str(), |(_, name)| name)
            .to_owned();
        Self {
            open_mode: dos.mode,
            data_path: dos.path.clone(),
            file_name,
            proc_id: dos.proc_id,
            title: dos.title(),
            unique_name: dos.unique_name(),
            data_size,
        }
    }

    pub(crate) fn is_process(&self) -> bool {
        self.open_mode == OpenMode::Process
    }

    /// Log line written when the user closes this document.
    pub(crate) fn close_notice(&self) -> String {
        if self.is_process() {
            format!(
                "{} closed: {} (ID: {})",
                self.open_mode.name(),
                self.file_name,
                self.proc_id
            )
        } else {
            format!("{} closed: {}", self.open_mode.name(), self.file_name)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names() {
        assert_eq!(OpenMode::File.name(), "File");
        assert_eq!(OpenMode::Device.name(), "Device");
        assert_eq!(OpenMode::Process.name(), "Process");
    }

    #[test]
    fn titles() {
        assert_eq!(DataOpen::file(r"C:\dir\a.bin").title(), "a.bin");
        assert_eq!(
            DataOpen::device(r"\\.\PhysicalDrive0").title(),
            "Device: PhysicalDrive0"
        );
        assert_eq!(
            DataOpen::process("app.exe", 7).title(),
            "Process: app.exe (ID: 7)"
        );
        assert_eq!(DataOpen::file("relative.bin").title(), "");
    }

    #[test]
    fn unique_names() {
        assert_eq!(DataOpen::file(r"C:\a.bin").unique_name(), r"C:\a.bin");
        assert_eq!(
            DataOpen::process("svc.exe", 1234).unique_name(),
            "Process: svc.exe (ID: 1234)"
        );
    }

    #[test]
    fn recent_entries_are_classified() {
        assert_eq!(DataOpen::from_recent(r"\\.\PhysicalDrive2").mode, OpenMode::Device);
        assert_eq!(DataOpen::from_recent(r"D:\x.iso").mode, OpenMode::File);
        assert_eq!(DataOpen::from_recent(r"\\server\share\a.bin").mode, OpenMode::File);
        assert_eq!(DataOpen::from_recent(r"\\?\C:\long\a.bin").mode, OpenMode::File);
    }

    #[test]
    fn doc_file_name_and_close_notice() {
        let doc = HexerDoc::new(&DataOpen::file(r"C:\dir\a.bin"), 16);
        assert_eq!(doc.file_name, "a.bin");
        assert_eq!(doc.close_notice(), "File closed: a.bin");

        let proc_doc = HexerDoc::new(&DataOpen::process("app.exe", 9), 0);
        assert_eq!(proc_doc.file_name, "app.exe");
        assert_eq!(proc_doc.close_notice(), "Process closed: app.exe (ID: 9)");
    }

    #[test]
    fn same_resource_ignores_mode() {
        let a = DataOpen::file(r"\\.\X");
        let b = DataOpen::device(r"\\.\X");
        assert!(a.same_resource(&b));
        assert!(!DataOpen::process("p", 1).same_resource(&DataOpen::process("p", 2)));
    }
}
