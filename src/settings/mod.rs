// ── Application settings ──────────────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\Hexer\settings.json`.
// The recent-file list is stored here and shared, not copied, with
// `rfl::RecentFileList`, which is its only mutator while the app runs.
// No `unsafe`: pure safe Rust + serde_json.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::{doc::DataOpen, error::Result, rfl::RecentStore};

// ── Format version & limits ───────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

/// Default number of recent-file menu entries.
pub(crate) const DEFAULT_RFL_CAPACITY: usize = 20;

/// Hard upper bound for a user-edited `rfl_capacity`.
pub(crate) const MAX_RFL_CAPACITY: usize = 64;

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON settings file.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AppSettings {
    pub(crate) version: u32,
    /// Recently opened files and devices, most recent first.
    #[serde(default)]
    recent_files: RecentStore,
    #[serde(default = "default_rfl_capacity")]
    pub(crate) rfl_capacity: usize,
    /// Resources open when the app last exited.
    #[serde(default)]
    pub(crate) last_opened: Vec<DataOpen>,
    #[serde(default)]
    pub(crate) restore_last_opened: bool,
}

fn default_rfl_capacity() -> usize {
    DEFAULT_RFL_CAPACITY
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            recent_files: Rc::new(RefCell::new(Vec::new())),
            rfl_capacity: DEFAULT_RFL_CAPACITY,
            last_opened: Vec::new(),
            restore_last_opened: false,
        }
    }
}

impl AppSettings {
    /// Handle to the recent-file store, for `RecentFileList::initialize`.
    pub(crate) fn recent_store(&self) -> RecentStore {
        Rc::clone(&self.recent_files)
    }

    /// Record `dos` in the last-opened list unless the same resource is
    /// already there.
    pub(crate) fn lol_add(&mut self, dos: &DataOpen) {
        if !self.last_opened.iter().any(|d| d.same_resource(dos)) {
            self.last_opened.push(dos.clone());
        }
    }

    /// Forget every last-opened record for `path` / `proc_id`.
    pub(crate) fn lol_remove(&mut self, path: &str, proc_id: u32) {
        self.last_opened
            .retain(|d| !(d.path == path && d.proc_id == proc_id));
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    fn sanitize(&mut self) {
        self.rfl_capacity = self.rfl_capacity.clamp(1, MAX_RFL_CAPACITY);
        let cap = self.rfl_capacity;
        self.recent_files.borrow_mut().truncate(cap);
    }

    // ── Save ──────────────────────────────────────────────────────────────────

    /// Write the settings to `%APPDATA%\Hexer\settings.json`.
    ///
    /// The caller (`window.rs`) logs and otherwise discards any returned error.
    pub(crate) fn save(&self) -> Result<()> {
        let path = settings_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "APPDATA not set")
        })?;
        self.save_to(&path)
    }

    /// Write the settings to `path`, creating its directory if needed.
    pub(crate) fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        tracing::debug!(path = %path.display(), "[Settings] saved");
        Ok(())
    }

    // ── Load ──────────────────────────────────────────────────────────────────

    /// Read and parse the settings file.
    ///
    /// Returns `None` on any error: file missing, JSON parse failure, or an
    /// unrecognised version number.  The app then starts with defaults.
    pub(crate) fn load() -> Option<Self> {
        Self::load_from(&settings_path()?)
    }

    pub(crate) fn load_from(path: &Path) -> Option<Self> {
        let data = match fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "[Settings] no settings file");
                return None;
            }
        };
        let mut settings: Self = match serde_json::from_slice(&data) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "[Settings] unreadable settings file");
                return None;
            }
        };
        if settings.version != SETTINGS_VERSION {
            tracing::warn!(
                path = %path.display(),
                version = settings.version,
                "[Settings] unsupported settings version"
            );
            return None;
        }
        settings.sanitize();
        Some(settings)
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the settings file: `%APPDATA%\Hexer\settings.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub(crate) fn settings_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Hexer");
    p.push("settings.json");
    Some(p)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
