// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by `WindowState` for the
// lifetime of the main window.  All mutations happen on the UI thread; there
// is no global mutable state.  `App` is generic over the menu surface so the
// whole open / recent / close flow runs in tests without Win32.

use crate::{
    doc::{is_device_namespace, DataOpen, HexerDoc, OpenMode},
    error::{HexerError, Result},
    rfl::{MenuSurface, RecentFileList},
    settings::AppSettings,
};

// ── Data sources ──────────────────────────────────────────────────────────────

/// Something that can open the resource described by a `DataOpen`.
///
/// Returns the size of the opened data in bytes.  Reading or mapping the data
/// itself is the hex view's business, not the document layer's.
pub(crate) trait DataSource {
    fn open(&mut self, dos: &DataOpen) -> Result<u64>;
}

/// Checks that a resource is reachable without reading it.
///
/// * Files must exist and be regular files.
/// * Devices must use the Win32 device namespace (`\\.\`).
/// * Processes need a non-zero id.
#[derive(Debug, Default)]
pub(crate) struct LocalSource;

impl DataSource for LocalSource {
    fn open(&mut self, dos: &DataOpen) -> Result<u64> {
        let refuse = |reason: &str| HexerError::Open {
            path: dos.path.clone(),
            reason: reason.to_owned(),
        };
        match dos.mode {
            OpenMode::File => {
                let meta = std::fs::metadata(&dos.path)?;
                if !meta.is_file() {
                    return Err(refuse("not a regular file"));
                }
                Ok(meta.len())
            }
            OpenMode::Device if is_device_namespace(&dos.path) => Ok(0),
            OpenMode::Device => Err(refuse("not a device path")),
            OpenMode::Process if dos.proc_id != 0 => Ok(0),
            OpenMode::Process => Err(refuse("missing process id")),
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Passed by mutable reference through WndProc handlers so that all
/// application logic sees a single, explicit state root rather than a
/// collection of disconnected globals.
pub(crate) struct App<S: MenuSurface> {
    pub(crate) settings: AppSettings,
    /// Mirrors `settings`' recent-file store into the "Recent Files" menu.
    pub(crate) rfl: RecentFileList<S>,
    /// Open documents, oldest first.
    pub(crate) docs: Vec<HexerDoc>,
}

impl<S: MenuSurface> App<S> {
    pub(crate) fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            rfl: RecentFileList::new(),
            docs: Vec::new(),
        }
    }

    /// Bind the recent-file list to `surface`.
    ///
    /// A refused configuration is logged; the app keeps running without a
    /// working recent-file menu.
    pub(crate) fn attach_recent_menu(
        &mut self,
        surface: S,
        first_id: u32,
        disk_icon: Option<S::Icon>,
    ) -> bool {
        let store = self.settings.recent_store();
        let capacity = self.settings.rfl_capacity;
        match self
            .rfl
            .initialize(surface, first_id, disk_icon, store, capacity)
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "[App] recent file menu unavailable");
                false
            }
        }
    }

    /// Open `dos` through `source` and register the new document.
    ///
    /// A resource that is already open is not opened again: the index of the
    /// existing document is returned and nothing is recorded.
    ///
    /// A failed open also drops the path from the recent-file list, so dead
    /// entries do not linger in the menu.  Processes are never added to the
    /// recent-file list (their ids do not survive a restart).
    pub(crate) fn open(&mut self, dos: &DataOpen, source: &mut impl DataSource) -> Result<usize> {
        let unique_name = dos.unique_name();
        if let Some(idx) = self.docs.iter().position(|d| d.unique_name == unique_name) {
            tracing::debug!(name = %unique_name, "[App] already open");
            return Ok(idx);
        }

        let data_size = match source.open(dos) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(path = %dos.path, mode = dos.mode.name(), error = %e, "[App] open failed");
                self.rfl.remove_entry(&dos.path);
                return Err(e);
            }
        };

        if dos.mode != OpenMode::Process {
            self.rfl.add_entry(&dos.path);
        }
        self.settings.lol_add(dos);

        let doc = HexerDoc::new(dos, data_size);
        tracing::info!(
            name = %doc.unique_name,
            mode = doc.open_mode.name(),
            bytes = doc.data_size,
            "[App] opened"
        );
        self.docs.push(doc);
        Ok(self.docs.len() - 1)
    }

    /// Re-open the entry behind recent-file menu id `slot_id`.
    ///
    /// `None` means the id is not a recent-file slot; the caller does nothing.
    pub(crate) fn open_recent(
        &mut self,
        slot_id: u32,
        source: &mut impl DataSource,
    ) -> Option<Result<usize>> {
        let path = self.rfl.resolve_path(slot_id)?;
        Some(self.open(&DataOpen::from_recent(&path), source))
    }

    /// Re-open whatever was open at the end of the previous session, if the
    /// user asked for that.  Records that fail to open are forgotten, and so
    /// are process records: a process id from another session names some
    /// other process, if any.  Returns the number of documents opened.
    pub(crate) fn restore_last_opened(&mut self, source: &mut impl DataSource) -> usize {
        if !self.settings.restore_last_opened {
            return 0;
        }
        let pending = std::mem::take(&mut self.settings.last_opened);
        let mut opened = 0;
        for dos in pending.iter().filter(|d| d.mode != OpenMode::Process) {
            if self.open(dos, source).is_ok() {
                opened += 1;
            }
        }
        opened
    }

    /// Close the document at `index` at the user's request.
    pub(crate) fn close(&mut self, index: usize) {
        if index >= self.docs.len() {
            return;
        }
        let doc = self.docs.remove(index);
        tracing::info!("{}", doc.close_notice());
        self.settings.lol_remove(&doc.data_path, doc.proc_id);
    }

    /// Drop every document on application exit.
    ///
    /// Unlike `close`, this keeps the last-opened list intact for the next
    /// session.
    pub(crate) fn close_all_for_exit(&mut self) {
        self.docs.clear();
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No documents | `"Hexer"` |
    /// | Documents open | `"<title of newest> - Hexer"` |
    pub(crate) fn window_title(&self) -> String {
        match self.docs.last() {
            None => "Hexer".to_owned(),
            Some(doc) if doc.title.is_empty() => format!("{} - Hexer", doc.unique_name),
            Some(doc) => format!("{} - Hexer", doc.title),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
