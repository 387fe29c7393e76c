// ── Menu surface contract ─────────────────────────────────────────────────────
//
// The recent-file list never touches an OS menu directly.  It renders into
// anything implementing `MenuSurface`: a Win32 `HMENU` wrapper on Windows
// (`platform::win32::menu::Win32Menu`) or an in-memory double in tests.
// The surface is owned by the host; the list keeps only a handle to it and
// never creates or destroys the underlying menu.

/// A host-owned, menu-like UI element the recent-file list mirrors itself into.
///
/// Implementations report their own failures (log, ignore); the list treats
/// every call as infallible so that rendering can never interrupt the host's
/// event loop.
pub(crate) trait MenuSurface {
    /// Opaque icon token attached to device entries (`HBITMAP` on Win32).
    type Icon: Copy;

    /// Whether the underlying handle refers to a live menu.
    fn is_valid(&self) -> bool;

    /// Remove every item currently on the surface.
    fn clear_items(&mut self);

    /// Append a plain text item with command id `id`.
    fn append_item(&mut self, id: u32, label: &str);

    /// Attach `icon` to the item whose command id is `id`.
    fn set_item_icon(&mut self, id: u32, icon: Self::Icon);

    /// Number of items currently on the surface.
    fn item_count(&self) -> usize;
}

// ── Test double ───────────────────────────────────────────────────────────────
