// ── Win32 menu surface ────────────────────────────────────────────────────────
//
// `Win32Menu` lets `rfl::RecentFileList` render into a real popup menu.
// It wraps, but does not own, an `HMENU`: the menu belongs to the menu bar and
// is destroyed with the main window.  Failures are logged and swallowed; a
// broken menu item must never take down the message loop.

#![allow(unsafe_code)]

use windows::{
    core::PCWSTR,
    Win32::{
        Graphics::Gdi::HBITMAP,
        UI::WindowsAndMessaging::{
            AppendMenuW, DeleteMenu, GetMenuItemCount, IsMenu, LoadImageW, SetMenuItemInfoW,
            HMENU, IMAGE_BITMAP, LR_SHARED, MENUITEMINFOW, MF_BYPOSITION, MF_STRING, MIIM_BITMAP,
            OBM_CHECK,
        },
    },
};

use super::wide;
use crate::rfl::MenuSurface;

/// Non-owning handle to a popup menu used as the "Recent Files" surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Win32Menu {
    hmenu: HMENU,
}

impl Win32Menu {
    pub(crate) fn new(hmenu: HMENU) -> Self {
        Self { hmenu }
    }
}

impl MenuSurface for Win32Menu {
    type Icon = HBITMAP;

    fn is_valid(&self) -> bool {
        // SAFETY: IsMenu only inspects the handle value; any value is accepted.
        unsafe { IsMenu(self.hmenu) }.as_bool()
    }

    fn clear_items(&mut self) {
        while self.item_count() > 0 {
            // SAFETY: self.hmenu is a live menu (checked by `is_valid` before
            // the list binds to it) and position 0 exists while the count is
            // positive.
            if let Err(e) = unsafe { DeleteMenu(self.hmenu, 0, MF_BYPOSITION) } {
                tracing::warn!(error = %e, "[Menu] DeleteMenu failed");
                break;
            }
        }
    }

    fn append_item(&mut self, id: u32, label: &str) {
        let label = wide(label);
        // SAFETY: `label` is null-terminated UTF-16 and outlives the call;
        // AppendMenuW copies the string into the menu.
        let res = unsafe { AppendMenuW(self.hmenu, MF_STRING, id as usize, PCWSTR(label.as_ptr())) };
        if let Err(e) = res {
            tracing::warn!(id, error = %e, "[Menu] AppendMenuW failed");
        }
    }

    fn set_item_icon(&mut self, id: u32, icon: HBITMAP) {
        let mii = MENUITEMINFOW {
            cbSize: std::mem::size_of::<MENUITEMINFOW>() as u32,
            fMask: MIIM_BITMAP,
            hbmpItem: icon,
            ..Default::default()
        };
        // SAFETY: `mii` is fully initialised with cbSize set; the item is
        // addressed by command id (fByPosition = FALSE).  The menu does not
        // take ownership of the bitmap.
        let res = unsafe { SetMenuItemInfoW(self.hmenu, id, false, &mii) };
        if let Err(e) = res {
            tracing::warn!(id, error = %e, "[Menu] SetMenuItemInfoW failed");
        }
    }

    fn item_count(&self) -> usize {
        // SAFETY: see `is_valid`; GetMenuItemCount returns -1 for a bad handle.
        let n = unsafe { GetMenuItemCount(self.hmenu) };
        usize::try_from(n).unwrap_or(0)
    }
}

/// Load the bitmap shown next to device entries.
///
/// Uses a shared system bitmap so there is nothing to free.  `None` when the
/// load fails; device entries are then labelled but not decorated.
pub(crate) fn load_disk_bitmap() -> Option<HBITMAP> {
    // MAKEINTRESOURCE: small integer resource ids travel in the pointer value.
    let name = PCWSTR(OBM_CHECK as usize as *const u16);
    // SAFETY: a null instance selects the OEM system bitmaps; LR_SHARED makes
    // the system own the handle, so it is never passed to DeleteObject.
    match unsafe { LoadImageW(None, name, IMAGE_BITMAP, 0, 0, LR_SHARED) } {
        Ok(handle) => Some(HBITMAP(handle.0)),
        Err(e) => {
            tracing::warn!(error = %e, "[Menu] device bitmap unavailable");
            None
        }
    }
}
