// ── Recent file list ──────────────────────────────────────────────────────────
//
// Ordered, deduplicated, capacity-bounded history of opened resources, most
// recent first, mirrored into a host-owned menu.  The entry at position `i`
// always sits on the menu under command id `first_id + i`, so a menu click can
// be mapped straight back to a path.
//
// The backing store is shared with `AppSettings` (which persists it); this
// module mutates it in place and never keeps a copy.  No `unsafe`, no Win32.

pub(crate) mod surface;

use std::{cell::RefCell, rc::Rc};

pub(crate) use surface::MenuSurface;

/// The shared, host-owned list of recent entries.
///
/// `Rc<RefCell<…>>` is `!Send`: the list is pinned to the UI thread.
pub(crate) type RecentStore = Rc<RefCell<Vec<String>>>;

/// Why `RecentFileList::initialize` refused its configuration.
///
/// Hosts log this and carry on; the list stays uninitialized and every
/// subsequent call on it is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RflError {
    #[error("recent file list is already initialized")]
    AlreadyInitialized,
    #[error("invalid recent file list configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Returns `true` for entries that name a device rather than a file
/// (`\\.\PhysicalDrive0`, `\\?\Volume{…}`).
pub(crate) fn is_device_path(path: &str) -> bool {
    path.starts_with(r"\\")
}

/// Menu label for the entry at zero-based `index`.
fn menu_label(index: usize, path: &str, device: bool) -> String {
    if device {
        format!("{} Device: {path}", index + 1)
    } else {
        format!("{} {path}", index + 1)
    }
}

/// Configuration captured by a successful `initialize`.
struct Bound<S: MenuSurface> {
    surface: S,
    first_id: u32,
    disk_icon: Option<S::Icon>,
    store: RecentStore,
    capacity: usize,
}

/// Recently-opened list bound to a menu surface.
///
/// Two states: uninitialized (after `new`) and initialized (after a successful
/// `initialize`, terminal).  While uninitialized every operation is a no-op.
pub(crate) struct RecentFileList<S: MenuSurface> {
    bound: Option<Bound<S>>,
    device_rule: fn(&str) -> bool,
}

impl<S: MenuSurface> Default for RecentFileList<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MenuSurface> RecentFileList<S> {
    /// An uninitialized list using `is_device_path` to flag device entries.
    pub(crate) fn new() -> Self {
        Self {
            bound: None,
            device_rule: is_device_path,
        }
    }

    /// Replace the rule deciding which entries render as devices.
    #[cfg(test)]
    pub(crate) fn with_device_rule(mut self, rule: fn(&str) -> bool) -> Self {
        self.device_rule = rule;
        self
    }

    /// Bind the list to `surface` and `store` and render the store's current
    /// contents.
    ///
    /// On error nothing is stored and neither the surface nor the store is
    /// touched.
    pub(crate) fn initialize(
        &mut self,
        surface: S,
        first_id: u32,
        disk_icon: Option<S::Icon>,
        store: RecentStore,
        capacity: usize,
    ) -> Result<(), RflError> {
        if self.bound.is_some() {
            return Err(RflError::AlreadyInitialized);
        }
        if !surface.is_valid() {
            return Err(RflError::InvalidConfiguration("menu surface is not a valid menu"));
        }
        if capacity == 0 {
            return Err(RflError::InvalidConfiguration("capacity must be positive"));
        }
        // Every slot id must be representable.
        let fits = u32::try_from(capacity)
            .ok()
            .and_then(|cap| first_id.checked_add(cap - 1))
            .is_some();
        if !fits {
            return Err(RflError::InvalidConfiguration("slot id range overflows u32"));
        }

        self.bound = Some(Bound {
            surface,
            first_id,
            disk_icon,
            store,
            capacity,
        });
        tracing::debug!(first_id, capacity, "[RFL] initialized");
        self.render();
        Ok(())
    }

    /// The surface the list renders into, if initialized.
    #[cfg(test)]
    pub(crate) fn surface(&self) -> Option<&S> {
        self.bound.as_ref().map(|b| &b.surface)
    }

    /// Record `path` as the most recently opened entry.
    ///
    /// Any existing copy is removed, `path` goes to the front, and the oldest
    /// entries beyond capacity are dropped.  The menu is then rebuilt.
    pub(crate) fn add_entry(&mut self, path: &str) {
        let Some(bound) = self.bound.as_ref() else {
            return;
        };
        {
            let Ok(mut entries) = bound.store.try_borrow_mut() else {
                tracing::warn!("[RFL] store is borrowed elsewhere; entry not recorded");
                return;
            };
            entries.retain(|e| e != path);
            entries.insert(0, path.to_owned());
            entries.truncate(bound.capacity);
        }
        tracing::debug!(path, "[RFL] entry added");
        self.render();
    }

    /// Drop every entry equal to `path`.  Returns whether anything was removed.
    pub(crate) fn remove_entry(&mut self, path: &str) -> bool {
        let Some(bound) = self.bound.as_ref() else {
            return false;
        };
        let removed = {
            let Ok(mut entries) = bound.store.try_borrow_mut() else {
                tracing::warn!("[RFL] store is borrowed elsewhere; entry not removed");
                return false;
            };
            let before = entries.len();
            entries.retain(|e| e != path);
            entries.len() != before
        };
        if removed {
            tracing::debug!(path, "[RFL] entry removed");
            self.render();
        }
        removed
    }

    /// The entry shown under menu id `slot_id`, or `None` when the id is
    /// outside the list (or the list is uninitialized).  Callers treat `None`
    /// as "do nothing".
    pub(crate) fn resolve_path(&self, slot_id: u32) -> Option<String> {
        let bound = self.bound.as_ref()?;
        let index = usize::try_from(slot_id.checked_sub(bound.first_id)?).ok()?;
        // Slots past capacity are never rendered, even if the store is longer.
        if index >= bound.capacity {
            return None;
        }
        let entries = bound.store.try_borrow().ok()?;
        entries.get(index).cloned()
    }

    /// Clear the surface and append one item per entry, at most `capacity`.
    fn render(&mut self) {
        let device_rule = self.device_rule;
        let Some(bound) = self.bound.as_mut() else {
            return;
        };
        let Ok(entries) = bound.store.try_borrow() else {
            tracing::warn!("[RFL] store is borrowed elsewhere; menu not rebuilt");
            return;
        };

        bound.surface.clear_items();
        // `initialize` checked that first_id + capacity - 1 fits in u32.
        for (index, path) in entries.iter().take(bound.capacity).enumerate() {
            let device = device_rule(path);
            let id = bound.first_id + index as u32;
            bound.surface.append_item(id, &menu_label(index, path, device));
            if let (true, Some(icon)) = (device, bound.disk_icon) {
                bound.surface.set_item_icon(id, icon);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::surface::test_menu::{Item, TestMenu};
    use super::*;

    const FIRST: u32 = 100;
    const DISK: u8 = 7;

    fn store(items: &[&str]) -> RecentStore {
        Rc::new(RefCell::new(items.iter().map(|s| (*s).to_owned()).collect()))
    }

    fn list_with(items: &[&str], capacity: usize) -> (RecentFileList<TestMenu>, RecentStore) {
        let s = store(items);
        let mut rfl = RecentFileList::new();
        rfl.initialize(TestMenu::new(), FIRST, Some(DISK), Rc::clone(&s), capacity)
            .expect("valid configuration");
        (rfl, s)
    }

    fn menu(rfl: &RecentFileList<TestMenu>) -> &TestMenu {
        rfl.surface().expect("initialized")
    }

    #[test]
    fn walkthrough_capacity_three() {
        let (mut rfl, s) = list_with(&[], 3);
        rfl.add_entry(r"C:\a.txt");
        assert_eq!(*s.borrow(), [r"C:\a.txt"]);
        rfl.add_entry(r"C:\b.txt");
        assert_eq!(*s.borrow(), [r"C:\b.txt", r"C:\a.txt"]);
        rfl.add_entry(r"C:\a.txt");
        assert_eq!(*s.borrow(), [r"C:\a.txt", r"C:\b.txt"]);
        rfl.add_entry(r"C:\c.txt");
        rfl.add_entry(r"C:\d.txt");
        assert_eq!(*s.borrow(), [r"C:\d.txt", r"C:\c.txt", r"C:\a.txt"]);
        assert_eq!(rfl.resolve_path(101).as_deref(), Some(r"C:\c.txt"));
        assert_eq!(rfl.resolve_path(103), None);
    }

    #[test]
    fn re_adding_promotes_without_duplicating() {
        let (mut rfl, s) = list_with(&["x", "y", "z", "w"], 10);
        rfl.add_entry("z");
        assert_eq!(*s.borrow(), ["z", "x", "y", "w"]);
        rfl.add_entry("z");
        assert_eq!(*s.borrow(), ["z", "x", "y", "w"]);
    }

    #[test]
    fn adding_collapses_preexisting_duplicates() {
        // A hand-edited settings file may carry duplicates.
        let (mut rfl, s) = list_with(&["a", "b", "a"], 5);
        rfl.add_entry("a");
        assert_eq!(*s.borrow(), ["a", "b"]);
    }

    #[test]
    fn size_never_exceeds_capacity_and_tail_is_evicted() {
        let (mut rfl, s) = list_with(&[], 4);
        for i in 0..20 {
            rfl.add_entry(&format!("f{i}"));
            assert!(s.borrow().len() <= 4);
        }
        assert_eq!(*s.borrow(), ["f19", "f18", "f17", "f16"]);
        assert_eq!(menu(&rfl).item_count(), 4);
    }

    #[test]
    fn every_slot_resolves_to_its_entry() {
        let (rfl, s) = list_with(&["a", "b", "c"], 5);
        for (i, e) in s.borrow().iter().enumerate() {
            assert_eq!(rfl.resolve_path(FIRST + i as u32).as_ref(), Some(e));
        }
        assert_eq!(menu(&rfl).ids(), [100, 101, 102]);
    }

    #[test]
    fn ids_outside_the_list_resolve_to_none() {
        let (rfl, _) = list_with(&["a", "b"], 5);
        assert_eq!(rfl.resolve_path(FIRST - 1), None);
        assert_eq!(rfl.resolve_path(FIRST + 2), None);
        assert_eq!(rfl.resolve_path(0), None);
        assert_eq!(rfl.resolve_path(u32::MAX), None);
        assert_eq!(rfl.resolve_path(FIRST + 1).as_deref(), Some("b"));
    }

    #[test]
    fn labels_are_numbered_and_devices_get_icon() {
        let (rfl, _) = list_with(&[r"C:\data\dump.bin", r"\\.\PhysicalDrive0"], 5);
        assert_eq!(
            menu(&rfl).items,
            [
                Item {
                    id: 100,
                    label: r"1 C:\data\dump.bin".to_owned(),
                    icon: None,
                },
                Item {
                    id: 101,
                    label: r"2 Device: \\.\PhysicalDrive0".to_owned(),
                    icon: Some(DISK),
                },
            ]
        );
    }

    #[test]
    fn device_without_configured_icon_still_labelled() {
        let s = store(&[r"\\?\Volume{1}"]);
        let mut rfl = RecentFileList::new();
        rfl.initialize(TestMenu::new(), FIRST, None, s, 3).expect("valid");
        let item = &menu(&rfl).items[0];
        assert_eq!(item.label, r"1 Device: \\?\Volume{1}");
        assert_eq!(item.icon, None);
    }

    #[test]
    fn render_is_idempotent() {
        let (mut rfl, _) = list_with(&["a", r"\\.\d"], 5);
        let first = menu(&rfl).items.clone();
        rfl.render();
        rfl.render();
        assert_eq!(menu(&rfl).items, first);
        assert_eq!(menu(&rfl).clears, 3);
    }

    #[test]
    fn render_bounds_an_oversized_store() {
        let (rfl, s) = list_with(&["a", "b", "c", "d"], 2);
        // Initialize never rewrites the store; only the menu is bounded.
        assert_eq!(s.borrow().len(), 4);
        assert_eq!(menu(&rfl).labels(), ["1 a", "2 b"]);
        assert_eq!(rfl.resolve_path(FIRST + 2), None);
    }

    #[test]
    fn initialize_renders_existing_store() {
        let (rfl, _) = list_with(&["one"], 3);
        let m = menu(&rfl);
        assert_eq!(m.clears, 1);
        assert_eq!(m.labels(), ["1 one"]);
    }

    #[test]
    fn render_replaces_stale_items() {
        let s = store(&["fresh"]);
        let mut stale = TestMenu::new();
        stale.append_item(1, "left over");
        let mut rfl = RecentFileList::new();
        rfl.initialize(stale, FIRST, None, s, 3).expect("valid");
        assert_eq!(menu(&rfl).labels(), ["1 fresh"]);
    }

    #[test]
    fn uninitialized_list_is_inert() {
        let s = store(&["a"]);
        let mut rfl: RecentFileList<TestMenu> = RecentFileList::new();
        rfl.add_entry("b");
        assert!(!rfl.remove_entry("a"));
        rfl.render();
        assert_eq!(rfl.resolve_path(FIRST), None);
        assert!(rfl.surface().is_none());
        assert_eq!(*s.borrow(), ["a"]);
    }

    #[test]
    fn invalid_surface_leaves_list_uninitialized() {
        let s = store(&["a"]);
        let mut rfl = RecentFileList::new();
        let err = rfl
            .initialize(TestMenu::invalid(), FIRST, None, Rc::clone(&s), 3)
            .unwrap_err();
        assert!(matches!(err, RflError::InvalidConfiguration(_)));
        assert!(rfl.surface().is_none());
        rfl.add_entry("b");
        assert_eq!(*s.borrow(), ["a"]);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut rfl = RecentFileList::new();
        let err = rfl
            .initialize(TestMenu::new(), FIRST, None, store(&[]), 0)
            .unwrap_err();
        assert_eq!(err, RflError::InvalidConfiguration("capacity must be positive"));
        assert!(rfl.surface().is_none());
    }

    #[test]
    fn slot_range_overflow_is_rejected() {
        let mut rfl = RecentFileList::new();
        let err = rfl
            .initialize(TestMenu::new(), u32::MAX - 1, None, store(&[]), 3)
            .unwrap_err();
        assert!(matches!(err, RflError::InvalidConfiguration(_)));
    }

    #[test]
    fn second_initialize_is_rejected() {
        let (mut rfl, s) = list_with(&["a"], 3);
        let err = rfl
            .initialize(TestMenu::new(), 500, None, store(&["z"]), 9)
            .unwrap_err();
        assert_eq!(err, RflError::AlreadyInitialized);
        assert_eq!(rfl.resolve_path(FIRST).as_deref(), Some("a"));
        assert_eq!(rfl.resolve_path(500), None);
        assert_eq!(menu(&rfl).labels(), ["1 a"]);
        assert_eq!(*s.borrow(), ["a"]);
    }

    #[test]
    fn remove_entry_rebuilds_menu() {
        let (mut rfl, s) = list_with(&["a", "b", "c"], 5);
        assert!(rfl.remove_entry("b"));
        assert_eq!(*s.borrow(), ["a", "c"]);
        assert_eq!(menu(&rfl).labels(), ["1 a", "2 c"]);
        assert_eq!(rfl.resolve_path(FIRST + 1).as_deref(), Some("c"));
        let clears = menu(&rfl).clears;
        assert!(!rfl.remove_entry("missing"));
        assert_eq!(menu(&rfl).clears, clears);
    }

    #[test]
    fn custom_device_rule_is_used() {
        let s = store(&["disk:0", r"\\.\PhysicalDrive0"]);
        let mut rfl = RecentFileList::new().with_device_rule(|p| p.starts_with("disk:"));
        rfl.initialize(TestMenu::new(), FIRST, Some(DISK), s, 3).expect("valid");
        assert_eq!(menu(&rfl).labels(), ["1 Device: disk:0", r"2 \\.\PhysicalDrive0"]);
    }

    #[test]
    fn busy_store_does_not_panic() {
        let (mut rfl, s) = list_with(&["a"], 3);
        let guard = s.borrow_mut();
        rfl.add_entry("b");
        assert_eq!(rfl.resolve_path(FIRST), None);
        drop(guard);
        assert_eq!(*s.borrow(), ["a"]);
    }

    #[test]
    fn device_predicate() {
        assert!(is_device_path(r"\\.\PhysicalDrive1"));
        assert!(is_device_path(r"\\server\share"));
        assert!(!is_device_path(r"C:\\file"));
        assert!(!is_device_path(r"\single"));
        assert!(!is_device_path(""));
    }
}
