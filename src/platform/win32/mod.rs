// ── Win32 shell ───────────────────────────────────────────────────────────────
//
// The only place `unsafe` is allowed.  Each block carries a `// SAFETY:` note
// naming the invariant it relies on.

#![allow(unsafe_code)]

pub mod dialogs;
pub mod menu;
pub mod window;

/// `s` as a null-terminated UTF-16 buffer for `PCWSTR` parameters.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
