// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The rest of the codebase talks to the OS only through this module.  No
// `unsafe` lives here; all Win32 FFI is confined to the `win32` sub-module and
// never leaks outward.  Compiled on Windows targets only.

pub mod win32;
