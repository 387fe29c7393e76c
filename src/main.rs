// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]
// Release builds run as a GUI application (no console window).
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// The neutral modules are tested everywhere but only the Win32 shell drives
// them, so other hosts see them as unused.
#[cfg_attr(not(windows), allow(dead_code))]
mod app;
#[cfg_attr(not(windows), allow(dead_code))]
mod doc;
#[cfg_attr(not(windows), allow(dead_code))]
mod error;
#[cfg(windows)]
mod platform;
#[cfg_attr(not(windows), allow(dead_code))]
mod rfl;
#[cfg_attr(not(windows), allow(dead_code))]
mod settings;

/// Install the global `tracing` subscriber.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .init();
}

#[cfg(windows)]
fn main() {
    init_logging();
    tracing::info!("Hexer starting");
    if let Err(e) = platform::win32::window::run() {
        // Startup failed before or during the message loop.
        tracing::error!(error = %e, "fatal error");
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
    tracing::info!("Hexer exited");
}

#[cfg(not(windows))]
fn main() {
    init_logging();
    tracing::error!("Hexer is a Windows application; this target has no user interface");
    std::process::exit(1);
}
