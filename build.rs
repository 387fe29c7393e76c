/// Hexer build script.
///
/// The Win32 shell only exists on Windows.  Other targets still build the
/// platform-neutral document layer (and run its tests), so warn instead of
/// failing.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        println!(
            "cargo:warning=Hexer's user interface is Windows-only \
             (CARGO_CFG_TARGET_OS = {target_os:?}); building without it"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
