// LinkSafe platform abstraction
// Resolves the per-user data directory the store lives in.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific data directory for LinkSafe.
///
/// - **Linux**: `~/.local/share/linksafe` (or `$XDG_DATA_HOME/linksafe`)
/// - **macOS**: `~/Library/Application Support/LinkSafe`
/// - **Windows**: `%APPDATA%/LinkSafe`
/// - anything else: `./linksafe-data`
pub fn data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::data_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("linksafe-data")
    }
}
