// LinkSafe platform paths for Linux
// Data: ~/.local/share/linksafe

use std::env;
use std::path::PathBuf;

/// Uses `$XDG_DATA_HOME/linksafe` if set, otherwise `~/.local/share/linksafe`.
pub fn data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("linksafe"),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            PathBuf::from(home).join(".local").join("share").join("linksafe")
        }
    }
}
