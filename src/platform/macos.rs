// LinkSafe platform paths for macOS
// Data: ~/Library/Application Support/LinkSafe

use std::env;
use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("LinkSafe")
}
