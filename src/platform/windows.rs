// LinkSafe platform paths for Windows
// Data: %APPDATA%/LinkSafe

use std::env;
use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("LinkSafe")
}
