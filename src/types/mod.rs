// LinkSafe shared type definitions
// Each submodule defines types used across the library, the repository and the RPC surface.

pub mod envelope;
pub mod errors;
pub mod folder;
pub mod link;
pub mod protection;
pub mod settings;

pub use folder::Folder;
pub use link::{Link, LinkPreview};
pub use protection::Protected;
pub use settings::AppSettings;
