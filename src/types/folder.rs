use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::protection::Protected;

/// Color given to folders created without an explicit choice.
pub const DEFAULT_FOLDER_COLOR: &str = "#6C5CE7";

/// Icon given to folders created without an explicit choice.
pub const DEFAULT_FOLDER_ICON: &str = "folder";

/// A named, optionally password-protected container for links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    pub password_hash: Option<String>,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Creates a public folder with default presentation and both
    /// timestamps set to now.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            is_private: false,
            password_hash: None,
            color: DEFAULT_FOLDER_COLOR.to_string(),
            icon: DEFAULT_FOLDER_ICON.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the folder private under the given password hash.
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.is_private = true;
        self.password_hash = Some(hash.into());
        self
    }
}

impl Protected for Folder {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_private(&self) -> bool {
        self.is_private
    }

    fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
}
