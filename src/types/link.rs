use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::protection::Protected;

/// A stored URL with display metadata.
///
/// `folder_id == None` places the link at the root collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub folder_id: Option<String>,
    pub is_private: bool,
    pub password_hash: Option<String>,
    pub favicon: Option<String>,
    pub preview_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a public root-level link with empty metadata and both
    /// timestamps set to now. Title and URL are stored as given; the
    /// library normalizes them on add.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: String::new(),
            url: url.into(),
            description: String::new(),
            folder_id: None,
            is_private: false,
            password_hash: None,
            favicon: None,
            preview_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Marks the link private under the given password hash.
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.is_private = true;
        self.password_hash = Some(hash.into());
        self
    }
}

impl Protected for Link {
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

/// Metadata returned by the external preview fetcher.
///
/// Every field may be absent; a failed fetch is simply an empty preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPreview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub site_name: Option<String>,
}
