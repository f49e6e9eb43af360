use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::folder::Folder;
use super::link::Link;

/// User preferences persisted unencrypted next to the collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sort_by: SortBy::UpdatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Field used to order folders and links in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    UpdatedAt,
    CreatedAt,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl AppSettings {
    /// Sorts folders in place. `Name` compares case-insensitively.
    pub fn sort_folders(&self, folders: &mut [Folder]) {
        folders.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            };
            self.sort_order.apply(ordering)
        });
    }

    /// Sorts links in place. `Name` orders by title, case-insensitively.
    pub fn sort_links(&self, links: &mut [Link]) {
        links.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                SortBy::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            };
            self.sort_order.apply(ordering)
        });
    }
}
