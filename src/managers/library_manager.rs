//! Library Manager for LinkSafe.
//!
//! Implements `LibraryManagerTrait`: CRUD over folders and links on top of
//! the whole-collection [`ObjectStore`]. Each operation loads the affected
//! collection, mutates it in memory and writes it back in full.
//!
//! Mutating operations take `&mut self`, so one manager admits a single
//! writer at a time; callers sharing it across threads wrap it in a mutex.
//! Deleting a folder writes two collections in sequence. If the process
//! dies between the writes the folder is gone while its links remain with
//! a dangling `folder_id`; deleting the same folder id again removes them.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use crate::database::kv_store::KeyValueStore;
use crate::managers::object_store::ObjectStore;
use crate::services::url_service::{domain_title, extract_url_from_text, normalize_url};
use crate::types::errors::{LibraryError, ValidationError};
use crate::types::folder::Folder;
use crate::types::link::{Link, LinkPreview};
use crate::types::protection::Protected;
use crate::types::settings::AppSettings;

/// Outcome of a folder deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRemoval {
    /// Whether a folder with the id existed.
    pub folder_removed: bool,
    /// Ids of the links removed along with it.
    pub removed_link_ids: Vec<String>,
}

/// Counts shown on the settings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub folders: usize,
    pub links: usize,
    pub root_links: usize,
    pub private_items: usize,
    pub links_per_folder: BTreeMap<String, usize>,
}

/// Trait defining folder and link operations.
pub trait LibraryManagerTrait {
    fn load_folders(&self) -> Result<Vec<Folder>, LibraryError>;
    fn load_links(&self) -> Result<Vec<Link>, LibraryError>;
    fn get_folder(&self, id: &str) -> Result<Option<Folder>, LibraryError>;
    fn get_link(&self, id: &str) -> Result<Option<Link>, LibraryError>;
    fn add_folder(&mut self, folder: Folder) -> Result<Folder, LibraryError>;
    /// Returns `None` when no folder has the id; nothing is written then.
    fn update_folder(&mut self, folder: Folder) -> Result<Option<Folder>, LibraryError>;
    fn delete_folder(&mut self, folder_id: &str) -> Result<FolderRemoval, LibraryError>;
    fn add_link(&mut self, link: Link) -> Result<Link, LibraryError>;
    /// Returns `None` when no link has the id; nothing is written then.
    fn update_link(&mut self, link: Link) -> Result<Option<Link>, LibraryError>;
    fn delete_link(&mut self, link_id: &str) -> Result<bool, LibraryError>;
    /// Links whose `folder_id` equals `folder_id`; `None` selects root links.
    fn get_links_by_folder(&self, folder_id: Option<&str>) -> Result<Vec<Link>, LibraryError>;
    fn apply_link_preview(
        &mut self,
        link_id: &str,
        preview: &LinkPreview,
    ) -> Result<Option<Link>, LibraryError>;
    fn ingest_shared_texts(&mut self, texts: &[String]) -> Result<Vec<Link>, LibraryError>;
    fn stats(&self) -> Result<LibraryStats, LibraryError>;
}

/// Folder and link repository over an object store.
pub struct LibraryManager<S: KeyValueStore> {
    store: ObjectStore<S>,
}

impl<S: KeyValueStore> LibraryManager<S> {
    pub fn new(store: ObjectStore<S>) -> Self {
        Self { store }
    }

    pub fn object_store(&self) -> &ObjectStore<S> {
        &self.store
    }

    pub fn load_settings(&self) -> Result<AppSettings, LibraryError> {
        Ok(self.store.load_settings()?)
    }

    pub fn save_settings(&mut self, settings: &AppSettings) -> Result<(), LibraryError> {
        Ok(self.store.save_settings(settings)?)
    }

    /// Erases every folder, link and setting.
    pub fn clear_all(&mut self) -> Result<(), LibraryError> {
        Ok(self.store.clear_all()?)
    }

    /// Trims the name and checks the protection invariant.
    fn prepare_folder(mut folder: Folder) -> Result<Folder, ValidationError> {
        folder.name = folder.name.trim().to_string();
        if folder.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        folder.check_protection()?;
        Ok(folder)
    }

    /// Normalizes the URL, defaults the title to the domain, trims the
    /// description and checks the protection invariant.
    fn prepare_link(mut link: Link) -> Result<Link, ValidationError> {
        link.url = normalize_url(&link.url)?;
        link.title = link.title.trim().to_string();
        if link.title.is_empty() {
            link.title = domain_title(&link.url);
        }
        link.description = link.description.trim().to_string();
        link.check_protection()?;
        Ok(link)
    }
}

impl<S: KeyValueStore> LibraryManagerTrait for LibraryManager<S> {
    fn load_folders(&self) -> Result<Vec<Folder>, LibraryError> {
        Ok(self.store.load_folders()?)
    }

    fn load_links(&self) -> Result<Vec<Link>, LibraryError> {
        Ok(self.store.load_links()?)
    }

    fn get_folder(&self, id: &str) -> Result<Option<Folder>, LibraryError> {
        Ok(self.load_folders()?.into_iter().find(|f| f.id == id))
    }

    fn get_link(&self, id: &str) -> Result<Option<Link>, LibraryError> {
        Ok(self.load_links()?.into_iter().find(|l| l.id == id))
    }

    /// Appends a folder. The caller supplies a unique id.
    fn add_folder(&mut self, folder: Folder) -> Result<Folder, LibraryError> {
        let folder = Self::prepare_folder(folder)?;

        let mut folders = self.store.load_folders()?;
        folders.push(folder.clone());
        self.store.save_folders(&folders)?;

        info!("event=folder_add module=library status=ok id={}", folder.id);
        Ok(folder)
    }

    /// Replaces the folder with the same id, keeping its `created_at` and
    /// stamping `updated_at` with the current time.
    fn update_folder(&mut self, folder: Folder) -> Result<Option<Folder>, LibraryError> {
        let mut folder = Self::prepare_folder(folder)?;

        let mut folders = self.store.load_folders()?;
        let Some(slot) = folders.iter_mut().find(|f| f.id == folder.id) else {
            debug!("event=folder_update module=library status=noop id={}", folder.id);
            return Ok(None);
        };

        folder.created_at = slot.created_at;
        folder.updated_at = Utc::now();
        *slot = folder.clone();
        self.store.save_folders(&folders)?;

        info!("event=folder_update module=library status=ok id={}", folder.id);
        Ok(Some(folder))
    }

    /// Removes the folder, then every link that points at it.
    fn delete_folder(&mut self, folder_id: &str) -> Result<FolderRemoval, LibraryError> {
        let mut folders = self.store.load_folders()?;
        let before = folders.len();
        folders.retain(|f| f.id != folder_id);
        let folder_removed = folders.len() != before;
        if folder_removed {
            self.store.save_folders(&folders)?;
        }

        let links = self.store.load_links()?;
        let (removed, kept): (Vec<Link>, Vec<Link>) = links
            .into_iter()
            .partition(|l| l.folder_id.as_deref() == Some(folder_id));
        if !removed.is_empty() {
            self.store.save_links(&kept)?;
        }

        let removed_link_ids: Vec<String> = removed.into_iter().map(|l| l.id).collect();
        info!(
            "event=folder_delete module=library status=ok id={} folder_removed={} links_removed={}",
            folder_id,
            folder_removed,
            removed_link_ids.len()
        );
        Ok(FolderRemoval {
            folder_removed,
            removed_link_ids,
        })
    }

    /// Appends a link after normalizing it. The caller supplies a unique id.
    fn add_link(&mut self, link: Link) -> Result<Link, LibraryError> {
        let link = Self::prepare_link(link)?;

        let mut links = self.store.load_links()?;
        links.push(link.clone());
        self.store.save_links(&links)?;

        info!("event=link_add module=library status=ok id={}", link.id);
        Ok(link)
    }

    fn update_link(&mut self, link: Link) -> Result<Option<Link>, LibraryError> {
        let mut link = Self::prepare_link(link)?;

        let mut links = self.store.load_links()?;
        let Some(slot) = links.iter_mut().find(|l| l.id == link.id) else {
            debug!("event=link_update module=library status=noop id={}", link.id);
            return Ok(None);
        };

        link.created_at = slot.created_at;
        link.updated_at = Utc::now();
        *slot = link.clone();
        self.store.save_links(&links)?;

        info!("event=link_update module=library status=ok id={}", link.id);
        Ok(Some(link))
    }

    fn delete_link(&mut self, link_id: &str) -> Result<bool, LibraryError> {
        let mut links = self.store.load_links()?;
        let before = links.len();
        links.retain(|l| l.id != link_id);
        if links.len() == before {
            debug!("event=link_delete module=library status=noop id={}", link_id);
            return Ok(false);
        }

        self.store.save_links(&links)?;
        info!("event=link_delete module=library status=ok id={}", link_id);
        Ok(true)
    }

    fn get_links_by_folder(&self, folder_id: Option<&str>) -> Result<Vec<Link>, LibraryError> {
        Ok(self
            .load_links()?
            .into_iter()
            .filter(|l| l.folder_id.as_deref() == folder_id)
            .collect())
    }

    /// Merges a fetched preview into a stored link. Only fields present in
    /// the preview overwrite the link; a link deleted while the fetch was
    /// in flight is left alone.
    fn apply_link_preview(
        &mut self,
        link_id: &str,
        preview: &LinkPreview,
    ) -> Result<Option<Link>, LibraryError> {
        let mut links = self.store.load_links()?;
        let Some(link) = links.iter_mut().find(|l| l.id == link_id) else {
            debug!("event=link_preview module=library status=noop id={}", link_id);
            return Ok(None);
        };

        if let Some(title) = preview.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            link.title = title.to_string();
        }
        if let Some(image) = &preview.image {
            link.preview_image = Some(image.clone());
        }
        if let Some(favicon) = &preview.favicon {
            link.favicon = Some(favicon.clone());
        }
        link.updated_at = Utc::now();
        let updated = link.clone();

        self.store.save_links(&links)?;
        info!("event=link_preview module=library status=ok id={}", link_id);
        Ok(Some(updated))
    }

    /// Saves URLs handed over by share intents as public root-level links.
    ///
    /// Each text contributes its first http(s) URL, or the whole text when
    /// it has none. Invalid URLs and URLs already stored or already seen in
    /// the batch are skipped. All new links go out in one write.
    fn ingest_shared_texts(&mut self, texts: &[String]) -> Result<Vec<Link>, LibraryError> {
        let mut links = self.store.load_links()?;
        let mut known: HashSet<String> = links.iter().map(|l| l.url.clone()).collect();
        let mut created = Vec::new();

        for text in texts {
            let candidate = extract_url_from_text(text).unwrap_or_else(|| text.trim().to_string());
            let url = match normalize_url(&candidate) {
                Ok(url) => url,
                Err(err) => {
                    debug!("event=share_ingest module=library status=skipped reason={}", err);
                    continue;
                }
            };
            if !known.insert(url.clone()) {
                debug!("event=share_ingest module=library status=skipped reason=duplicate");
                continue;
            }

            let mut link = Link::new(Uuid::new_v4().to_string(), url);
            link.title = domain_title(&link.url);
            created.push(link);
        }

        if !created.is_empty() {
            links.extend(created.iter().cloned());
            self.store.save_links(&links)?;
        }
        info!(
            "event=share_ingest module=library status=ok received={} saved={}",
            texts.len(),
            created.len()
        );
        Ok(created)
    }

    fn stats(&self) -> Result<LibraryStats, LibraryError> {
        let folders = self.load_folders()?;
        let links = self.load_links()?;

        let mut links_per_folder = BTreeMap::new();
        for folder in &folders {
            links_per_folder.insert(folder.id.clone(), 0);
        }
        let mut root_links = 0;
        for link in &links {
            match &link.folder_id {
                Some(folder_id) => *links_per_folder.entry(folder_id.clone()).or_insert(0) += 1,
                None => root_links += 1,
            }
        }

        Ok(LibraryStats {
            folders: folders.len(),
            links: links.len(),
            root_links,
            private_items: folders.iter().filter(|f| f.is_private).count()
                + links.iter().filter(|l| l.is_private).count(),
            links_per_folder,
        })
    }
}
