//! RPC method handler for the LinkSafe JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested without stdio.
//! [`handle_method`] dispatches a method call to the library and unlock
//! state held by [`App`].

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::App;
use crate::managers::library_manager::LibraryManagerTrait;
use crate::managers::unlock_manager::UnlockManagerTrait;
use crate::services::crypto_service::{hash_password, verify_password};
use crate::services::password_policy::hash_new_password;
use crate::types::errors::LibraryError;
use crate::types::folder::Folder;
use crate::types::link::{Link, LinkPreview};
use crate::types::settings::AppSettings;

/// Error payload returned in the `error` field of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcError {
    pub kind: String,
    pub message: String,
    pub retryable: bool,
}

impl RpcError {
    fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new("invalid_params", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal", message)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<LibraryError> for RpcError {
    fn from(err: LibraryError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

fn lock(app: &Mutex<App>) -> Result<MutexGuard<'_, App>, RpcError> {
    app.lock().map_err(|e| RpcError::internal(e.to_string()))
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, RpcError> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(format!("missing {}", name)))
}

fn opt_str_param<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(|v| v.as_str())
}

fn object_param<T: DeserializeOwned>(params: &Value, name: &str) -> Result<T, RpcError> {
    let value = params
        .get(name)
        .cloned()
        .ok_or_else(|| RpcError::invalid_params(format!("missing {}", name)))?;
    serde_json::from_value(value)
        .map_err(|e| RpcError::invalid_params(format!("invalid {}: {}", name, e)))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

/// Hash for a new private item, when the caller set a password.
fn new_password_hash(params: &Value) -> Result<Option<String>, RpcError> {
    match opt_str_param(params, "password") {
        None => Ok(None),
        Some(password) => {
            let confirmation = opt_str_param(params, "confirmPassword").unwrap_or(password);
            hash_new_password(password, confirmation)
                .map(Some)
                .map_err(|e| LibraryError::from(e).into())
        }
    }
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, RpcError> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Folders ───
        "folder.list" => {
            let a = lock(app)?;
            let settings = a.library.load_settings()?;
            let mut folders = a.library.load_folders()?;
            settings.sort_folders(&mut folders);
            to_value(&folders)
        }
        "folder.add" => {
            let name = str_param(params, "name")?;
            let mut folder = Folder::new(Uuid::new_v4().to_string(), name);
            if let Some(color) = opt_str_param(params, "color") {
                folder.color = color.to_string();
            }
            if let Some(icon) = opt_str_param(params, "icon") {
                folder.icon = icon.to_string();
            }
            if let Some(hash) = new_password_hash(params)? {
                folder = folder.with_password_hash(hash);
            }
            let mut a = lock(app)?;
            let stored = a.library.add_folder(folder)?;
            to_value(&stored)
        }
        "folder.update" => {
            let folder: Folder = object_param(params, "folder")?;
            let mut a = lock(app)?;
            let updated = a.library.update_folder(folder)?;
            to_value(&updated)
        }
        "folder.delete" => {
            let id = str_param(params, "id")?;
            let mut a = lock(app)?;
            let removal = a.delete_folder(id)?;
            Ok(json!({
                "ok": true,
                "folderRemoved": removal.folder_removed,
                "removedLinkIds": removal.removed_link_ids,
            }))
        }

        // ─── Links ───
        "link.list" => {
            let a = lock(app)?;
            let settings = a.library.load_settings()?;
            let mut links = a.library.load_links()?;
            settings.sort_links(&mut links);
            to_value(&links)
        }
        "link.by_folder" => {
            let folder_id = opt_str_param(params, "folderId");
            let a = lock(app)?;
            let settings = a.library.load_settings()?;
            let mut links = a.library.get_links_by_folder(folder_id)?;
            settings.sort_links(&mut links);
            to_value(&links)
        }
        "link.add" => {
            let url = str_param(params, "url")?;
            let mut link = Link::new(Uuid::new_v4().to_string(), url);
            if let Some(title) = opt_str_param(params, "title") {
                link.title = title.to_string();
            }
            if let Some(description) = opt_str_param(params, "description") {
                link.description = description.to_string();
            }
            link.folder_id = opt_str_param(params, "folderId").map(str::to_string);
            if let Some(hash) = new_password_hash(params)? {
                link = link.with_password_hash(hash);
            }
            let mut a = lock(app)?;
            let stored = a.library.add_link(link)?;
            to_value(&stored)
        }
        "link.update" => {
            let link: Link = object_param(params, "link")?;
            let mut a = lock(app)?;
            let updated = a.library.update_link(link)?;
            to_value(&updated)
        }
        "link.delete" => {
            let id = str_param(params, "id")?;
            let mut a = lock(app)?;
            let removed = a.delete_link(id)?;
            Ok(json!({"ok": true, "removed": removed}))
        }
        "link.apply_preview" => {
            let id = str_param(params, "id")?;
            let preview: LinkPreview = object_param(params, "preview")?;
            let mut a = lock(app)?;
            let updated = a.library.apply_link_preview(id, &preview)?;
            to_value(&updated)
        }
        "link.ingest_shared" => {
            let texts: Vec<String> = object_param(params, "texts")?;
            let mut a = lock(app)?;
            let created = a.library.ingest_shared_texts(&texts)?;
            to_value(&created)
        }

        // ─── Settings and data ───
        "settings.get" => {
            let a = lock(app)?;
            to_value(&a.library.load_settings()?)
        }
        "settings.save" => {
            let settings: AppSettings = object_param(params, "settings")?;
            let mut a = lock(app)?;
            a.library.save_settings(&settings)?;
            Ok(json!({"ok": true}))
        }
        "data.clear_all" => {
            let mut a = lock(app)?;
            a.clear_all()?;
            Ok(json!({"ok": true}))
        }
        "library.stats" => {
            let a = lock(app)?;
            to_value(&a.library.stats()?)
        }

        // ─── Passwords and unlock state ───
        "password.hash" => {
            let password = str_param(params, "password")?;
            match opt_str_param(params, "confirmPassword") {
                Some(confirmation) => {
                    let hash = hash_new_password(password, confirmation).map_err(LibraryError::from)?;
                    Ok(json!({"hash": hash}))
                }
                None => Ok(json!({"hash": hash_password(password)})),
            }
        }
        "password.verify" => {
            let password = str_param(params, "password")?;
            let hash = str_param(params, "hash")?;
            Ok(json!({"valid": verify_password(password, hash)}))
        }
        "item.unlock" => {
            let id = str_param(params, "id")?;
            let password = str_param(params, "password")?;
            let mut a = lock(app)?;
            let folder = a.library.get_folder(id)?;
            let unlocked = match folder {
                Some(folder) => a.unlocks.unlock_with_password(&folder, password),
                None => {
                    let link = a
                        .library
                        .get_link(id)?
                        .ok_or_else(|| RpcError::not_found(format!("no folder or link with id {}", id)))?;
                    a.unlocks.unlock_with_password(&link, password)
                }
            };
            Ok(json!({"unlocked": unlocked}))
        }
        "item.lock" => {
            let mut a = lock(app)?;
            match opt_str_param(params, "id") {
                Some(id) => {
                    a.unlocks.lock(id);
                }
                None => a.unlocks.lock_all(),
            }
            Ok(json!({"ok": true}))
        }
        "item.is_unlocked" => {
            let id = str_param(params, "id")?;
            let a = lock(app)?;
            Ok(json!({"unlocked": a.unlocks.is_unlocked(id)}))
        }

        _ => Err(RpcError::new(
            "unknown_method",
            format!("unknown method: {}", method),
        )),
    }
}
