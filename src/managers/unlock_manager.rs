//! Unlock Manager for LinkSafe.
//!
//! Tracks which private folders and links the user has unlocked in the
//! current session. The set lives in memory only and starts empty, so a
//! restart locks everything again. Unlocking a folder does not unlock the
//! links inside it; each private item is tracked on its own.

use std::collections::HashSet;

use log::{debug, info};

use crate::services::crypto_service::verify_password;
use crate::types::protection::Protected;

/// Trait defining session unlock operations.
pub trait UnlockManagerTrait {
    /// Verifies `password` against the item's hash and records the unlock
    /// on success. Public items are always accessible and never recorded.
    fn unlock_with_password<P: Protected>(&mut self, item: &P, password: &str) -> bool;
    /// Records an unlock already verified by the caller. Only private
    /// items are recorded.
    fn unlock<P: Protected>(&mut self, item: &P);
    fn lock(&mut self, id: &str) -> bool;
    fn lock_all(&mut self);
    fn is_unlocked(&self, id: &str) -> bool;
    /// Public items, or private items unlocked this session.
    fn can_access<P: Protected>(&self, item: &P) -> bool;
    /// Drops ids of items that no longer exist.
    fn forget<'a, I: IntoIterator<Item = &'a str>>(&mut self, ids: I);
}

/// In-memory set of unlocked item ids.
#[derive(Debug, Default)]
pub struct UnlockTracker {
    unlocked: HashSet<String>,
}

impl UnlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

impl UnlockManagerTrait for UnlockTracker {
    fn unlock_with_password<P: Protected>(&mut self, item: &P, password: &str) -> bool {
        if !item.is_private() {
            return true;
        }
        let Some(hash) = item.password_hash() else {
            debug!("event=unlock module=unlock status=denied id={} reason=no_hash", item.id());
            return false;
        };
        if !verify_password(password, hash) {
            info!("event=unlock module=unlock status=denied id={}", item.id());
            return false;
        }

        self.unlocked.insert(item.id().to_string());
        info!("event=unlock module=unlock status=ok id={}", item.id());
        true
    }

    fn unlock<P: Protected>(&mut self, item: &P) {
        if item.is_private() {
            self.unlocked.insert(item.id().to_string());
        }
    }

    fn lock(&mut self, id: &str) -> bool {
        self.unlocked.remove(id)
    }

    fn lock_all(&mut self) {
        let count = self.unlocked.len();
        self.unlocked.clear();
        debug!("event=lock_all module=unlock status=ok count={}", count);
    }

    fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    fn can_access<P: Protected>(&self, item: &P) -> bool {
        !item.is_private() || self.is_unlocked(item.id())
    }

    fn forget<'a, I: IntoIterator<Item = &'a str>>(&mut self, ids: I) {
        for id in ids {
            self.unlocked.remove(id);
        }
    }
}
