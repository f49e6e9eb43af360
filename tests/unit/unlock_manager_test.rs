//! Unit tests for session unlock tracking and its coupling with deletes in
//! the App core.

use linksafe::app::App;
use linksafe::managers::library_manager::LibraryManagerTrait;
use linksafe::managers::unlock_manager::{UnlockManagerTrait, UnlockTracker};
use linksafe::services::crypto_service::hash_password;
use linksafe::types::folder::Folder;
use linksafe::types::link::Link;

fn private_folder(id: &str, password: &str) -> Folder {
    Folder::new(id, "Vault").with_password_hash(hash_password(password))
}

fn private_link(id: &str, folder_id: &str, password: &str) -> Link {
    Link::new(id, "https://a.com")
        .in_folder(folder_id)
        .with_password_hash(hash_password(password))
}

#[test]
fn test_correct_password_unlocks() {
    let mut tracker = UnlockTracker::new();
    let folder = private_folder("f1", "abcd");

    assert!(!tracker.can_access(&folder));
    assert!(tracker.unlock_with_password(&folder, "abcd"));
    assert!(tracker.is_unlocked("f1"));
    assert!(tracker.can_access(&folder));
}

#[test]
fn test_unlocking_folder_leaves_its_links_locked() {
    let mut tracker = UnlockTracker::new();
    let folder = private_folder("f1", "abcd");
    let link = private_link("l1", "f1", "abcd");

    tracker.unlock_with_password(&folder, "abcd");

    assert!(!tracker.is_unlocked("l1"));
    assert!(!tracker.can_access(&link));
}

#[test]
fn test_private_item_without_hash_never_unlocks() {
    let mut tracker = UnlockTracker::new();
    let mut folder = Folder::new("f1", "Broken");
    folder.is_private = true;

    assert!(!tracker.unlock_with_password(&folder, ""));
    assert!(!tracker.can_access(&folder));
}

#[test]
fn test_lock_single_item() {
    let mut tracker = UnlockTracker::new();
    tracker.unlock(&private_folder("a", "abcd"));
    tracker.unlock(&private_folder("b", "abcd"));

    assert!(tracker.lock("a"));
    assert!(!tracker.lock("a"));
    assert!(!tracker.is_unlocked("a"));
    assert!(tracker.is_unlocked("b"));
}

#[test]
fn test_unlock_ignores_public_items() {
    let mut tracker = UnlockTracker::new();
    tracker.unlock(&Folder::new("f1", "Open"));
    assert!(tracker.is_empty());
    assert!(!tracker.is_unlocked("f1"));
}

#[test]
fn test_new_tracker_starts_locked() {
    let tracker = UnlockTracker::new();
    assert!(tracker.is_empty());
    assert!(!tracker.is_unlocked("anything"));
}

#[test]
fn test_app_delete_folder_forgets_unlocked_ids() {
    let mut app = App::in_memory().unwrap();
    let folder = app.library.add_folder(private_folder("f1", "abcd")).unwrap();
    let link = app
        .library
        .add_link(private_link("l1", "f1", "abcd"))
        .unwrap();
    app.unlocks.unlock(&folder);
    app.unlocks.unlock(&link);
    app.unlocks.unlock(&private_folder("other", "abcd"));

    app.delete_folder("f1").unwrap();

    assert!(!app.unlocks.is_unlocked("f1"));
    assert!(!app.unlocks.is_unlocked("l1"));
    assert!(app.unlocks.is_unlocked("other"));
}

#[test]
fn test_app_clear_all_locks_everything() {
    let mut app = App::in_memory().unwrap();
    let folder = app.library.add_folder(private_folder("f1", "abcd")).unwrap();
    app.unlocks.unlock(&folder);

    app.clear_all().unwrap();

    assert!(app.unlocks.is_empty());
    assert!(app.library.load_folders().unwrap().is_empty());
}
