// LinkSafe state managers
// Managers own stateful operations: sealed persistence, the folder and link library, session unlocks.

pub mod library_manager;
pub mod object_store;
pub mod unlock_manager;
