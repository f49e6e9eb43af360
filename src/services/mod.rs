// LinkSafe services
// Stateless helpers: encryption and password hashing, password rules, URL handling.

pub mod crypto_service;
pub mod password_policy;
pub mod url_service;
