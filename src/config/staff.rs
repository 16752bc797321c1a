//! Staff seeded from config.toml.
//!
//! Each entry maps a chat-platform user id to a display name. Entries are
//! inserted into the employees table on startup when their username is absent.

use serde::Deserialize;

/// One staff member to seed
#[derive(Debug, Clone, Deserialize)]
pub struct StaffConfig {
    /// Chat-platform user id
    pub username: String,
    /// Display name
    pub name: String,
}
