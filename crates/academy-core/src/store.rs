//! Storage keys and change notifications shared by every repository.

/// Keys under which the portal persists its documents.
pub mod keys {
    /// Canonical user profile (JSON object).
    pub const USER: &str = "user";
    /// Auth token returned by the backend (raw string).
    pub const TOKEN: &str = "token";
    pub const PLAYERS: &str = "players";
    pub const COACHES: &str = "coaches";
    pub const EVENTS: &str = "events";
    pub const PLAYER_GROUPS: &str = "playerGroups";
}

/// Kind of change applied to a storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageChange {
    Set,
    Removed,
}

/// Published after every successful write so that other open views can
/// refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub change: StorageChange,
}

impl StorageEvent {
    pub fn set(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            change: StorageChange::Set,
        }
    }

    pub fn removed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            change: StorageChange::Removed,
        }
    }
}
