//! redb-based storage for the application state document
//!
//! # Keys
//!
//! | Key | Value | Purpose |
//! |-----|-------|---------|
//! | `members` | JSON `Vec<Member>` | identity store |
//! | `users` | JSON `Vec<UserAccount>` | login credentials |
//! | `scheduleGroups` | JSON `Vec<ScheduleGroup>` | roster tracks |
//! | `activeScheduleGroupId` | UTF-8 string | active-group pointer |
//! | `theme` | `"light"` / `"dark"` | UI theme |
//! | `rememberedUserEmail` | UTF-8 string | "remember me" login |
//! | `pushNotificationsEnabled` | `"true"` / `"false"` | push opt-in flag |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`, and a full document save
//! is one write transaction, so the document is always in a consistent
//! state even across abrupt shutdowns. A value that fails to
//! deserialize (or decodes to an unusable shape, like an empty group
//! list) is treated as corrupt and replaced by the built-in default at
//! load time (never a crash).

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use shared::models::{Member, ScheduleGroup, UserAccount};

use super::defaults;

/// Single table holding the whole state document: key = document key,
/// value = JSON or plain UTF-8 bytes.
const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("state");

/// Document keys (camelCase, matching the persisted JSON shape).
pub mod keys {
    pub const MEMBERS: &str = "members";
    pub const USERS: &str = "users";
    pub const SCHEDULE_GROUPS: &str = "scheduleGroups";
    pub const ACTIVE_SCHEDULE_GROUP_ID: &str = "activeScheduleGroupId";
    pub const THEME: &str = "theme";
    pub const REMEMBERED_USER_EMAIL: &str = "rememberedUserEmail";
    pub const PUSH_NOTIFICATIONS_ENABLED: &str = "pushNotificationsEnabled";
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// In-memory image of the persisted document.
#[derive(Debug, Clone)]
pub struct StateDocument {
    pub members: Vec<Member>,
    pub users: Vec<UserAccount>,
    pub groups: Vec<ScheduleGroup>,
    pub active_group_id: String,
    pub theme: String,
    pub remembered_user_email: Option<String>,
    pub push_notifications_enabled: bool,
}

/// State storage backed by redb
#[derive(Clone)]
pub struct StateStorage {
    db: Arc<Database>,
}

impl StateStorage {
    /// Open or create the state file at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Raw Key Operations ==========

    /// Write raw bytes under a document key.
    pub fn put_bytes(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Read raw bytes stored under a document key.
    pub fn get_bytes(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    /// Remove a document key.
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Typed Operations ==========

    /// Write a value as JSON.
    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.put_bytes(key, &bytes)
    }

    /// Read a JSON value. `Ok(None)` when the key is absent; a decode
    /// failure is propagated so the caller can apply its fallback.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Write a plain string value.
    pub fn put_text(&self, key: &str, value: &str) -> StorageResult<()> {
        self.put_bytes(key, value.as_bytes())
    }

    /// Read a plain string value (lossy on invalid UTF-8).
    pub fn get_text(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .get_bytes(key)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    // ========== Document Load / Save ==========

    /// Load the whole document, substituting the built-in default for
    /// every key that is missing or corrupt.
    pub fn load_document(&self) -> StorageResult<StateDocument> {
        let members = self.json_or_default(keys::MEMBERS, defaults::default_members)?;
        let users = self.json_or_default(keys::USERS, defaults::default_users)?;

        // An empty group list is well-formed JSON but violates the
        // at-least-one-group invariant; treat it like corruption.
        let mut groups: Vec<ScheduleGroup> =
            self.json_or_default(keys::SCHEDULE_GROUPS, defaults::default_groups)?;
        if groups.is_empty() {
            tracing::warn!(
                key = %keys::SCHEDULE_GROUPS,
                "Empty group list in state, using default dataset"
            );
            groups = defaults::default_groups();
        }

        let active_group_id = self
            .get_text(keys::ACTIVE_SCHEDULE_GROUP_ID)?
            .filter(|id| groups.iter().any(|g| &g.id == id))
            .unwrap_or_else(|| groups[0].id.clone());

        let theme = self
            .get_text(keys::THEME)?
            .filter(|t| t == "light" || t == "dark")
            .unwrap_or_else(|| "light".to_string());

        let remembered_user_email = self.get_text(keys::REMEMBERED_USER_EMAIL)?;
        let push_notifications_enabled = self
            .get_text(keys::PUSH_NOTIFICATIONS_ENABLED)?
            .map(|v| v == "true")
            .unwrap_or(false);

        Ok(StateDocument {
            members,
            users,
            groups,
            active_group_id,
            theme,
            remembered_user_email,
            push_notifications_enabled,
        })
    }

    /// Persist every key of the document in a single write
    /// transaction, so a mutation either lands whole or not at all.
    pub fn save_document(&self, doc: &StateDocument) -> StorageResult<()> {
        let members = serde_json::to_vec(&doc.members)?;
        let users = serde_json::to_vec(&doc.users)?;
        let groups = serde_json::to_vec(&doc.groups)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.insert(keys::MEMBERS, members.as_slice())?;
            table.insert(keys::USERS, users.as_slice())?;
            table.insert(keys::SCHEDULE_GROUPS, groups.as_slice())?;
            table.insert(
                keys::ACTIVE_SCHEDULE_GROUP_ID,
                doc.active_group_id.as_bytes(),
            )?;
            table.insert(keys::THEME, doc.theme.as_bytes())?;
            match &doc.remembered_user_email {
                Some(email) => {
                    table.insert(keys::REMEMBERED_USER_EMAIL, email.as_bytes())?;
                }
                None => {
                    table.remove(keys::REMEMBERED_USER_EMAIL)?;
                }
            }
            table.insert(
                keys::PUSH_NOTIFICATIONS_ENABLED,
                if doc.push_notifications_enabled {
                    b"true".as_slice()
                } else {
                    b"false".as_slice()
                },
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Read a JSON key, falling back to `default` when the key is
    /// missing or fails to decode (corruption fallback).
    fn json_or_default<T, F>(&self, key: &str, default: F) -> StorageResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.get_json(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(default()),
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(key = %key, error = %e, "Corrupt state value, using default dataset");
                Ok(default())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::WEEKDAY_NAMES;

    #[test]
    fn test_missing_keys_fall_back_to_default_dataset() {
        let storage = StateStorage::open_in_memory().unwrap();
        let doc = storage.load_document().unwrap();

        assert_eq!(doc.members.len(), 9);
        assert_eq!(doc.users.len(), 9);
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.groups[0].schedule.len(), 7);
        assert_eq!(doc.active_group_id, doc.groups[0].id);
        assert_eq!(doc.theme, "light");
        assert!(!doc.push_notifications_enabled);
    }

    #[test]
    fn test_corrupt_json_falls_back_to_default_dataset() {
        let storage = StateStorage::open_in_memory().unwrap();
        storage.put_bytes(keys::MEMBERS, b"{not json at all").unwrap();
        storage.put_bytes(keys::SCHEDULE_GROUPS, b"42").unwrap();

        let doc = storage.load_document().unwrap();
        assert_eq!(doc.members.len(), 9);
        assert_eq!(doc.groups.len(), 1);
    }

    #[test]
    fn test_empty_group_list_falls_back_to_default_dataset() {
        let storage = StateStorage::open_in_memory().unwrap();
        storage.put_bytes(keys::SCHEDULE_GROUPS, b"[]").unwrap();

        let doc = storage.load_document().unwrap();
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.active_group_id, doc.groups[0].id);
    }

    #[test]
    fn test_save_commits_the_document_as_one_snapshot() {
        let storage = StateStorage::open_in_memory().unwrap();
        let mut doc = storage.load_document().unwrap();
        storage.save_document(&doc).unwrap();

        // A reader holding a snapshot from before the save must see
        // the old document for every key; a reader from after it must
        // see the renamed member and its roster snapshot together.
        let before_txn = storage.db.begin_read().unwrap();

        doc.members[0].name = "João A. Alves".into();
        doc.groups[0].schedule[0].doorkeepers[0].name = "João A. Alves".into();
        storage.save_document(&doc).unwrap();

        let before_table = before_txn.open_table(STATE_TABLE).unwrap();
        let old_members: Vec<Member> = serde_json::from_slice(
            before_table.get(keys::MEMBERS).unwrap().unwrap().value(),
        )
        .unwrap();
        let old_groups: Vec<ScheduleGroup> = serde_json::from_slice(
            before_table
                .get(keys::SCHEDULE_GROUPS)
                .unwrap()
                .unwrap()
                .value(),
        )
        .unwrap();
        assert_eq!(old_members[0].name, "João Alves");
        assert_eq!(old_groups[0].schedule[0].doorkeepers[0].name, "João Alves");

        let reloaded = storage.load_document().unwrap();
        assert_eq!(reloaded.members[0].name, "João A. Alves");
        assert_eq!(
            reloaded.groups[0].schedule[0].doorkeepers[0].name,
            reloaded.members[0].name,
            "member and roster snapshot must move together"
        );
    }

    #[test]
    fn test_document_roundtrip() {
        let storage = StateStorage::open_in_memory().unwrap();
        let mut doc = storage.load_document().unwrap();
        doc.theme = "dark".into();
        doc.push_notifications_enabled = true;
        doc.remembered_user_email = Some("joao.alves@example.com".into());
        doc.groups[0].announcements = "Avisos novos".into();
        storage.save_document(&doc).unwrap();

        let reloaded = storage.load_document().unwrap();
        assert_eq!(reloaded.theme, "dark");
        assert!(reloaded.push_notifications_enabled);
        assert_eq!(
            reloaded.remembered_user_email.as_deref(),
            Some("joao.alves@example.com")
        );
        assert_eq!(reloaded.groups[0].announcements, "Avisos novos");
    }

    #[test]
    fn test_stale_active_group_pointer_falls_back_to_first_group() {
        let storage = StateStorage::open_in_memory().unwrap();
        storage
            .put_text(keys::ACTIVE_SCHEDULE_GROUP_ID, "g_nonexistent")
            .unwrap();

        let doc = storage.load_document().unwrap();
        assert_eq!(doc.active_group_id, doc.groups[0].id);
    }

    #[test]
    fn test_remembered_email_removal() {
        let storage = StateStorage::open_in_memory().unwrap();
        let mut doc = storage.load_document().unwrap();
        doc.remembered_user_email = Some("x@y.com".into());
        storage.save_document(&doc).unwrap();
        assert!(storage.load_document().unwrap().remembered_user_email.is_some());

        doc.remembered_user_email = None;
        storage.save_document(&doc).unwrap();
        assert!(storage.load_document().unwrap().remembered_user_email.is_none());
    }

    #[test]
    fn test_default_week_uses_portuguese_day_names() {
        let storage = StateStorage::open_in_memory().unwrap();
        let doc = storage.load_document().unwrap();
        let names: Vec<&str> = doc.groups[0]
            .schedule
            .iter()
            .map(|d| d.day_name.as_str())
            .collect();
        assert_eq!(names, WEEKDAY_NAMES.to_vec());
    }
}
