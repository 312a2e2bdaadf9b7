//! Roster store
//!
//! Owns the four aggregates (members, user accounts, schedule groups,
//! active-group pointer) plus the volatile session state, and persists
//! every mutation back to storage before returning. Reads hand out
//! clones; the lock is never held across a caller boundary.
//!
//! Member mutations run the consistency engine inside the same write,
//! so participant snapshots and the cached session member can never be
//! observed stale.

use parking_lot::RwLock;

use shared::models::{
    Member, MemberUpdate, ScheduleDay, ScheduleGroup, UserAccount,
};

use crate::core::{AppError, AppResult};
use crate::db::{StateDocument, StateStorage, defaults};
use crate::roster::consistency;
use crate::utils::validation::{
    MAX_ANNOUNCEMENTS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

/// In-memory application state. The first seven fields mirror the
/// persisted document; `session` and `reset_email` are volatile.
#[derive(Debug, Clone)]
struct AppData {
    members: Vec<Member>,
    users: Vec<UserAccount>,
    groups: Vec<ScheduleGroup>,
    active_group_id: String,
    theme: String,
    remembered_user_email: Option<String>,
    push_notifications_enabled: bool,
    session: Option<Member>,
    reset_email: Option<String>,
}

impl AppData {
    fn from_document(doc: StateDocument) -> Self {
        Self {
            members: doc.members,
            users: doc.users,
            groups: doc.groups,
            active_group_id: doc.active_group_id,
            theme: doc.theme,
            remembered_user_email: doc.remembered_user_email,
            push_notifications_enabled: doc.push_notifications_enabled,
            session: None,
            reset_email: None,
        }
    }

    fn to_document(&self) -> StateDocument {
        StateDocument {
            members: self.members.clone(),
            users: self.users.clone(),
            groups: self.groups.clone(),
            active_group_id: self.active_group_id.clone(),
            theme: self.theme.clone(),
            remembered_user_email: self.remembered_user_email.clone(),
            push_notifications_enabled: self.push_notifications_enabled,
        }
    }

    /// Re-resolve the cached session member against the identity store.
    fn refresh_session(&mut self) {
        if let Some(current) = self.session.take() {
            self.session = self.members.iter().find(|m| m.id == current.id).cloned();
        }
    }
}

/// The application store.
pub struct RosterStore {
    storage: StateStorage,
    state: RwLock<AppData>,
}

impl RosterStore {
    /// Load (or initialize) the store from storage.
    pub fn open(storage: StateStorage) -> AppResult<Self> {
        let doc = storage.load_document()?;
        Ok(Self {
            storage,
            state: RwLock::new(AppData::from_document(doc)),
        })
    }

    /// Overwrite in-memory state wholesale from the persisted document
    /// (last-write-wins cross-instance sync). The signed-in member is
    /// re-resolved against the reloaded identity store.
    pub fn reload_from_storage(&self) -> AppResult<()> {
        let doc = self.storage.load_document()?;
        let mut data = self.state.write();
        let session = data.session.take();
        let reset_email = data.reset_email.take();
        *data = AppData::from_document(doc);
        data.session = session;
        data.reset_email = reset_email;
        data.refresh_session();
        Ok(())
    }

    fn persist(&self, data: &AppData) -> AppResult<()> {
        self.storage.save_document(&data.to_document())?;
        Ok(())
    }

    // ========== Members ==========

    pub fn members(&self) -> Vec<Member> {
        self.state.read().members.clone()
    }

    pub fn member_by_id(&self, id: &str) -> Option<Member> {
        self.state.read().members.iter().find(|m| m.id == id).cloned()
    }

    pub fn member_by_email(&self, email: &str) -> Option<Member> {
        self.state
            .read()
            .members
            .iter()
            .find(|m| m.has_email(email))
            .cloned()
    }

    pub fn admins(&self) -> Vec<Member> {
        self.state
            .read()
            .members
            .iter()
            .filter(|m| m.is_admin())
            .cloned()
            .collect()
    }

    /// Apply a profile update, fan it out to every roster occurrence
    /// and the linked login account, and refresh the session copy.
    pub fn update_member(&self, member_id: &str, update: &MemberUpdate) -> AppResult<Member> {
        if let Some(name) = &update.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(email) = &update.email {
            validate_required_text(email, "email", MAX_EMAIL_LEN)?;
        }
        validate_optional_text(&update.phone, "phone", MAX_SHORT_TEXT_LEN)?;

        let mut data = self.state.write();

        if let Some(email) = &update.email
            && data
                .members
                .iter()
                .any(|m| m.id != member_id && m.has_email(email))
        {
            return Err(AppError::validation("Este e-mail já está em uso."));
        }

        let member = data
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

        let previous_email = member.email.clone();
        let updated = member.apply_update(update);
        *member = updated.clone();

        // Keep the login key in step with the member's email
        if !updated.has_email(&previous_email) {
            for account in data.users.iter_mut().filter(|u| u.member_id == member_id) {
                account.email = updated.email.clone();
            }
        }

        consistency::propagate_member_update(&mut data.groups, &updated);
        data.refresh_session();
        self.persist(&data)?;
        Ok(updated)
    }

    /// Store a processed avatar (or clear it) and fan it out.
    pub fn update_avatar(&self, member_id: &str, avatar: Option<String>) -> AppResult<Member> {
        let mut data = self.state.write();

        let member = data
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;
        member.avatar = avatar.clone();
        let updated = member.clone();

        consistency::propagate_avatar_update(&mut data.groups, member_id, avatar.as_deref());
        data.refresh_session();
        self.persist(&data)?;
        Ok(updated)
    }

    /// Cascading delete: roster occurrences, login account, identity
    /// record, and the session if it belonged to the deleted member.
    pub fn delete_member(&self, member_id: &str) -> AppResult<()> {
        let mut data = self.state.write();
        if !data.members.iter().any(|m| m.id == member_id) {
            return Err(AppError::not_found(format!("Member {member_id}")));
        }

        consistency::remove_member_from_rosters(&mut data.groups, member_id);
        data.users.retain(|u| u.member_id != member_id);
        data.members.retain(|m| m.id != member_id);
        data.refresh_session();
        self.persist(&data)?;
        Ok(())
    }

    /// Flip a member between admin and regular member.
    pub fn toggle_admin(&self, member_id: &str) -> AppResult<Member> {
        use shared::models::MemberRole;

        let mut data = self.state.write();
        let member = data
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

        member.role = if member.is_admin() {
            MemberRole::Member
        } else {
            MemberRole::Admin
        };
        let updated = member.clone();

        consistency::propagate_member_update(&mut data.groups, &updated);
        data.refresh_session();
        self.persist(&data)?;
        Ok(updated)
    }

    // ========== User Accounts ==========

    pub fn account_by_email(&self, email: &str) -> Option<UserAccount> {
        self.state
            .read()
            .users
            .iter()
            .find(|u| u.has_email(email))
            .cloned()
    }

    /// Create a member together with its login account (sign-up path).
    /// The caller has already validated and hashed the credential.
    pub fn create_member_with_account(
        &self,
        member: Member,
        account: UserAccount,
    ) -> AppResult<()> {
        let mut data = self.state.write();
        if data.members.iter().any(|m| m.has_email(&member.email))
            || data.users.iter().any(|u| u.has_email(&account.email))
        {
            return Err(AppError::validation("Este e-mail já está em uso."));
        }
        data.members.push(member);
        data.users.push(account);
        self.persist(&data)?;
        Ok(())
    }

    /// Replace the stored password hash for an account.
    pub fn set_password(&self, email: &str, password_hash: String) -> AppResult<()> {
        let mut data = self.state.write();
        let account = data
            .users
            .iter_mut()
            .find(|u| u.has_email(email))
            .ok_or_else(|| AppError::not_found(format!("Account {email}")))?;
        account.password = password_hash;
        self.persist(&data)?;
        Ok(())
    }

    // ========== Schedule Groups ==========

    pub fn groups(&self) -> Vec<ScheduleGroup> {
        self.state.read().groups.clone()
    }

    pub fn active_group_id(&self) -> String {
        self.state.read().active_group_id.clone()
    }

    /// The active group. The pointer is validated on load and on every
    /// mutation, so this lookup cannot miss.
    pub fn active_group(&self) -> ScheduleGroup {
        let data = self.state.read();
        data.groups
            .iter()
            .find(|g| g.id == data.active_group_id)
            .or_else(|| data.groups.first())
            .cloned()
            .unwrap_or_else(|| defaults::default_groups().remove(0))
    }

    /// Point at another group. An unknown id silently falls back to
    /// the first group instead of failing.
    pub fn set_active_group(&self, group_id: &str) -> AppResult<()> {
        let mut data = self.state.write();
        data.active_group_id = if data.groups.iter().any(|g| g.id == group_id) {
            group_id.to_string()
        } else {
            data.groups[0].id.clone()
        };
        self.persist(&data)?;
        Ok(())
    }

    /// Create a group with a blank week and make it active.
    pub fn add_group(&self, name: &str) -> AppResult<ScheduleGroup> {
        validate_required_text(name, "group name", MAX_NAME_LEN)?;

        let group = ScheduleGroup::with_blank_week(
            shared::util::unique_id("g"),
            name.trim(),
            defaults::INITIAL_ANNOUNCEMENTS,
        );

        let mut data = self.state.write();
        data.active_group_id = group.id.clone();
        data.groups.push(group.clone());
        self.persist(&data)?;
        Ok(group)
    }

    /// Delete a group. Rejected while it is the last one; deleting the
    /// active group activates the first remaining one.
    pub fn delete_group(&self, group_id: &str) -> AppResult<()> {
        let mut data = self.state.write();
        if !data.groups.iter().any(|g| g.id == group_id) {
            return Err(AppError::not_found(format!("Group {group_id}")));
        }
        if data.groups.len() == 1 {
            return Err(AppError::business_rule(
                "Cannot delete the last remaining group",
            ));
        }

        data.groups.retain(|g| g.id != group_id);
        if data.active_group_id == group_id {
            data.active_group_id = data.groups[0].id.clone();
        }
        self.persist(&data)?;
        Ok(())
    }

    pub fn rename_group(&self, group_id: &str, name: &str) -> AppResult<()> {
        validate_required_text(name, "group name", MAX_NAME_LEN)?;

        let mut data = self.state.write();
        let group = data
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| AppError::not_found(format!("Group {group_id}")))?;
        group.name = name.trim().to_string();
        self.persist(&data)?;
        Ok(())
    }

    /// Replace one day of a group, returning the previous version so
    /// the caller can diff assignments. An inactive day is normalized
    /// to a blank event and empty lists before it is stored.
    pub fn update_day(&self, group_id: &str, mut day: ScheduleDay) -> AppResult<ScheduleDay> {
        validate_required_text(&day.id, "day id", MAX_NAME_LEN)?;
        if day.active {
            validate_required_text(&day.event, "event", MAX_NAME_LEN)?;
        } else {
            day.clear_assignments();
        }

        let mut data = self.state.write();
        let group = data
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| AppError::not_found(format!("Group {group_id}")))?;
        let slot = group
            .schedule
            .iter_mut()
            .find(|d| d.id == day.id)
            .ok_or_else(|| AppError::not_found(format!("Day {}", day.id)))?;

        day.day_name = slot.day_name.clone();
        let previous = std::mem::replace(slot, day);
        self.persist(&data)?;
        Ok(previous)
    }

    pub fn update_announcements(&self, group_id: &str, text: &str) -> AppResult<()> {
        if text.len() > MAX_ANNOUNCEMENTS_LEN {
            return Err(AppError::validation(format!(
                "announcements are too long ({} chars, max {MAX_ANNOUNCEMENTS_LEN})",
                text.len()
            )));
        }

        let mut data = self.state.write();
        let group = data
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| AppError::not_found(format!("Group {group_id}")))?;
        group.announcements = text.to_string();
        self.persist(&data)?;
        Ok(())
    }

    // ========== Session ==========

    pub fn session_member(&self) -> Option<Member> {
        self.state.read().session.clone()
    }

    pub fn set_session(&self, member: Member) {
        self.state.write().session = Some(member);
    }

    pub fn clear_session(&self) {
        self.state.write().session = None;
    }

    pub fn reset_email(&self) -> Option<String> {
        self.state.read().reset_email.clone()
    }

    pub fn set_reset_email(&self, email: Option<String>) {
        self.state.write().reset_email = email;
    }

    // ========== Settings ==========

    pub fn theme(&self) -> String {
        self.state.read().theme.clone()
    }

    pub fn set_theme(&self, theme: &str) -> AppResult<()> {
        if theme != "light" && theme != "dark" {
            return Err(AppError::validation(format!("Unknown theme '{theme}'")));
        }
        let mut data = self.state.write();
        data.theme = theme.to_string();
        self.persist(&data)?;
        Ok(())
    }

    pub fn push_enabled(&self) -> bool {
        self.state.read().push_notifications_enabled
    }

    pub fn set_push_enabled(&self, enabled: bool) -> AppResult<()> {
        let mut data = self.state.write();
        data.push_notifications_enabled = enabled;
        self.persist(&data)?;
        Ok(())
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.state.read().remembered_user_email.clone()
    }

    pub fn set_remembered_email(&self, email: Option<String>) -> AppResult<()> {
        let mut data = self.state.write();
        data.remembered_user_email = email;
        self.persist(&data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ScheduleParticipant;

    fn store() -> RosterStore {
        RosterStore::open(StateStorage::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_last_group_cannot_be_deleted() {
        let store = store();
        let groups = store.groups();
        assert_eq!(groups.len(), 1);

        let err = store.delete_group(&groups[0].id).unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(store.groups().len(), 1);
    }

    #[test]
    fn test_new_group_becomes_active_and_deleting_it_activates_first() {
        let store = store();
        let original = store.active_group();

        let group = store.add_group("Congregação Norte").unwrap();
        assert_eq!(store.active_group_id(), group.id);
        assert_eq!(group.schedule.len(), 7);
        assert!(group.schedule.iter().all(|d| !d.active));

        store.delete_group(&group.id).unwrap();
        assert_eq!(store.active_group_id(), original.id);
    }

    #[test]
    fn test_unknown_active_group_falls_back_to_first() {
        let store = store();
        store.set_active_group("g_missing").unwrap();
        assert_eq!(store.active_group_id(), store.groups()[0].id);
    }

    #[test]
    fn test_inactive_day_is_normalized_on_save() {
        let store = store();
        let group = store.active_group();
        let ana = store.member_by_id("m4").unwrap();

        let mut day = group.day("d2").unwrap().clone();
        day.active = false;
        day.event = "Ghost event".into();
        day.doorkeepers.push(ScheduleParticipant::registered(&ana));

        store.update_day(&group.id, day).unwrap();
        let saved = store.active_group();
        let saved_day = saved.day("d2").unwrap();
        assert!(saved_day.event.is_empty());
        assert!(saved_day.doorkeepers.is_empty());
    }

    #[test]
    fn test_update_day_returns_previous_version() {
        let store = store();
        let group = store.active_group();
        let mut day = group.day("d1").unwrap().clone();
        let previous_count = day.doorkeepers.len();
        day.doorkeepers.push(ScheduleParticipant::unregistered("Visitante"));

        let previous = store.update_day(&group.id, day).unwrap();
        assert_eq!(previous.doorkeepers.len(), previous_count);
        assert_eq!(
            store.active_group().day("d1").unwrap().doorkeepers.len(),
            previous_count + 1
        );
    }

    #[test]
    fn test_member_rename_propagates_and_refreshes_session() {
        let store = store();
        let ana = store.member_by_id("m4").unwrap();
        store.set_session(ana.clone());

        let update = MemberUpdate {
            name: Some("Ana Paula".into()),
            ..Default::default()
        };
        store.update_member("m4", &update).unwrap();

        assert_eq!(store.member_by_id("m4").unwrap().name, "Ana Paula");
        assert_eq!(store.session_member().unwrap().name, "Ana Paula");

        for group in store.groups() {
            for day in &group.schedule {
                for p in day.doorkeepers.iter().chain(day.hymn_singers.iter()) {
                    if p.id == "m4" {
                        assert_eq!(p.name, "Ana Paula");
                        assert_eq!(p.member_data.as_ref().unwrap().name, "Ana Paula");
                    }
                }
            }
        }
    }

    #[test]
    fn test_member_email_change_updates_login_account() {
        let store = store();
        let update = MemberUpdate {
            email: Some("ana.nova@example.com".into()),
            ..Default::default()
        };
        store.update_member("m4", &update).unwrap();

        assert!(store.account_by_email("ana.nova@example.com").is_some());
        assert!(store.account_by_email("ana.souza@example.com").is_none());
    }

    #[test]
    fn test_member_email_collision_is_rejected() {
        let store = store();
        let update = MemberUpdate {
            email: Some("MARIA.COSTA@example.com".into()),
            ..Default::default()
        };
        let err = store.update_member("m4", &update).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_delete_member_cascades() {
        let store = store();
        store.delete_member("m4").unwrap();

        assert!(store.member_by_id("m4").is_none());
        assert!(store.account_by_email("ana.souza@example.com").is_none());
        for group in store.groups() {
            for day in &group.schedule {
                for p in day.doorkeepers.iter().chain(day.hymn_singers.iter()) {
                    assert_ne!(p.id, "m4");
                }
            }
        }
    }

    #[test]
    fn test_toggle_admin_flips_role() {
        let store = store();
        assert!(!store.member_by_id("m1").unwrap().is_admin());
        store.toggle_admin("m1").unwrap();
        assert!(store.member_by_id("m1").unwrap().is_admin());
        store.toggle_admin("m1").unwrap();
        assert!(!store.member_by_id("m1").unwrap().is_admin());
    }

    #[test]
    fn test_oversized_announcements_are_rejected() {
        let store = store();
        let group_id = store.active_group_id();
        let err = store
            .update_announcements(&group_id, &"x".repeat(MAX_ANNOUNCEMENTS_LEN + 1))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        store.update_announcements(&group_id, "Avisos").unwrap();
        assert_eq!(store.active_group().announcements, "Avisos");
    }

    #[test]
    fn test_reload_overwrites_memory_state() {
        let storage = StateStorage::open_in_memory().unwrap();
        let store = RosterStore::open(storage.clone()).unwrap();
        let other = RosterStore::open(storage).unwrap();

        let group_id = store.active_group_id();
        other.update_announcements(&group_id, "Escrito em outra aba").unwrap();

        assert_ne!(store.active_group().announcements, "Escrito em outra aba");
        store.reload_from_storage().unwrap();
        assert_eq!(store.active_group().announcements, "Escrito em outra aba");
    }

    #[test]
    fn test_reload_drops_session_of_deleted_member() {
        let storage = StateStorage::open_in_memory().unwrap();
        let store = RosterStore::open(storage.clone()).unwrap();
        let other = RosterStore::open(storage).unwrap();

        store.set_session(store.member_by_id("m1").unwrap());
        other.delete_member("m1").unwrap();
        store.reload_from_storage().unwrap();
        assert!(store.session_member().is_none());
    }

    #[test]
    fn test_theme_validation() {
        let store = store();
        assert!(store.set_theme("dark").is_ok());
        assert_eq!(store.theme(), "dark");
        assert!(store.set_theme("blue").is_err());
    }
}
