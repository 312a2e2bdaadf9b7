//! 应用状态 - 持有所有服务的单例引用
//!
//! `AppState` wires the storage, store, auth gate and notification
//! boundaries together and exposes the few operations that span more
//! than one of them (saving a day with admin notices, evaluating the
//! next-day reminder).
//!
//! # 服务组件
//!
//! | 字段 | 类型 | 说明 |
//! |------|------|------|
//! | config | Config | 配置项 (不可变) |
//! | store | Arc<RosterStore> | 聚合状态与持久化 |
//! | auth | AuthGate | 登录 / 注册 / 密码重置 |
//! | mailer | Arc<dyn Mailer> | 邮件边界 |
//! | push | Arc<dyn PushChannel> | 推送通知边界 |

use std::sync::Arc;

use shared::models::ScheduleDay;

use crate::auth::AuthGate;
use crate::core::{AppResult, Config};
use crate::db::StateStorage;
use crate::services::assignment::{diff_new_assignments, notify_admins};
use crate::services::avatar::process_avatar;
use crate::services::mailer::{LogMailer, Mailer};
use crate::services::push::{DisconnectedChannel, PushChannel};
use crate::services::reminder::{self, ReminderOutcome};
use crate::store::RosterStore;
use crate::utils::time::today_weekday_index;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<RosterStore>,
    pub auth: Arc<AuthGate>,
    pub mailer: Arc<dyn Mailer>,
    pub push: Arc<dyn PushChannel>,
}

impl AppState {
    /// Manual construction with explicit boundaries. Most callers use
    /// [`AppState::initialize`] instead.
    pub fn new(
        config: Config,
        storage: StateStorage,
        mailer: Arc<dyn Mailer>,
        push: Arc<dyn PushChannel>,
    ) -> AppResult<Self> {
        let store = Arc::new(RosterStore::open(storage)?);
        let auth = Arc::new(AuthGate::new(store.clone(), mailer.clone()));
        Ok(Self {
            config,
            store,
            auth,
            mailer,
            push,
        })
    }

    /// Standard wiring: file-backed storage under the work directory,
    /// log-only mailer, no push channel.
    pub fn initialize(config: Config) -> AppResult<Self> {
        config
            .ensure_work_dir()
            .map_err(|e| anyhow::anyhow!("Failed to create work dir: {e}"))?;
        let storage = StateStorage::open(config.state_file())?;

        tracing::info!(work_dir = %config.work_dir, "State loaded");

        Self::new(
            config,
            storage,
            Arc::new(LogMailer),
            Arc::new(DisconnectedChannel),
        )
    }

    /// Save one day of a group and mail every admin about participants
    /// that were newly added to the reminder-relevant roles. Returns
    /// the previous version of the day.
    pub fn save_day(&self, group_id: &str, day: ScheduleDay) -> AppResult<ScheduleDay> {
        let saved = day.clone();
        let previous = self.store.update_day(group_id, day)?;

        let assignments = diff_new_assignments(&previous, &saved);
        if !assignments.is_empty() {
            let admins = self.store.admins();
            let admin_refs: Vec<_> = admins.iter().collect();
            notify_admins(self.mailer.as_ref(), &admin_refs, &assignments);
        }
        Ok(previous)
    }

    /// Process an uploaded image and store it as the member's avatar,
    /// fanning the new snapshot out to every roster occurrence.
    pub fn update_member_avatar(&self, member_id: &str, image_bytes: &[u8]) -> AppResult<()> {
        let data_url = process_avatar(image_bytes)?;
        self.store.update_avatar(member_id, Some(data_url))?;
        Ok(())
    }

    /// Evaluate the next-day reminder for the signed-in member against
    /// the active group.
    pub fn evaluate_reminder(&self) -> ReminderOutcome {
        self.evaluate_reminder_at(today_weekday_index())
    }

    /// Same, with an explicit "today" weekday index (0 = Sunday).
    pub fn evaluate_reminder_at(&self, today_index: usize) -> ReminderOutcome {
        let Some(member) = self.store.session_member() else {
            return ReminderOutcome::Clear;
        };
        let group = self.store.active_group();
        reminder::evaluate(
            &member,
            &group,
            today_index,
            self.store.push_enabled(),
            self.push.as_ref(),
        )
    }
}
