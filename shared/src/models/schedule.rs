//! Schedule Models
//!
//! A [`ScheduleGroup`] is one independently manageable roster track:
//! a fixed 7-day week plus a free-text announcement board. Each day
//! carries four role lists whose entries are [`ScheduleParticipant`]s.

use serde::{Deserialize, Serialize};

use crate::models::Member;
use crate::util::unique_id;

/// Weekday display names, index 0 = Sunday (JS `getDay()` convention).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Domingo",
    "Segunda-feira",
    "Terça-feira",
    "Quarta-feira",
    "Quinta-feira",
    "Sexta-feira",
    "Sábado",
];

/// One assignee in one role slot on one day.
///
/// # Invariant
///
/// | `is_registered` | `id` | `member_data` |
/// |------------------|------|---------------|
/// | `true` | a real member id | snapshot of that member |
/// | `false` | synthetic (`p_...`) | absent |
///
/// The snapshot may go stale between member mutations; the consistency
/// engine re-syncs it synchronously on every member update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParticipant {
    pub id: String,
    pub name: String,
    pub is_registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_data: Option<Member>,
}

impl ScheduleParticipant {
    /// Registered participant carrying a full member snapshot.
    pub fn registered(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            is_registered: true,
            member_data: Some(member.clone()),
        }
    }

    /// Unregistered participant — a named helper with no login/profile.
    pub fn unregistered(name: impl Into<String>) -> Self {
        Self {
            id: unique_id("p"),
            name: name.into(),
            is_registered: false,
            member_data: None,
        }
    }
}

/// One weekday's roster within a group.
///
/// When `active` is false the event is blank and all four lists are
/// empty (the store enforces this on save).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub id: String,
    pub day_name: String,
    pub event: String,
    pub active: bool,
    #[serde(default)]
    pub doorkeepers: Vec<ScheduleParticipant>,
    #[serde(default)]
    pub hymn_singers: Vec<ScheduleParticipant>,
    #[serde(default)]
    pub worship_leaders: Vec<ScheduleParticipant>,
    #[serde(default)]
    pub preachers: Vec<ScheduleParticipant>,
}

impl ScheduleDay {
    /// Blank inactive day (`d1`..`d7` identity convention).
    pub fn blank(id: impl Into<String>, day_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            day_name: day_name.into(),
            event: String::new(),
            active: false,
            doorkeepers: Vec::new(),
            hymn_singers: Vec::new(),
            worship_leaders: Vec::new(),
            preachers: Vec::new(),
        }
    }

    /// Clear event and every participant list (inactive-day invariant).
    pub fn clear_assignments(&mut self) {
        self.event.clear();
        self.doorkeepers.clear();
        self.hymn_singers.clear();
        self.worship_leaders.clear();
        self.preachers.clear();
    }

    /// Mutable access to all four role lists.
    pub fn role_lists_mut(&mut self) -> [&mut Vec<ScheduleParticipant>; 4] {
        [
            &mut self.doorkeepers,
            &mut self.hymn_singers,
            &mut self.worship_leaders,
            &mut self.preachers,
        ]
    }
}

/// One independently-schedulable roster track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGroup {
    pub id: String,
    pub name: String,
    pub schedule: Vec<ScheduleDay>,
    #[serde(default)]
    pub announcements: String,
}

impl ScheduleGroup {
    /// New group with a blank 7-day week (all days inactive).
    pub fn with_blank_week(
        id: impl Into<String>,
        name: impl Into<String>,
        announcements: impl Into<String>,
    ) -> Self {
        let schedule = WEEKDAY_NAMES
            .iter()
            .enumerate()
            .map(|(i, day_name)| ScheduleDay::blank(format!("d{}", i + 1), *day_name))
            .collect();
        Self {
            id: id.into(),
            name: name.into(),
            schedule,
            announcements: announcements.into(),
        }
    }

    /// Find a day by its stable id (`d1`..`d7`).
    pub fn day(&self, day_id: &str) -> Option<&ScheduleDay> {
        self.schedule.iter().find(|d| d.id == day_id)
    }

    /// Find a day by its weekday display name.
    pub fn day_by_name(&self, day_name: &str) -> Option<&ScheduleDay> {
        self.schedule.iter().find(|d| d.day_name == day_name)
    }
}
