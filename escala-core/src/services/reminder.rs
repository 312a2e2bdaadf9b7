//! Next-day task reminder engine
//!
//! Looks exactly one day ahead in the active group: is tomorrow's day
//! active, and does the signed-in member hold a doorkeeper or hymn
//! singer slot on it? Worship leaders and preachers are deliberately
//! not part of the reminder. Evaluation is a pure function of its
//! inputs; re-evaluating with the same inputs produces the same
//! outcome, so callers may re-run it on every state change.

use shared::models::{Member, ScheduleGroup, WEEKDAY_NAMES};

use super::push::{PushChannel, PushPermission};

/// Push notification title.
pub const PUSH_TITLE: &str = "Lembrete de Tarefa";

/// Where a computed reminder should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderRoute {
    Push,
    Banner,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// Delivered through the push channel; the in-app banner stays clear.
    Pushed(String),
    /// Show (or keep showing) the in-app banner with this message.
    Banner(String),
    /// No task tomorrow; clear any banner.
    Clear,
}

/// Weekday name of the day after the given weekday index (0 = Sunday).
pub fn tomorrow_day_name(today_index: usize) -> &'static str {
    WEEKDAY_NAMES[(today_index + 1) % 7]
}

/// Routing decision from the three push preconditions. Pure.
pub fn decide_route(opted_in: bool, permission: PushPermission, connected: bool) -> ReminderRoute {
    if opted_in && permission == PushPermission::Granted && connected {
        ReminderRoute::Push
    } else {
        ReminderRoute::Banner
    }
}

/// Role labels the member holds tomorrow, in fixed doorkeeper-first
/// order. Empty when tomorrow is inactive or holds no slot.
fn roles_for_tomorrow<'a>(
    member: &Member,
    group: &'a ScheduleGroup,
    today_index: usize,
) -> Vec<&'static str> {
    let Some(day) = group.day_by_name(tomorrow_day_name(today_index)) else {
        return Vec::new();
    };
    if !day.active {
        return Vec::new();
    }

    let mut roles = Vec::new();
    if day.doorkeepers.iter().any(|p| p.id == member.id) {
        roles.push("Porteiro(a)");
    }
    if day.hymn_singers.iter().any(|p| p.id == member.id) {
        roles.push("Cantor(a)");
    }
    roles
}

/// Compose the reminder message, or `None` when there is nothing to
/// remind about.
pub fn compose_message(
    member: &Member,
    group: &ScheduleGroup,
    today_index: usize,
) -> Option<String> {
    let roles = roles_for_tomorrow(member, group, today_index);
    if roles.is_empty() {
        return None;
    }
    Some(format!(
        "Você está escalado como {} amanhã na escala {}.",
        roles.join(" e "),
        group.name
    ))
}

/// Full evaluation: compute the message and route it. A push delivery
/// suppresses the banner; any unavailable push precondition falls back
/// to the banner so the reminder is never dropped.
pub fn evaluate(
    member: &Member,
    group: &ScheduleGroup,
    today_index: usize,
    opted_in: bool,
    channel: &dyn PushChannel,
) -> ReminderOutcome {
    let Some(message) = compose_message(member, group, today_index) else {
        return ReminderOutcome::Clear;
    };

    match decide_route(opted_in, channel.permission(), channel.is_connected()) {
        ReminderRoute::Push => {
            channel.show(PUSH_TITLE, &message);
            ReminderOutcome::Pushed(message)
        }
        ReminderRoute::Banner => ReminderOutcome::Banner(message),
    }
}
