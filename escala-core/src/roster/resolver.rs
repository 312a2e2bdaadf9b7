//! Participant resolver
//!
//! Maps what an editor typed into a role slot onto either a registered
//! member (exact name match) or a new unregistered participant. All
//! name comparison is trimmed and case-insensitive.

use shared::models::{Member, ScheduleParticipant};

/// Members whose name contains the query, excluding those already in
/// the list. Empty query matches everyone not yet selected.
pub fn suggestions<'a>(
    query: &str,
    all_members: &'a [Member],
    already_selected: &[ScheduleParticipant],
) -> Vec<&'a Member> {
    let query = query.trim().to_lowercase();
    all_members
        .iter()
        .filter(|m| !already_selected.iter().any(|p| p.id == m.id))
        .filter(|m| m.name.to_lowercase().contains(&query))
        .collect()
}

/// Resolve a typed candidate into a participant, or `None` when the
/// input is blank or a duplicate of something already selected.
pub fn resolve_selection(
    candidate_text: &str,
    all_members: &[Member],
    already_selected: &[ScheduleParticipant],
) -> Option<ScheduleParticipant> {
    let text = candidate_text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(member) = all_members
        .iter()
        .find(|m| m.name.trim().eq_ignore_ascii_case(text))
    {
        if already_selected.iter().any(|p| p.id == member.id) {
            return None;
        }
        return Some(ScheduleParticipant::registered(member));
    }

    if already_selected
        .iter()
        .any(|p| p.name.trim().eq_ignore_ascii_case(text))
    {
        return None;
    }

    Some(ScheduleParticipant::unregistered(text))
}

/// Drop the participant with the given id. Pure list edit, the member
/// record (if any) is untouched.
pub fn remove_participant(list: &mut Vec<ScheduleParticipant>, id: &str) {
    list.retain(|p| p.id != id);
}
