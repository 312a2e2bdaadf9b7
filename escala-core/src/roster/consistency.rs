//! Roster consistency engine
//!
//! Registered participants carry a denormalized member snapshot, so
//! every member mutation fans out across all groups, all days and all
//! four role lists. The functions here are pure over the group slice
//! and idempotent: applying the same update twice changes nothing the
//! second time. The store calls them synchronously inside its member
//! mutations, so no stale snapshot survives a write.

use shared::models::{Member, ScheduleGroup};

/// Refresh name and snapshot of every registered occurrence of the
/// member. Returns how many participant entries were touched.
pub fn propagate_member_update(groups: &mut [ScheduleGroup], updated: &Member) -> usize {
    let mut touched = 0;
    for group in groups.iter_mut() {
        for day in group.schedule.iter_mut() {
            for list in day.role_lists_mut() {
                for p in list.iter_mut() {
                    if p.is_registered && p.id == updated.id {
                        p.name = updated.name.clone();
                        p.member_data = Some(updated.clone());
                        touched += 1;
                    }
                }
            }
        }
    }
    touched
}

/// Narrower variant for avatar changes: only the snapshot's avatar is
/// rewritten, names are left alone.
pub fn propagate_avatar_update(
    groups: &mut [ScheduleGroup],
    member_id: &str,
    avatar: Option<&str>,
) -> usize {
    let mut touched = 0;
    for group in groups.iter_mut() {
        for day in group.schedule.iter_mut() {
            for list in day.role_lists_mut() {
                for p in list.iter_mut() {
                    if p.is_registered && p.id == member_id {
                        if let Some(data) = p.member_data.as_mut() {
                            data.avatar = avatar.map(str::to_owned);
                            touched += 1;
                        }
                    }
                }
            }
        }
    }
    touched
}

/// Remove every registered occurrence of the member from every role
/// list. Unregistered participants are never affected, even when their
/// display name matches the deleted member's.
pub fn remove_member_from_rosters(groups: &mut [ScheduleGroup], member_id: &str) -> usize {
    let mut removed = 0;
    for group in groups.iter_mut() {
        for day in group.schedule.iter_mut() {
            for list in day.role_lists_mut() {
                let before = list.len();
                list.retain(|p| !(p.is_registered && p.id == member_id));
                removed += before - list.len();
            }
        }
    }
    removed
}
