//! New-assignment diff and admin notices
//!
//! When an editor saves a day, the participants that were just added
//! (present in the new day, absent from the previous one, id set
//! difference per role list) are reported to every administrator
//! through the [`Mailer`](super::mailer::Mailer) boundary.

use shared::models::{Member, ScheduleDay, ScheduleParticipant};

use super::mailer::Mailer;

/// One newly added assignment on a saved day.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub participant: ScheduleParticipant,
    pub role: &'static str,
    pub event: String,
    pub day_name: String,
}

fn added<'a>(
    before: &[ScheduleParticipant],
    after: &'a [ScheduleParticipant],
) -> impl Iterator<Item = &'a ScheduleParticipant> {
    after
        .iter()
        .filter(move |p| !before.iter().any(|prev| prev.id == p.id))
}

/// Participants newly added to the reminder-relevant role lists,
/// doorkeepers first.
pub fn diff_new_assignments(before: &ScheduleDay, after: &ScheduleDay) -> Vec<NewAssignment> {
    let mut assignments = Vec::new();
    // The mail label for hymn singers carries the instrument suffix,
    // unlike the reminder wording.
    let roles: [(&'static str, &[ScheduleParticipant], &[ScheduleParticipant]); 2] = [
        ("Porteiro(a)", &before.doorkeepers, &after.doorkeepers),
        ("Cantor(a) (Harpa)", &before.hymn_singers, &after.hymn_singers),
    ];

    for (role, prev, next) in roles {
        for p in added(prev, next) {
            assignments.push(NewAssignment {
                participant: p.clone(),
                role,
                event: after.event.clone(),
                day_name: after.day_name.clone(),
            });
        }
    }
    assignments
}

/// Mail every admin a notice listing the new assignments. No-op when
/// either list is empty.
pub fn notify_admins(mailer: &dyn Mailer, admins: &[&Member], assignments: &[NewAssignment]) {
    if admins.is_empty() || assignments.is_empty() {
        return;
    }

    let details: Vec<String> = assignments
        .iter()
        .map(|a| {
            format!(
                "- {} foi escalado(a) como {} para {} na {}.",
                a.participant.name, a.role, a.event, a.day_name
            )
        })
        .collect();

    let body = format!(
        "A escala foi atualizada recentemente.\n\
         As seguintes novas atribuições foram feitas:\n\n\
         {}\n\n\
         Acesse o sistema para ver os detalhes completos.",
        details.join("\n")
    );

    for admin in admins {
        mailer.send(&admin.email, &admin.name, "Atualização na Escala da Igreja", &body);
    }
}
