//! Built-in default dataset
//!
//! Used whenever a state key is missing or unreadable: a first launch,
//! a wiped state file and a corrupt value all land here. The dataset
//! ships eight regular members, one administrator and a single group
//! ("Sede") with a pre-filled sample week.

use shared::models::{
    Member, MemberRole, ScheduleDay, ScheduleGroup, ScheduleParticipant, UserAccount,
};

/// Shared seed password for every default account.
pub const SEED_PASSWORD: &str = "password123";

/// Default announcement board text.
pub const INITIAL_ANNOUNCEMENTS: &str = "Bem-vindo ao nosso quadro de avisos!\n- Próximo sábado teremos um café da manhã especial.\n- A campanha de doação de agasalhos vai até o final do mês. Participe!";

/// Id of the single default group.
pub const DEFAULT_GROUP_ID: &str = "g1";

fn member(id: &str, name: &str, phone: &str, email: &str) -> Member {
    Member {
        id: id.into(),
        name: name.into(),
        phone: Some(phone.into()),
        email: email.into(),
        role: MemberRole::Member,
        avatar: None,
    }
}

/// The nine seed members (m1..m8 plus the administrator).
pub fn default_members() -> Vec<Member> {
    vec![
        member("m1", "João Alves", "(11) 98765-4321", "joao.alves@example.com"),
        member("m2", "Maria Costa", "(21) 91234-5678", "maria.costa@example.com"),
        member("m3", "Pedro Lima", "(31) 98888-7777", "pedro.lima@example.com"),
        member("m4", "Ana Souza", "(41) 99999-8888", "ana.souza@example.com"),
        member("m5", "Tiago Pereira", "(51) 97654-3210", "tiago.pereira@example.com"),
        member("m6", "Sara Ferreira", "(61) 96543-2109", "sara.ferreira@example.com"),
        member("m7", "Lucas Martins", "(71) 95432-1098", "lucas.martins@example.com"),
        member("m8", "Carla Dias", "(81) 94321-0987", "carla.dias@example.com"),
        Member {
            id: "admin".into(),
            name: "Administrador".into(),
            phone: None,
            email: "admin@example.com".into(),
            role: MemberRole::Admin,
            avatar: None,
        },
    ]
}

/// One login account per seed member, all sharing [`SEED_PASSWORD`].
///
/// The argon2 hash is computed once and cloned: hashing is deliberately
/// slow and nine fresh hashes would make a first launch crawl.
pub fn default_users() -> Vec<UserAccount> {
    let hash = UserAccount::hash_password(SEED_PASSWORD)
        .unwrap_or_else(|_| String::new());

    default_members()
        .into_iter()
        .map(|m| UserAccount {
            email: m.email,
            password: hash.clone(),
            member_id: m.id,
        })
        .collect()
}

/// The single default group with a pre-filled sample week.
pub fn default_groups() -> Vec<ScheduleGroup> {
    let members = default_members();
    let p = |i: usize| ScheduleParticipant::registered(&members[i]);

    let day = |id: &str,
               day_name: &str,
               event: &str,
               doorkeepers: Vec<ScheduleParticipant>,
               hymn_singers: Vec<ScheduleParticipant>| {
        ScheduleDay {
            id: id.into(),
            day_name: day_name.into(),
            event: event.into(),
            active: !event.is_empty(),
            doorkeepers,
            hymn_singers,
            worship_leaders: Vec::new(),
            preachers: Vec::new(),
        }
    };

    let schedule = vec![
        day("d1", "Domingo", "Culto de Celebração", vec![p(0), p(1)], vec![p(3), p(5)]),
        day("d2", "Segunda-feira", "", vec![], vec![]),
        day("d3", "Terça-feira", "Culto de Ensino", vec![p(2)], vec![p(4)]),
        day("d4", "Quarta-feira", "", vec![], vec![]),
        day("d5", "Quinta-feira", "Círculo de Oração", vec![p(4), p(6)], vec![p(1)]),
        day("d6", "Sexta-feira", "", vec![], vec![]),
        day("d7", "Sábado", "Ensaio do Louvor", vec![], vec![p(3), p(5), p(4)]),
    ];

    vec![ScheduleGroup {
        id: DEFAULT_GROUP_ID.into(),
        name: "Sede".into(),
        schedule,
        announcements: INITIAL_ANNOUNCEMENTS.into(),
    }]
}
