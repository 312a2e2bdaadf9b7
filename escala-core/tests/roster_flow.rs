//! End-to-end flow over file-backed storage: sign-up, scheduling with
//! the participant resolver, member mutations fanning out to rosters,
//! reminders, and state surviving a full reopen.

use std::sync::{Arc, Mutex};

use escala_core::core::{AppState, Config};
use escala_core::db::StateStorage;
use escala_core::roster::resolver;
use escala_core::services::push::{PushChannel, PushPermission};
use escala_core::services::reminder::ReminderOutcome;
use escala_core::Mailer;
use shared::models::MemberUpdate;

#[derive(Default)]
struct CapturingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl Mailer for CapturingMailer {
    fn send(&self, to_email: &str, _to_name: &str, _subject: &str, body: &str) {
        self.sent.lock().unwrap().push((to_email.into(), body.into()));
    }
}

struct GrantedChannel {
    shown: Mutex<Vec<(String, String)>>,
}

impl PushChannel for GrantedChannel {
    fn permission(&self) -> PushPermission {
        PushPermission::Granted
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn show(&self, title: &str, body: &str) {
        self.shown.lock().unwrap().push((title.into(), body.into()));
    }
}

fn open_state(
    dir: &tempfile::TempDir,
    mailer: Arc<CapturingMailer>,
    push: Arc<GrantedChannel>,
) -> AppState {
    let config = Config::with_work_dir(dir.path().to_string_lossy().to_string());
    let storage = StateStorage::open(config.state_file()).unwrap();
    AppState::new(config, storage, mailer, push).unwrap()
}

#[test]
fn full_roster_flow_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Arc::new(CapturingMailer::default());
    let push = Arc::new(GrantedChannel {
        shown: Mutex::new(Vec::new()),
    });

    {
        let state = open_state(&dir, mailer.clone(), push.clone());

        // Sign up a new member; welcome mail goes out and the session opens
        let outcome = state
            .auth
            .sign_up("Rafael Gomes", "rafael@example.com", "escala2024")
            .unwrap();
        assert!(outcome.success);
        assert_eq!(state.store.session_member().unwrap().name, "Rafael Gomes");
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);

        // Schedule Rafael and a free-text helper on Monday via the resolver
        let group = state.store.active_group();
        let members = state.store.members();
        let mut monday = group.day("d2").unwrap().clone();
        monday.active = true;
        monday.event = "Vigília".into();

        let rafael = resolver::resolve_selection("rafael gomes", &members, &monday.doorkeepers)
            .expect("exact name should resolve");
        assert!(rafael.is_registered);
        monday.doorkeepers.push(rafael);

        let helper = resolver::resolve_selection("Visitante Marcos", &members, &monday.doorkeepers)
            .expect("free text should resolve");
        assert!(!helper.is_registered);
        monday.doorkeepers.push(helper);

        state.save_day(&group.id, monday).unwrap();

        // Admin notice about the two new doorkeepers reached the seed admin
        let sent = mailer.sent.lock().unwrap();
        let notice = &sent.last().unwrap().1;
        assert!(notice.contains("Rafael Gomes foi escalado(a) como Porteiro(a)"));
        assert!(notice.contains("Visitante Marcos foi escalado(a) como Porteiro(a)"));
        drop(sent);

        // Sunday evening: Monday's doorkeeper gets a push reminder
        state.store.set_push_enabled(true).unwrap();
        let outcome = state.evaluate_reminder_at(0);
        assert!(matches!(outcome, ReminderOutcome::Pushed(_)));
        let shown = push.shown.lock().unwrap();
        assert_eq!(shown.last().unwrap().0, "Lembrete de Tarefa");
        assert!(shown.last().unwrap().1.contains("Porteiro(a)"));
    }

    // Reopen from the same files: everything persisted
    {
        let push = Arc::new(GrantedChannel {
            shown: Mutex::new(Vec::new()),
        });
        let state = open_state(&dir, mailer.clone(), push);

        // Auto-remembered sign-up restores the session
        let restored = state.auth.restore_session().unwrap().unwrap();
        assert_eq!(restored.name, "Rafael Gomes");

        let group = state.store.active_group();
        let monday = group.day("d2").unwrap();
        assert_eq!(monday.doorkeepers.len(), 2);

        // Rename fan-out reaches the persisted roster entry
        let rafael_id = restored.id.clone();
        state
            .store
            .update_member(
                &rafael_id,
                &MemberUpdate {
                    name: Some("Rafael G. Gomes".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let monday = state.store.active_group();
        let entry = monday
            .day("d2")
            .unwrap()
            .doorkeepers
            .iter()
            .find(|p| p.id == rafael_id)
            .unwrap();
        assert_eq!(entry.name, "Rafael G. Gomes");

        // Deleting the member leaves the unregistered helper in place
        state.store.delete_member(&rafael_id).unwrap();
        let monday = state.store.active_group();
        let doorkeepers = &monday.day("d2").unwrap().doorkeepers;
        assert_eq!(doorkeepers.len(), 1);
        assert!(!doorkeepers[0].is_registered);
        assert_eq!(doorkeepers[0].name, "Visitante Marcos");
        assert!(state.store.session_member().is_none());
    }
}
