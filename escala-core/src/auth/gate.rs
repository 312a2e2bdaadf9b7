//! Auth gate
//!
//! Thin flow layer over the store: login, session restore, sign-up,
//! password reset and logout. Everything user-facing is reported as an
//! [`AuthOutcome`] value with a Portuguese message; `AppError` only
//! escapes for storage failures. Email comparison is case-insensitive
//! across every flow.

use std::sync::Arc;
use validator::ValidateEmail;

use shared::models::{Member, MemberRole, UserAccount};
use shared::util::unique_id;

use crate::core::{AppError, AppResult};
use crate::services::mailer::{Mailer, send_welcome_mail};
use crate::store::RosterStore;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};

/// Result of an auth flow, shaped for direct display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl AuthOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Session/auth gate.
pub struct AuthGate {
    store: Arc<RosterStore>,
    mailer: Arc<dyn Mailer>,
}

impl AuthGate {
    pub fn new(store: Arc<RosterStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    /// Verify credentials and open a session. `remember` persists the
    /// email for the next start; otherwise any remembered email is
    /// cleared. Returns whether the login succeeded.
    pub fn login(&self, email: &str, password: &str, remember: bool) -> AppResult<bool> {
        let email = email.trim();
        let Some(account) = self.store.account_by_email(email) else {
            return Ok(false);
        };
        // A malformed stored hash counts as a failed login, not an error
        if !account.verify_password(password).unwrap_or(false) {
            return Ok(false);
        }
        let Some(member) = self.store.member_by_id(&account.member_id) else {
            return Ok(false);
        };

        self.store.set_session(member);
        self.store
            .set_remembered_email(remember.then(|| account.email.clone()))?;
        Ok(true)
    }

    /// Re-open the session for the remembered email, if it still
    /// resolves to an account and a member.
    pub fn restore_session(&self) -> AppResult<Option<Member>> {
        let Some(email) = self.store.remembered_email() else {
            return Ok(None);
        };
        let member = self
            .store
            .account_by_email(&email)
            .and_then(|account| self.store.member_by_id(&account.member_id));

        if let Some(member) = &member {
            self.store.set_session(member.clone());
        }
        Ok(member)
    }

    /// Register a new member with login credentials. On success the new
    /// member is signed in, auto-remembered and welcomed by mail.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Ok(AuthOutcome::fail("Informe um nome válido."));
        }
        if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
            return Ok(AuthOutcome::fail("Informe um endereço de e-mail válido."));
        }
        if self.store.account_by_email(email).is_some()
            || self.store.member_by_email(email).is_some()
        {
            return Ok(AuthOutcome::fail("Este e-mail já está em uso."));
        }
        if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
            return Ok(AuthOutcome::fail("A senha deve ter pelo menos 6 caracteres."));
        }
        if password.eq_ignore_ascii_case(name) {
            return Ok(AuthOutcome::fail(
                "A senha não pode ser igual ao seu nome. Escolha uma senha mais segura.",
            ));
        }
        if password.eq_ignore_ascii_case(email) {
            return Ok(AuthOutcome::fail(
                "A senha não pode ser igual ao seu e-mail. Escolha uma senha mais segura.",
            ));
        }

        let password_hash = UserAccount::hash_password(password)
            .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

        let member = Member {
            id: unique_id("m"),
            name: name.to_string(),
            phone: None,
            email: email.to_string(),
            role: MemberRole::Member,
            avatar: None,
        };
        let account = UserAccount {
            email: email.to_string(),
            password: password_hash,
            member_id: member.id.clone(),
        };

        self.store
            .create_member_with_account(member.clone(), account)?;
        self.store.set_session(member.clone());
        self.store.set_remembered_email(Some(email.to_string()))?;
        send_welcome_mail(self.mailer.as_ref(), email, &member.name);

        Ok(AuthOutcome::ok())
    }

    /// Start the password reset flow for a known email.
    pub fn request_password_reset(&self, email: &str) -> AuthOutcome {
        let email = email.trim();
        if self.store.account_by_email(email).is_some() {
            self.store.set_reset_email(Some(email.to_string()));
            AuthOutcome::ok()
        } else {
            AuthOutcome::fail("E-mail não encontrado em nosso sistema.")
        }
    }

    /// Complete the reset flow by replacing the stored hash for the
    /// stashed email.
    pub fn reset_password(&self, new_password: &str) -> AppResult<AuthOutcome> {
        let Some(email) = self.store.reset_email() else {
            return Ok(AuthOutcome::fail("Ocorreu um erro. Tente novamente."));
        };
        if new_password.len() < MIN_PASSWORD_LEN || new_password.len() > MAX_PASSWORD_LEN {
            return Ok(AuthOutcome::fail(
                "Para sua segurança, a senha deve ter no mínimo 6 caracteres.",
            ));
        }
        if new_password.eq_ignore_ascii_case(&email) {
            return Ok(AuthOutcome::fail(
                "Por segurança, sua nova senha não pode ser igual ao seu endereço de e-mail. Escolha uma senha diferente.",
            ));
        }

        let hash = UserAccount::hash_password(new_password)
            .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;
        // The account can vanish between request and reset (deleted
        // from another instance); that is a flow failure, not an error
        match self.store.set_password(&email, hash) {
            Ok(()) => {
                self.store.set_reset_email(None);
                Ok(AuthOutcome::ok())
            }
            Err(AppError::NotFound(_)) => {
                self.store.set_reset_email(None);
                Ok(AuthOutcome::fail("Ocorreu um erro. Tente novamente."))
            }
            Err(e) => Err(e),
        }
    }

    /// Close the session and forget the remembered email.
    pub fn logout(&self) -> AppResult<()> {
        self.store.clear_session();
        self.store.set_remembered_email(None)?;
        Ok(())
    }
}
