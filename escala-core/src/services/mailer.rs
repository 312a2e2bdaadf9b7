//! Outbound mail boundary
//!
//! Mail here is best-effort: welcome messages and admin notices. A
//! delivery failure must never break the mutation that triggered it,
//! so [`Mailer::send`] has no error channel and implementations handle
//! failures internally.

/// Outbound mail capability.
pub trait Mailer: Send + Sync {
    fn send(&self, to_email: &str, to_name: &str, subject: &str, body: &str);
}

/// Default mailer: writes every message to the log instead of sending
/// it anywhere (simulation mode).
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to_email: &str, to_name: &str, subject: &str, body: &str) {
        tracing::info!(
            to = %to_email,
            name = %to_name,
            subject = %subject,
            "Mail (simulation mode):\n{body}"
        );
    }
}

/// Welcome mail sent after a successful sign-up.
pub fn send_welcome_mail(mailer: &dyn Mailer, to_email: &str, user_name: &str) {
    let body = "Seja muito bem-vindo(a) ao nosso App de Escala!\n\n\
        Seu cadastro foi realizado com sucesso. A partir de agora, você poderá:\n\
        - Visualizar a escala de trabalho semanal.\n\
        - Verificar quando você foi escalado como Porteiro(a) ou Cantor(a).\n\
        - Acompanhar os avisos e novidades no quadro de avisos.\n\n\
        Estamos felizes em tê-lo(a) conosco servindo no ministério.\n\n\
        Se tiver qualquer dúvida, procure a administração.\n\n\
        Deus abençoe!";

    mailer.send(to_email, user_name, "Bem-vindo(a) à Escala da Igreja!", body);
}
