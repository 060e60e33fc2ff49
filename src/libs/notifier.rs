use crate::libs::mail::Mail;
use crate::libs::mailer::MailTransport;
use crate::libs::messages::Message;
use crate::msg_warning;

/// Sends a confirmation mail to a task owner. Delivery problems are reported
/// as a warning and never fail the surrounding command.
pub async fn notify_owner<M: MailTransport>(mailer: &M, mail: Mail) -> bool {
    match mailer.send(&mail).await {
        Ok(()) => true,
        Err(e) => {
            msg_warning!(Message::NotificationFailed {
                to: mail.to,
                error: e.to_string(),
            });
            false
        }
    }
}
