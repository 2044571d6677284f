use async_trait::async_trait;

use natours_core::auth::mask_email;
use natours_core::ports::{EmailMessage, MailError, Mailer};

/// Writes a summary of outgoing mail to the log instead of sending it.
/// The body is never logged: it carries live reset tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            body_len = message.body.len(),
            "Email (not sent, log transport)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_body_stays_out_of_the_log() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let message = EmailMessage {
            from: "admin@natours.com".into(),
            to: "jane@example.com".into(),
            subject: "Natours - Password Reset".into(),
            body: "submit to /api/v1/users/reset-password/deadbeefcafe".into(),
        };
        LogMailer.send(&message).await.unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Natours - Password Reset"));
        assert!(output.contains("j***@example.com"));
        assert!(!output.contains("deadbeefcafe"));
    }
}
