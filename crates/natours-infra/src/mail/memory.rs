use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use natours_core::ports::{EmailMessage, MailError, Mailer};

/// Keeps every message in an outbox. Can be told to fail the next send.
#[derive(Default)]
pub struct InMemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
    fail_next: AtomicBool,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.clone()
    }

    pub async fn last(&self) -> Option<EmailMessage> {
        self.outbox.lock().await.last().cloned()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(MailError::Transport("simulated failure".to_string()));
        }

        self.outbox.lock().await.push(message.clone());
        Ok(())
    }
}
