//! In-process fakes of the auth ports.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AccessClaims, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, EmailMessage, MailError, Mailer, PasswordService, ResetTokenService, TokenService,
    UserRepository,
};
use crate::query::ReadQuery;

use super::{AuthPolicy, AuthService};

#[derive(Default)]
pub struct FakeUsers(Mutex<Vec<User>>);

impl FakeUsers {
    pub fn by_email(&self, email: &str) -> Option<User> {
        self.0.lock().unwrap().iter().find(|u| u.email == email).cloned()
    }

    pub fn put(&self, user: User) {
        let mut users = self.0.lock().unwrap();
        users.retain(|u| u.id != user.id);
        users.push(user);
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.is_active && pred(u))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        Ok(self.find(|u| u.has_valid_reset(token_hash, now)))
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        self.put(user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.put(user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.0.lock().unwrap().iter().filter(|u| u.is_active).count() as u64)
    }

    async fn find_many(&self, _query: &ReadQuery) -> Result<Vec<User>, RepoError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// Tokens of the form `<id>.<iat millis>.<n>`, valid for an hour.
#[derive(Default)]
pub struct FakeTokens(AtomicU64);

impl TokenService for FakeTokens {
    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let n = self.0.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{user_id}.{}.{n}", Utc::now().timestamp_millis()))
    }

    fn verify_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let invalid = || AuthError::InvalidToken(token.to_string());
        let mut parts = token.split('.');
        let user_id = parts
            .next()
            .and_then(|p| Uuid::parse_str(p).ok())
            .ok_or_else(invalid)?;
        let issued_at_ms: i64 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let issued_at = issued_at_ms / 1000;
        let expires_at = issued_at + self.expiration_seconds();
        if expires_at < Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(AccessClaims {
            user_id,
            issued_at,
            issued_at_ms,
            expires_at,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

pub struct FakePasswords;

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

#[derive(Default)]
pub struct FakeResetTokens(Mutex<Vec<String>>);

impl FakeResetTokens {
    pub fn last_raw(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl ResetTokenService for FakeResetTokens {
    fn generate(&self) -> String {
        let mut issued = self.0.lock().unwrap();
        let raw = format!("raw-{}", issued.len());
        issued.push(raw.clone());
        raw
    }

    fn hash(&self, raw_token: &str) -> String {
        format!("digest:{raw_token}")
    }
}

#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl FakeMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(MailError::Transport("connection refused".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct Harness {
    pub service: AuthService,
    pub users: Arc<FakeUsers>,
    pub reset_tokens: Arc<FakeResetTokens>,
    pub mailer: Arc<FakeMailer>,
}

pub fn harness() -> Harness {
    harness_with_policy(AuthPolicy::default())
}

pub fn harness_with_policy(policy: AuthPolicy) -> Harness {
    let users = Arc::new(FakeUsers::default());
    let reset_tokens = Arc::new(FakeResetTokens::default());
    let mailer = Arc::new(FakeMailer::default());

    let service = AuthService::new(
        users.clone(),
        Arc::new(FakeTokens::default()),
        Arc::new(FakePasswords),
        reset_tokens.clone(),
        mailer.clone(),
        policy,
    );

    Harness {
        service,
        users,
        reset_tokens,
        mailer,
    }
}
