use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Authenticated, CookiePolicy, Role, Session, User, ACCESS_TOKEN_COOKIE};
use crate::error::DomainError;
use crate::ports::{
    EmailMessage, Mailer, PasswordService, ResetTokenService, TokenService, UserRepository,
};

use super::inputs::{provided, PasswordReset, PasswordUpdate, ProfileUpdate, SignIn, SignUp};
use super::{mask_email, AuthPolicy};

const MIN_PASSWORD_LEN: usize = 8;
const RESET_PATH: &str = "/api/v1/users/reset-password/";

/// Outcome of a forgot-password request. The raw token only ever leaves
/// through the mailer.
#[derive(Debug, Clone)]
pub struct ResetRequested {
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

/// The auth state machine, wired to its collaborators.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
    reset_tokens: Arc<dyn ResetTokenService>,
    mailer: Arc<dyn Mailer>,
    policy: AuthPolicy,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        reset_tokens: Arc<dyn ResetTokenService>,
        mailer: Arc<dyn Mailer>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
            reset_tokens,
            mailer,
            policy,
        }
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// Register a new user and open a session for them.
    pub async fn sign_up(&self, input: SignUp) -> Result<Session, DomainError> {
        let name = provided(&input.name)
            .ok_or_else(|| DomainError::validation("Please tell us your name"))?;
        let email = provided(&input.email)
            .ok_or_else(|| DomainError::validation("Please provide your email"))?;
        let email = normalize_email(email)?;
        let password = provided(&input.password)
            .ok_or_else(|| DomainError::validation("Please provide a password"))?;
        let password_confirm = provided(&input.password_confirm)
            .ok_or_else(|| DomainError::validation("Please confirm your password"))?;
        check_new_password(password, password_confirm, "Passwords are not the same")?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = User::new(name.trim().to_string(), email, password_hash)
            .with_photo(provided(&input.photo).map(str::to_string));
        let user = self.users.create(user).await?;

        tracing::info!(user_id = %user.id, email = %mask_email(&user.email), "User signed up");
        self.start_session(user)
    }

    /// Verify credentials and open a session.
    pub async fn sign_in(&self, input: SignIn) -> Result<Session, DomainError> {
        let email = provided(&input.email)
            .ok_or_else(|| DomainError::validation("Please provide an e-mail"))?;
        let password = provided(&input.password)
            .ok_or_else(|| DomainError::validation("Please provide a password"))?;
        let email = email.trim().to_lowercase();

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if self.passwords.verify(password, &user.password_hash)? => user,
            _ => {
                tracing::warn!(email = %mask_email(&email), "Rejected sign-in");
                return Err(DomainError::authentication("Incorrect email or password"));
            }
        };

        tracing::info!(user_id = %user.id, "User signed in");
        self.start_session(user)
    }

    /// Resolve the bearer token of an `Authorization` header to a user whose
    /// password has not changed since the token was issued.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<Authenticated, DomainError> {
        let header = authorization
            .ok_or_else(|| DomainError::authentication("Please provide authorization header"))?;
        let (scheme, token) = header.trim().split_once(' ').unwrap_or((header.trim(), ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(DomainError::authentication(
                "Please provide correct authorization header",
            ));
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::authentication("Please make sure you are logged in"));
        }

        let claims = self.tokens.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            DomainError::authentication("Access token has expired or been tampered with")
        })?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| DomainError::authentication("User does not exist"))?;

        if user.is_stale_token(claims.issued_at_ms) {
            tracing::warn!(user_id = %user.id, "Stale access token presented");
            return Err(DomainError::authentication(
                "Password updated since access token was generated. Please login again.",
            ));
        }

        Ok(Authenticated { user, claims })
    }

    /// Store a reset digest on the account and email the raw token. A failed
    /// delivery rolls the digest back so the request can simply be retried.
    pub async fn forgot_password(&self, email: Option<&str>) -> Result<ResetRequested, DomainError> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| DomainError::validation("Please provide an email address"))?
            .to_lowercase();

        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found("No user found with that email address"))?;

        let raw_token = self.reset_tokens.generate();
        let expires_at = Utc::now() + self.policy.reset_token_ttl;
        user.set_password_reset(self.reset_tokens.hash(&raw_token), expires_at);
        let mut user = self.users.save(user).await?;

        let message = self.reset_email(&user.email, &raw_token);
        if let Err(e) = self.mailer.send(&message).await {
            tracing::warn!(user_id = %user.id, error = %e, "Reset email failed, rolling back");
            user.clear_password_reset();
            if let Err(e) = self.users.save(user).await {
                tracing::error!(error = %e, "Failed to roll back password reset fields");
            }
            return Err(DomainError::Delivery(
                "Unable to send password reset email".to_string(),
            ));
        }

        tracing::info!(user_id = %user.id, "Password reset email sent");
        Ok(ResetRequested {
            message: format!(
                "Password reset link sent to {} (only valid for the next {} mins)",
                user.email,
                self.policy.reset_token_ttl.num_minutes()
            ),
            email: user.email,
            expires_at,
        })
    }

    /// Consume a reset token: set the new password, clear the reset fields and
    /// open a fresh session.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        input: PasswordReset,
    ) -> Result<Session, DomainError> {
        let token_hash = self.reset_tokens.hash(raw_token);
        let mut user = self
            .users
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
            .ok_or_else(|| {
                DomainError::not_found("Password reset token is either invalid or expired")
            })?;

        let password = provided(&input.password)
            .ok_or_else(|| DomainError::validation("Please provide a password"))?;
        let password_confirm = provided(&input.password_confirm)
            .ok_or_else(|| DomainError::validation("Please confirm your password"))?;
        check_new_password(password, password_confirm, "Passwords are not the same")?;

        user.change_password(self.passwords.hash(password)?);
        user.clear_password_reset();
        let user = self.users.save(user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        self.start_session(user)
    }

    /// Change the password of an authenticated user after re-checking the
    /// current one. Earlier tokens go stale.
    pub async fn update_password(
        &self,
        auth: Authenticated,
        input: PasswordUpdate,
    ) -> Result<Session, DomainError> {
        let old_password = provided(&input.old_password)
            .ok_or_else(|| DomainError::validation("Current password is missing"))?;
        let new_password = provided(&input.new_password)
            .ok_or_else(|| DomainError::validation("Proposed password is missing"))?;
        let new_password_confirm = provided(&input.new_password_confirm)
            .ok_or_else(|| DomainError::validation("Proposed password confirm is missing"))?;
        check_new_password(
            new_password,
            new_password_confirm,
            "Please make sure newPassword and newPasswordConfirm match",
        )?;

        let mut user = auth.user;
        if !self.passwords.verify(old_password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Rejected password update");
            return Err(DomainError::authentication("Existing password is not correct"));
        }

        user.change_password(self.passwords.hash(new_password)?);
        let user = self.users.save(user).await?;

        tracing::info!(user_id = %user.id, "Password updated");
        self.start_session(user)
    }

    /// Change name and/or email of the authenticated user.
    pub async fn update_profile(
        &self,
        auth: Authenticated,
        input: ProfileUpdate,
    ) -> Result<User, DomainError> {
        if input.password.is_some() {
            return Err(DomainError::validation(
                "Please use PATCH api/v1/users/update-password to update password",
            ));
        }
        if input.password_confirm.is_some() {
            return Err(DomainError::validation(
                "Please use PATCH api/v1/users/update-password to update passwordConfirm",
            ));
        }

        let mut user = auth.user;
        if let Some(name) = provided(&input.name) {
            user.name = name.trim().to_string();
        }
        if let Some(email) = provided(&input.email) {
            let email = normalize_email(email)?;
            if email != user.email {
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(DomainError::Duplicate("Email already registered".to_string()));
                }
                user.email = email;
            }
        }
        user.updated_at = Utc::now();

        Ok(self.users.save(user).await?)
    }

    /// Soft delete: the account disappears from every lookup.
    pub async fn deactivate(&self, auth: Authenticated) -> Result<User, DomainError> {
        let mut user = auth.user;
        user.is_active = false;
        user.updated_at = Utc::now();

        let user = self.users.save(user).await?;
        tracing::info!(user_id = %user.id, "User deactivated");
        Ok(user)
    }

    fn start_session(&self, user: User) -> Result<Session, DomainError> {
        let access_token = self.tokens.issue_token(user.id)?;
        let cookie = CookiePolicy {
            name: ACCESS_TOKEN_COOKIE,
            value: access_token.clone(),
            expires: Utc::now() + self.policy.cookie_ttl,
            secure: self.policy.secure_cookies,
            http_only: true,
        };

        Ok(Session {
            user,
            access_token,
            cookie,
        })
    }

    fn reset_email(&self, to: &str, raw_token: &str) -> EmailMessage {
        let url = format!(
            "{}{}{}",
            self.policy.public_url.trim_end_matches('/'),
            RESET_PATH,
            raw_token
        );
        let minutes = self.policy.reset_token_ttl.num_minutes();

        EmailMessage {
            from: self.policy.mail_from.clone(),
            to: to.to_string(),
            subject: format!("Natours - Password Reset (Only valid for {minutes} mins)"),
            body: format!(
                "Forgot your password? Submit a PATCH request with your new password and \
                 passwordConfirm to {url}\n\
                 If you didn't request a password reset, please ignore this email.\n"
            ),
        }
    }
}

/// Role check for an already authenticated request.
pub fn authorize(auth: &Authenticated, allowed: &[Role]) -> Result<(), DomainError> {
    if allowed.contains(&auth.user.role) {
        Ok(())
    } else {
        tracing::warn!(user_id = %auth.user.id, role = %auth.user.role, "Forbidden");
        Err(DomainError::Authorization(
            "User not allowed to perform this operation".to_string(),
        ))
    }
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::validation("Please provide a valid email")),
    }
}

fn check_new_password(
    password: &str,
    confirm: &str,
    mismatch: &'static str,
) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirm {
        return Err(DomainError::conflict(mismatch));
    }
    Ok(())
}
