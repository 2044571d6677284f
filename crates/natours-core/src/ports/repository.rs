use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Tour, User};
use crate::error::RepoError;
use crate::query::ReadQuery;

/// Credential-record store.
///
/// Deactivated users are invisible to every lookup.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find an active user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find the active user whose stored reset digest equals `token_hash`
    /// and whose reset window is still open at `now`.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError>;

    /// Insert a new user. Fails with `RepoError::Constraint` on a taken email.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    /// Persist every field of an existing user.
    async fn save(&self, user: User) -> Result<User, RepoError>;

    /// Number of active users.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Active users matching the filter, sorted and windowed.
    async fn find_many(&self, query: &ReadQuery) -> Result<Vec<User>, RepoError>;
}

/// Tour catalogue store.
#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Tour>, RepoError>;

    /// Insert a new tour. Fails with `RepoError::Constraint` on a taken name.
    async fn create(&self, tour: Tour) -> Result<Tour, RepoError>;

    /// Persist every field of an existing tour. Fails with
    /// `RepoError::Constraint` when renamed onto another tour's name.
    async fn save(&self, tour: Tour) -> Result<Tour, RepoError>;

    /// Remove a tour. `false` when it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// Tours matching the filter, sorted and windowed.
    async fn find_many(&self, query: &ReadQuery) -> Result<Vec<Tour>, RepoError>;
}
