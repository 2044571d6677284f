//! In-memory stores - used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use natours_core::auth::mask_email;
use natours_core::domain::{Tour, User};
use natours_core::error::RepoError;
use natours_core::ports::{TourRepository, UserRepository};
use natours_core::query::ReadQuery;

use super::filtering::{compare_records, matches_filter, FieldKind, FieldValue, Filterable};

/// In-memory user store using a HashMap behind an async RwLock.
///
/// Filters are evaluated with the shared typed matcher. Note: Data is lost
/// on process restart.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    async fn find_active(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        let store = self.store.read().await;
        store.values().find(|u| u.is_active && pred(u)).cloned()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.find_active(|u| u.id == id).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        Ok(self.find_active(|u| u.email == email).await)
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        Ok(self.find_active(|u| u.has_valid_reset(token_hash, now)).await)
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if !store.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|u| u.is_active).count() as u64)
    }

    async fn find_many(&self, query: &ReadQuery) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;

        let mut users: Vec<User> = store
            .values()
            .filter(|u| u.is_active && matches_filter(*u, &query.filter))
            .cloned()
            .collect();
        users.sort_by(|a, b| compare_records(a, b, &query.sort));

        Ok(users
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect())
    }
}

impl Filterable for User {
    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            "id" => Some(FieldKind::Uuid),
            "name" | "email" | "photo" | "role" => Some(FieldKind::Text),
            "createdAt" | "updatedAt" => Some(FieldKind::Time),
            _ => None,
        }
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "email" => Some(FieldValue::Text(self.email.clone())),
            "photo" => self.photo.clone().map(FieldValue::Text),
            "role" => Some(FieldValue::Text(self.role.to_string())),
            "createdAt" => Some(FieldValue::Time(self.created_at)),
            "updatedAt" => Some(FieldValue::Time(self.updated_at)),
            _ => None,
        }
    }
}

/// In-memory tour catalogue with unique names.
pub struct InMemoryTourRepository {
    store: RwLock<HashMap<Uuid, Tour>>,
}

impl InMemoryTourRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTourRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn name_taken(store: &HashMap<Uuid, Tour>, tour: &Tour) -> bool {
    store.values().any(|t| t.id != tour.id && t.name == tour.name)
}

#[async_trait]
impl TourRepository for InMemoryTourRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tour>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|t| t.name == name).cloned())
    }

    async fn create(&self, tour: Tour) -> Result<Tour, RepoError> {
        let mut store = self.store.write().await;

        if name_taken(&store, &tour) {
            return Err(RepoError::Constraint(format!("Duplicate tour name: {}", tour.name)));
        }

        store.insert(tour.id, tour.clone());
        Ok(tour)
    }

    async fn save(&self, tour: Tour) -> Result<Tour, RepoError> {
        let mut store = self.store.write().await;

        if !store.contains_key(&tour.id) {
            return Err(RepoError::NotFound);
        }
        if name_taken(&store, &tour) {
            return Err(RepoError::Constraint(format!("Duplicate tour name: {}", tour.name)));
        }

        store.insert(tour.id, tour.clone());
        Ok(tour)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.store.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }

    async fn find_many(&self, query: &ReadQuery) -> Result<Vec<Tour>, RepoError> {
        let store = self.store.read().await;

        let mut tours: Vec<Tour> = store
            .values()
            .filter(|t| matches_filter(*t, &query.filter))
            .cloned()
            .collect();
        tours.sort_by(|a, b| compare_records(a, b, &query.sort));

        Ok(tours
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect())
    }
}

impl Filterable for Tour {
    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            "id" => Some(FieldKind::Uuid),
            "name" | "slug" | "difficulty" | "summary" | "description" | "imageCover" => {
                Some(FieldKind::Text)
            }
            "duration" | "maxGroupSize" | "ratingsAverage" | "ratingsQuantity" | "price"
            | "priceDiscount" => Some(FieldKind::Number),
            "secretTour" => Some(FieldKind::Bool),
            "createdAt" | "updatedAt" => Some(FieldKind::Time),
            _ => None,
        }
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::Uuid(self.id),
            "name" => FieldValue::Text(self.name.clone()),
            "slug" => FieldValue::Text(self.slug.clone()),
            "difficulty" => FieldValue::Text(self.difficulty.to_string()),
            "summary" => FieldValue::Text(self.summary.clone()),
            "description" => FieldValue::Text(self.description.clone()?),
            "imageCover" => FieldValue::Text(self.image_cover.clone()),
            "duration" => FieldValue::Number(f64::from(self.duration)),
            "maxGroupSize" => FieldValue::Number(f64::from(self.max_group_size)),
            "ratingsAverage" => FieldValue::Number(self.ratings_average),
            "ratingsQuantity" => FieldValue::Number(f64::from(self.ratings_quantity)),
            "price" => FieldValue::Number(self.price),
            "priceDiscount" => FieldValue::Number(self.price_discount?),
            "secretTour" => FieldValue::Bool(self.is_secret_tour),
            "createdAt" => FieldValue::Time(self.created_at),
            "updatedAt" => FieldValue::Time(self.updated_at),
            _ => return None,
        };
        Some(value)
    }
}
