//! PostgreSQL repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use natours_core::auth::mask_email;
use natours_core::domain::{Tour, User};
use natours_core::error::RepoError;
use natours_core::ports::{TourRepository, UserRepository};
use natours_core::query::{ReadQuery, SortSpec};

use super::entity::tour::{self, Entity as TourEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::sql_filter::condition_for;

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    pub(crate) db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn find_one(&self, condition: Condition) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

/// Unique-index violations become `Constraint(duplicate)`.
fn query_error(e: sea_orm::DbErr, duplicate: &str) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint(duplicate.to_string())
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.find_one(Condition::all().add(user::Column::Id.eq(id))).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        self.find_one(Condition::all().add(user::Column::Email.eq(email)))
            .await
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        self.find_one(
            Condition::all()
                .add(user::Column::PasswordResetToken.eq(token_hash))
                .add(user::Column::PasswordResetExpires.gt(now)),
        )
        .await
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = user.into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| query_error(e, EMAIL_TAKEN))?;
        Ok(model.into())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = user.into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => RepoError::NotFound,
            other => query_error(other, EMAIL_TAKEN),
        })?;
        Ok(model.into())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        UserEntity::find()
            .filter(user::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn find_many(&self, query: &ReadQuery) -> Result<Vec<User>, RepoError> {
        let mut select = UserEntity::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(condition_for::<User, _>(&query.filter, user_column));
        for (column, direction) in ordering(&query.sort, user_column) {
            select = select.order_by(column, direction);
        }

        let result = select
            .offset(query.skip)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

const EMAIL_TAKEN: &str = "Email already registered";

fn user_column(field: &str) -> Option<user::Column> {
    match field {
        "id" => Some(user::Column::Id),
        "name" => Some(user::Column::Name),
        "email" => Some(user::Column::Email),
        "photo" => Some(user::Column::Photo),
        "role" => Some(user::Column::Role),
        "createdAt" => Some(user::Column::CreatedAt),
        "updatedAt" => Some(user::Column::UpdatedAt),
        _ => None,
    }
}

/// Sort keys with a column, in order. Keys without one are ignored.
fn ordering<C>(sort: &SortSpec, column_for: impl Fn(&str) -> Option<C>) -> Vec<(C, Order)> {
    sort.fields()
        .iter()
        .filter_map(|order| {
            let direction = if order.negated { Order::Desc } else { Order::Asc };
            column_for(&order.field).map(|column| (column, direction))
        })
        .collect()
}

/// PostgreSQL tour repository.
pub struct PostgresTourRepository {
    pub(crate) db: DbConn,
}

impl PostgresTourRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn tour_column(field: &str) -> Option<tour::Column> {
    match field {
        "id" => Some(tour::Column::Id),
        "name" => Some(tour::Column::Name),
        "slug" => Some(tour::Column::Slug),
        "duration" => Some(tour::Column::Duration),
        "maxGroupSize" => Some(tour::Column::MaxGroupSize),
        "difficulty" => Some(tour::Column::Difficulty),
        "ratingsAverage" => Some(tour::Column::RatingsAverage),
        "ratingsQuantity" => Some(tour::Column::RatingsQuantity),
        "price" => Some(tour::Column::Price),
        "priceDiscount" => Some(tour::Column::PriceDiscount),
        "summary" => Some(tour::Column::Summary),
        "description" => Some(tour::Column::Description),
        "imageCover" => Some(tour::Column::ImageCover),
        "secretTour" => Some(tour::Column::IsSecretTour),
        "createdAt" => Some(tour::Column::CreatedAt),
        "updatedAt" => Some(tour::Column::UpdatedAt),
        _ => None,
    }
}

fn duplicate_tour(tour: &Tour) -> String {
    format!("Duplicate tour name: {}", tour.name)
}

#[async_trait]
impl TourRepository for PostgresTourRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, RepoError> {
        let result = TourEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tour>, RepoError> {
        let result = TourEntity::find()
            .filter(tour::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(result.map(Into::into))
    }

    async fn create(&self, tour: Tour) -> Result<Tour, RepoError> {
        let duplicate = duplicate_tour(&tour);
        let active_model: tour::ActiveModel = tour.into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| query_error(e, &duplicate))?;
        Ok(model.into())
    }

    async fn save(&self, tour: Tour) -> Result<Tour, RepoError> {
        let duplicate = duplicate_tour(&tour);
        let active_model: tour::ActiveModel = tour.into();
        let model = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => RepoError::NotFound,
            other => query_error(other, &duplicate),
        })?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = TourEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        TourEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn find_many(&self, query: &ReadQuery) -> Result<Vec<Tour>, RepoError> {
        let mut select =
            TourEntity::find().filter(condition_for::<Tour, _>(&query.filter, tour_column));
        for (column, direction) in ordering(&query.sort, tour_column) {
            select = select.order_by(column, direction);
        }

        let result = select
            .offset(query.skip)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
