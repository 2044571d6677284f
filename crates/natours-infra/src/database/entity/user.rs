//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub photo: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub password_changed_at: Option<DateTimeWithTimeZone>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User. Unknown roles read as `user`.
impl From<Model> for natours_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            photo: model.photo,
            role: model.role.parse().unwrap_or_default(),
            password_hash: model.password_hash,
            password_changed_at: model.password_changed_at.map(Into::into),
            password_reset_token: model.password_reset_token,
            password_reset_expires: model.password_reset_expires.map(Into::into),
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<natours_core::domain::User> for ActiveModel {
    fn from(user: natours_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            name: Set(user.name),
            email: Set(user.email),
            photo: Set(user.photo),
            role: Set(user.role.to_string()),
            password_hash: Set(user.password_hash),
            password_changed_at: Set(user.password_changed_at.map(Into::into)),
            password_reset_token: Set(user.password_reset_token),
            password_reset_expires: Set(user.password_reset_expires.map(Into::into)),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
