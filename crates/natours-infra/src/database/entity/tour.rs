//! Tour entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tours")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub slug: String,
    pub duration: i32,
    pub max_group_size: i32,
    pub difficulty: String,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub price: f64,
    pub price_discount: Option<f64>,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: String,
    /// JSON array of image file names.
    pub images: Json,
    /// JSON array of RFC 3339 timestamps.
    pub start_dates: Json,
    pub is_secret_tour: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Unknown difficulties read as `medium`; unreadable JSON columns read as empty.
impl From<Model> for natours_core::domain::Tour {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            duration: model.duration,
            max_group_size: model.max_group_size,
            difficulty: model
                .difficulty
                .parse()
                .unwrap_or(natours_core::domain::Difficulty::Medium),
            ratings_average: model.ratings_average,
            ratings_quantity: model.ratings_quantity,
            price: model.price,
            price_discount: model.price_discount,
            summary: model.summary,
            description: model.description,
            image_cover: model.image_cover,
            images: serde_json::from_value(model.images).unwrap_or_default(),
            start_dates: serde_json::from_value(model.start_dates).unwrap_or_default(),
            is_secret_tour: model.is_secret_tour,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Tour to SeaORM ActiveModel.
impl From<natours_core::domain::Tour> for ActiveModel {
    fn from(tour: natours_core::domain::Tour) -> Self {
        Self {
            id: Set(tour.id),
            name: Set(tour.name),
            slug: Set(tour.slug),
            duration: Set(tour.duration),
            max_group_size: Set(tour.max_group_size),
            difficulty: Set(tour.difficulty.to_string()),
            ratings_average: Set(tour.ratings_average),
            ratings_quantity: Set(tour.ratings_quantity),
            price: Set(tour.price),
            price_discount: Set(tour.price_discount),
            summary: Set(tour.summary),
            description: Set(tour.description),
            image_cover: Set(tour.image_cover),
            images: Set(serde_json::json!(tour.images)),
            start_dates: Set(serde_json::json!(tour.start_dates)),
            is_secret_tour: Set(tour.is_secret_tour),
            created_at: Set(tour.created_at.into()),
            updated_at: Set(tour.updated_at.into()),
        }
    }
}
