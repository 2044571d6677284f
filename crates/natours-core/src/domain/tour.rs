use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const TOUR_NAME_MIN_LEN: usize = 10;
pub const TOUR_NAME_MAX_LEN: usize = 40;
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

/// How demanding a tour is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "difficult" => Ok(Difficulty::Difficult),
            _ => Err(DomainError::validation(
                "Error - Difficulty must be easy | medium | difficult",
            )),
        }
    }
}

/// A bookable tour.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub duration: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub price: f64,
    pub price_discount: Option<f64>,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub is_secret_tour: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    /// Check the field rules every stored tour satisfies.
    pub fn validate(&self) -> Result<(), DomainError> {
        let name_len = self.name.chars().count();
        if name_len == 0 {
            return Err(DomainError::validation("Error - A tour must have a name"));
        }
        if name_len > TOUR_NAME_MAX_LEN {
            return Err(DomainError::validation(format!(
                "Error - A tour name must be less than or equal to {TOUR_NAME_MAX_LEN} characters"
            )));
        }
        if name_len < TOUR_NAME_MIN_LEN {
            return Err(DomainError::validation(format!(
                "Error - A tour name must be greater than or equal to {TOUR_NAME_MIN_LEN} characters"
            )));
        }
        if self.ratings_average < 1.0 {
            return Err(DomainError::validation(
                "Error - ratings average must be greater than 1",
            ));
        }
        if self.ratings_average > 5.0 {
            return Err(DomainError::validation("Error - ratings average must be less than 5"));
        }
        if let Some(discount) = self.price_discount {
            if discount >= self.price {
                return Err(DomainError::validation(format!(
                    "Error - price discount of {discount} must be less than price"
                )));
            }
        }
        if self.summary.trim().is_empty() {
            return Err(DomainError::validation("Error - A tour must have a summary"));
        }
        if self.image_cover.trim().is_empty() {
            return Err(DomainError::validation("Error - A tour must have a cover image"));
        }
        Ok(())
    }

    pub fn view(&self) -> TourView {
        TourView {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            duration: self.duration,
            duration_weeks: f64::from(self.duration) / 7.0,
            max_group_size: self.max_group_size,
            difficulty: self.difficulty,
            ratings_average: self.ratings_average,
            ratings_quantity: self.ratings_quantity,
            price: self.price,
            price_discount: self.price_discount,
            summary: self.summary.clone(),
            description: self.description.clone(),
            image_cover: self.image_cover.clone(),
            images: self.images.clone(),
            start_dates: self.start_dates.clone(),
            is_secret_tour: self.is_secret_tour,
        }
    }
}

/// `The Forest Hiker!` -> `the-forest-hiker`
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Public representation of a tour. `createdAt` is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub duration: i32,
    pub duration_weeks: f64,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub is_secret_tour: bool,
}
