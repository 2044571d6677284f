//! The tour catalogue: listing through the query translation layer, CRUD and
//! the two aggregate reports.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::provided;
use crate::domain::{slugify, Difficulty, Tour, DEFAULT_RATINGS_AVERAGE};
use crate::error::DomainError;
use crate::ports::TourRepository;
use crate::query::{QueryParams, ReadQuery};

/// Fields a list request may filter on.
pub const TOUR_FILTER_FIELDS: [&str; 10] = [
    "name",
    "slug",
    "duration",
    "maxGroupSize",
    "difficulty",
    "ratingsAverage",
    "ratingsQuantity",
    "price",
    "priceDiscount",
    "summary",
];

/// Tours rated at least this well count towards the stats report.
pub const STATS_MIN_RATING: f64 = 4.5;

/// Create or patch payload. Every field is optional; `create` demands the
/// required ones.
#[derive(Debug, Clone, Default)]
pub struct TourInput {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub max_group_size: Option<i32>,
    pub difficulty: Option<String>,
    pub ratings_average: Option<f64>,
    pub ratings_quantity: Option<i32>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<String>>,
    pub secret_tour: Option<bool>,
}

/// One row of the per-difficulty report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub difficulty: String,
    pub num_tours: u64,
    pub num_ratings: i64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// Tour starts in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStarts {
    pub month: u32,
    pub num_tour_starts: usize,
    pub tours: Vec<String>,
}

/// Tour use cases, wired to their store.
#[derive(Clone)]
pub struct TourService {
    tours: Arc<dyn TourRepository>,
}

impl TourService {
    pub fn new(tours: Arc<dyn TourRepository>) -> Self {
        Self { tours }
    }

    /// Run a list query and return projected tour documents.
    pub async fn list(&self, params: &QueryParams) -> Result<Vec<Map<String, Value>>, DomainError> {
        let query = ReadQuery::from_params(params, &TOUR_FILTER_FIELDS);
        query.ensure_page_exists(self.tours.count().await?)?;

        let found = self.tours.find_many(&query).await?;
        query.projection.project_all(found.iter().map(Tour::view))
    }

    pub async fn get(&self, raw_id: &str) -> Result<Tour, DomainError> {
        let id = parse_tour_id(raw_id)?;
        self.tours
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(raw_id))
    }

    pub async fn create(&self, input: TourInput) -> Result<Tour, DomainError> {
        let name = provided(&input.name)
            .ok_or_else(|| DomainError::validation("Error - A tour must have a name"))?
            .trim()
            .to_string();
        let duration = input
            .duration
            .ok_or_else(|| DomainError::validation("Error - A tour must have a duration"))?;
        let max_group_size = input
            .max_group_size
            .ok_or_else(|| DomainError::validation("Error - A tour must have a group size"))?;
        let difficulty: Difficulty = provided(&input.difficulty)
            .ok_or_else(|| DomainError::validation("Error - A tour must have a difficulty"))?
            .parse()?;
        let price = input
            .price
            .ok_or_else(|| DomainError::validation("Error - A tour must have a price"))?;
        let summary = provided(&input.summary)
            .ok_or_else(|| DomainError::validation("Error - A tour must have a summary"))?
            .trim()
            .to_string();
        let image_cover = provided(&input.image_cover)
            .ok_or_else(|| DomainError::validation("Error - A tour must have a cover image"))?
            .to_string();
        let start_dates = parse_start_dates(input.start_dates.as_deref().unwrap_or_default())?;

        let now = Utc::now();
        let tour = Tour {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            duration,
            max_group_size,
            difficulty,
            ratings_average: input.ratings_average.unwrap_or(DEFAULT_RATINGS_AVERAGE),
            ratings_quantity: input.ratings_quantity.unwrap_or_default(),
            price,
            price_discount: input.price_discount,
            summary,
            description: provided(&input.description).map(|d| d.trim().to_string()),
            image_cover,
            images: input.images.unwrap_or_default(),
            start_dates,
            is_secret_tour: input.secret_tour.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        tour.validate()?;

        if self.tours.find_by_name(&tour.name).await?.is_some() {
            return Err(duplicate_name(&tour.name));
        }
        let tour = self.tours.create(tour).await?;

        tracing::info!(tour_id = %tour.id, slug = %tour.slug, "Tour created");
        Ok(tour)
    }

    /// Apply the supplied fields to a stored tour. The combined record must
    /// still satisfy every tour rule.
    pub async fn update(&self, raw_id: &str, input: TourInput) -> Result<Tour, DomainError> {
        let mut tour = self.get(raw_id).await?;

        if let Some(name) = provided(&input.name) {
            let name = name.trim();
            if name != tour.name {
                if self.tours.find_by_name(name).await?.is_some() {
                    return Err(duplicate_name(name));
                }
                tour.name = name.to_string();
                tour.slug = slugify(name);
            }
        }
        if let Some(difficulty) = provided(&input.difficulty) {
            tour.difficulty = difficulty.parse()?;
        }
        if let Some(dates) = input.start_dates.as_deref() {
            tour.start_dates = parse_start_dates(dates)?;
        }
        if let Some(summary) = provided(&input.summary) {
            tour.summary = summary.trim().to_string();
        }
        if let Some(cover) = provided(&input.image_cover) {
            tour.image_cover = cover.to_string();
        }
        if let Some(description) = provided(&input.description) {
            tour.description = Some(description.trim().to_string());
        }
        tour.duration = input.duration.unwrap_or(tour.duration);
        tour.max_group_size = input.max_group_size.unwrap_or(tour.max_group_size);
        tour.ratings_average = input.ratings_average.unwrap_or(tour.ratings_average);
        tour.ratings_quantity = input.ratings_quantity.unwrap_or(tour.ratings_quantity);
        tour.price = input.price.unwrap_or(tour.price);
        tour.price_discount = input.price_discount.or(tour.price_discount);
        tour.images = input.images.unwrap_or(tour.images);
        tour.is_secret_tour = input.secret_tour.unwrap_or(tour.is_secret_tour);
        tour.updated_at = Utc::now();
        tour.validate()?;

        let tour = self.tours.save(tour).await?;
        tracing::info!(tour_id = %tour.id, "Tour updated");
        Ok(tour)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), DomainError> {
        let id = parse_tour_id(raw_id)?;
        if !self.tours.delete(id).await? {
            return Err(not_found(raw_id));
        }
        tracing::info!(tour_id = %id, "Tour deleted");
        Ok(())
    }

    /// Per-difficulty aggregates over well-rated public tours, cheapest
    /// average first.
    pub async fn stats(&self) -> Result<Vec<DifficultyStats>, DomainError> {
        let tours = self.tours.find_many(&ReadQuery::all()).await?;

        let mut groups: BTreeMap<Difficulty, Vec<&Tour>> = BTreeMap::new();
        for tour in tours
            .iter()
            .filter(|t| !t.is_secret_tour && t.ratings_average >= STATS_MIN_RATING)
        {
            groups.entry(tour.difficulty).or_default().push(tour);
        }

        let mut stats: Vec<DifficultyStats> = groups
            .into_iter()
            .map(|(difficulty, group)| {
                let n = group.len() as f64;
                let prices = group.iter().map(|t| t.price);
                DifficultyStats {
                    difficulty: difficulty.as_str().to_uppercase(),
                    num_tours: group.len() as u64,
                    num_ratings: group.iter().map(|t| i64::from(t.ratings_quantity)).sum(),
                    avg_rating: group.iter().map(|t| t.ratings_average).sum::<f64>() / n,
                    avg_price: prices.clone().sum::<f64>() / n,
                    min_price: prices.clone().fold(f64::INFINITY, f64::min),
                    max_price: prices.fold(f64::NEG_INFINITY, f64::max),
                }
            })
            .collect();
        stats.sort_by(|a, b| a.avg_price.total_cmp(&b.avg_price));
        Ok(stats)
    }

    /// Public tour starts in `year`, busiest month first.
    pub async fn monthly_plan(&self, year: i32) -> Result<Vec<MonthlyStarts>, DomainError> {
        let tours = self.tours.find_many(&ReadQuery::all()).await?;

        let mut months: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for tour in tours.iter().filter(|t| !t.is_secret_tour) {
            for start in tour.start_dates.iter().filter(|d| d.year() == year) {
                months.entry(start.month()).or_default().push(tour.name.clone());
            }
        }

        let mut plan: Vec<MonthlyStarts> = months
            .into_iter()
            .map(|(month, tours)| MonthlyStarts {
                month,
                num_tour_starts: tours.len(),
                tours,
            })
            .collect();
        plan.sort_by(|a, b| b.num_tour_starts.cmp(&a.num_tour_starts).then(a.month.cmp(&b.month)));
        plan.truncate(12);
        Ok(plan)
    }
}

pub fn parse_tour_id(raw_id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw_id.trim()).map_err(|_| not_found(raw_id))
}

/// RFC 3339, `YYYY-MM-DD,HH:MM` or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d,%H:%M") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

fn parse_start_dates(raw: &[String]) -> Result<Vec<DateTime<Utc>>, DomainError> {
    raw.iter()
        .map(|d| {
            parse_start_date(d)
                .ok_or_else(|| DomainError::validation("Error - start dates must be ISO 8601 dates"))
        })
        .collect()
}

fn not_found(raw_id: &str) -> DomainError {
    DomainError::not_found(format!("could not find tour with id {raw_id}"))
}

fn duplicate_name(name: &str) -> DomainError {
    DomainError::Duplicate(format!("Duplicate field value: {name}. Please use another value"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::RepoError;

    #[derive(Default)]
    struct FakeTours(Mutex<Vec<Tour>>);

    #[async_trait]
    impl TourRepository for FakeTours {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, RepoError> {
            Ok(self.0.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Tour>, RepoError> {
            Ok(self.0.lock().unwrap().iter().find(|t| t.name == name).cloned())
        }

        async fn create(&self, tour: Tour) -> Result<Tour, RepoError> {
            self.0.lock().unwrap().push(tour.clone());
            Ok(tour)
        }

        async fn save(&self, tour: Tour) -> Result<Tour, RepoError> {
            let mut tours = self.0.lock().unwrap();
            tours.retain(|t| t.id != tour.id);
            tours.push(tour.clone());
            Ok(tour)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
            let mut tours = self.0.lock().unwrap();
            let before = tours.len();
            tours.retain(|t| t.id != id);
            Ok(tours.len() < before)
        }

        async fn count(&self) -> Result<u64, RepoError> {
            Ok(self.0.lock().unwrap().len() as u64)
        }

        async fn find_many(&self, _query: &ReadQuery) -> Result<Vec<Tour>, RepoError> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    fn input(name: &str, price: f64) -> TourInput {
        TourInput {
            name: Some(name.into()),
            duration: Some(5),
            max_group_size: Some(25),
            difficulty: Some("easy".into()),
            price: Some(price),
            summary: Some("Exciting adventure".into()),
            image_cover: Some("cover.jpg".into()),
            ..TourInput::default()
        }
    }

    fn service() -> TourService {
        TourService::new(Arc::new(FakeTours::default()))
    }

    #[tokio::test]
    async fn test_create_fills_defaults_and_slug() {
        let service = service();

        let tour = service.create(input("The Forest Hiker", 397.0)).await.unwrap();

        assert_eq!(tour.slug, "the-forest-hiker");
        assert_eq!(tour.ratings_average, DEFAULT_RATINGS_AVERAGE);
        assert!(!tour.is_secret_tour);
    }

    #[tokio::test]
    async fn test_create_reports_first_missing_field() {
        let service = service();

        let err = service
            .create(TourInput { price: None, ..input("The Forest Hiker", 1.0) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error - A tour must have a price");

        let err = service
            .create(TourInput { difficulty: Some("extreme".into()), ..input("The Forest Hiker", 1.0) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error - Difficulty must be easy | medium | difficult");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let service = service();
        service.create(input("The Forest Hiker", 397.0)).await.unwrap();

        let err = service.create(input("The Forest Hiker", 497.0)).await.unwrap_err();

        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_reslugs_and_checks_discount() {
        let service = service();
        let tour = service.create(input("The Forest Hiker", 397.0)).await.unwrap();
        let id = tour.id.to_string();

        let updated = service
            .update(&id, TourInput { name: Some("The Sea Explorer".into()), ..TourInput::default() })
            .await
            .unwrap();
        assert_eq!(updated.slug, "the-sea-explorer");

        let err = service
            .update(&id, TourInput { price_discount: Some(500.0), ..TourInput::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let service = service();

        let err = service.get("not-a-uuid").await.unwrap_err();
        assert_eq!(err.to_string(), "could not find tour with id not-a-uuid");

        let err = service.delete(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_pages_and_projects() {
        let service = service();
        service.create(input("The Forest Hiker", 397.0)).await.unwrap();
        service.create(input("The Sea Explorer", 497.0)).await.unwrap();

        let listed = service.list(&QueryParams::parse("fields=name,price")).await.unwrap();
        assert_eq!(listed.len(), 2);
        let mut keys: Vec<_> = listed[0].keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["id", "name", "price"]);

        let err = service.list(&QueryParams::parse("page=2&limit=2")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stats_group_public_well_rated_tours() {
        let service = service();
        service.create(input("The Forest Hiker", 400.0)).await.unwrap();
        service.create(input("The Snow Adventurer", 600.0)).await.unwrap();
        service
            .create(TourInput { difficulty: Some("difficult".into()), ..input("The Wine Taster", 100.0) })
            .await
            .unwrap();
        service
            .create(TourInput { secret_tour: Some(true), ..input("The Secret Seeker", 9000.0) })
            .await
            .unwrap();
        service
            .create(TourInput { ratings_average: Some(3.0), ..input("The Park Camper", 9000.0) })
            .await
            .unwrap();

        let stats = service.stats().await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].difficulty, "DIFFICULT");
        assert_eq!(stats[1].difficulty, "EASY");
        assert_eq!(stats[1].num_tours, 2);
        assert_eq!(stats[1].avg_price, 500.0);
        assert_eq!(stats[1].min_price, 400.0);
        assert_eq!(stats[1].max_price, 600.0);
    }

    #[tokio::test]
    async fn test_monthly_plan_counts_starts_in_year() {
        let service = service();
        let dated = |name: &str, dates: &[&str]| TourInput {
            start_dates: Some(dates.iter().map(|d| d.to_string()).collect()),
            ..input(name, 100.0)
        };
        service
            .create(dated("The Forest Hiker", &["2021-04-25,10:00", "2021-07-20", "2022-07-20"]))
            .await
            .unwrap();
        service
            .create(dated("The Sea Explorer", &["2021-07-05T09:00:00Z"]))
            .await
            .unwrap();

        let plan = service.monthly_plan(2021).await.unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].month, 7);
        assert_eq!(plan[0].num_tour_starts, 2);
        assert_eq!(plan[1].month, 4);
        assert_eq!(plan[1].tours, vec!["The Forest Hiker"]);
    }

    #[test]
    fn test_parse_start_date_formats() {
        assert!(parse_start_date("2021-04-25,10:00").is_some());
        assert!(parse_start_date("2021-04-25").is_some());
        assert!(parse_start_date("2021-04-25T10:00:00+02:00").is_some());
        assert!(parse_start_date("next tuesday").is_none());
    }
}
