//! Domain entities - the core business objects.

mod session;
mod tour;
mod user;

pub use session::{AccessClaims, Authenticated, CookiePolicy, Session, ACCESS_TOKEN_COOKIE};
pub use tour::{
    slugify, Difficulty, Tour, TourView, DEFAULT_RATINGS_AVERAGE, TOUR_NAME_MAX_LEN,
    TOUR_NAME_MIN_LEN,
};
pub use user::{Role, User, UserProfile};
