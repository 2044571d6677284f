//! SeaORM entities.

pub mod tour;
pub mod user;
