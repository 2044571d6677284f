//! User and tour stores.

mod connections;
mod filtering;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_repo;
#[cfg(feature = "postgres")]
mod sql_filter;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryTourRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresTourRepository, PostgresUserRepository};
