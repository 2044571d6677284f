#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr, Schema};

/// Configuration for the database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Open the connection pool.
#[cfg(feature = "postgres")]
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, DbErr> {
    tracing::info!("Initializing database connection...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let conn = Database::connect(opts).await?;
    tracing::info!("Database connected (pool: {})", config.max_connections);

    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Create the `users` and `tours` tables from their entity definitions if
/// they are missing.
#[cfg(feature = "postgres")]
pub async fn ensure_schema(conn: &DbConn) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    let mut users = schema.create_table_from_entity(super::entity::user::Entity);
    conn.execute(backend.build(users.if_not_exists())).await?;

    let mut tours = schema.create_table_from_entity(super::entity::tour::Entity);
    conn.execute(backend.build(tours.if_not_exists())).await?;

    tracing::debug!("users and tours tables ready");
    Ok(())
}
