//! Case store: `SeaORM` entities, migrations and repositories.
//!
//! This crate implements the store traits defined next to the domain
//! services in `windup-core`. All writes that touch a child and the case
//! header (the practitioner link map, the embedded sub-resources) happen in
//! one database transaction, so readers only ever see committed aggregate
//! states.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::InsolvencyRepository;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections);
    Database::connect(options).await
}
