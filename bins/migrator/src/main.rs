//! Applies the case-store schema migrations.

use sea_orm_migration::MigratorTrait;

use windup_db::migration::Migrator;
use windup_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");
    let db = windup_db::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    Migrator::up(&db, None).await?;
    println!("Migrations applied");

    Ok(())
}
