pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_artists;
mod m20240101_000002_create_performances;
mod m20240101_000003_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_artists::Migration),
            Box::new(m20240101_000002_create_performances::Migration),
            Box::new(m20240101_000003_create_users::Migration),
        ]
    }
}
