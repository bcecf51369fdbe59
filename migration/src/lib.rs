pub use sea_orm_migration::prelude::*;

mod m20240101_000001_init;
mod m20240110_000002_lookups;
mod m20240115_000003_option_refs_backfill;
mod m20240120_000004_calculated_prices;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_init::Migration),
            Box::new(m20240110_000002_lookups::Migration),
            Box::new(m20240115_000003_option_refs_backfill::Migration),
            Box::new(m20240120_000004_calculated_prices::Migration),
        ]
    }
}
