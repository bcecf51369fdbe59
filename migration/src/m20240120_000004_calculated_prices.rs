use sea_orm_migration::prelude::*;

const UP_SQL: &str = r#"
ALTER TABLE stage_options
    ADD COLUMN IF NOT EXISTS calculated_price_min double precision NULL,
    ADD COLUMN IF NOT EXISTS calculated_price_max double precision NULL;

UPDATE stage_options
SET calculated_price_min = volume_min / nominal_volume * price_per_unit,
    calculated_price_max = volume_max / nominal_volume * price_per_unit
WHERE pricing_type_id = 1
  AND nominal_volume > 0
  AND price_per_unit IS NOT NULL;
"#;

const DOWN_SQL: &str = r#"
ALTER TABLE stage_options
    DROP COLUMN IF EXISTS calculated_price_max,
    DROP COLUMN IF EXISTS calculated_price_min;
"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(UP_SQL)
            .await
            .map(|_| ())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await
            .map(|_| ())
    }
}
