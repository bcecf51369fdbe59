use sea_orm_migration::prelude::*;

// Free-text `unit` and `pricing_type` become foreign keys. Unknown units stay
// NULL; unknown pricing types fall back to INCLUDED_IN_PRICE (id 2) so the
// option never produces a calculated price it did not have before.
const UP_SQL: &str = r#"
ALTER TABLE stage_options
    ADD COLUMN IF NOT EXISTS unit_id integer NULL
        REFERENCES units_of_measure(id) ON DELETE SET NULL;
ALTER TABLE stage_options
    ADD COLUMN IF NOT EXISTS pricing_type_id integer NULL
        REFERENCES pricing_types(id);

UPDATE stage_options AS so
SET unit_id = u.id
FROM units_of_measure AS u
WHERE so.unit_id IS NULL
  AND so.unit IS NOT NULL
  AND lower(trim(so.unit)) = lower(u.short_name);

UPDATE stage_options AS so
SET pricing_type_id = pt.id
FROM pricing_types AS pt
WHERE so.pricing_type_id IS NULL
  AND upper(replace(trim(so.pricing_type), ' ', '_')) = pt.code;

UPDATE stage_options SET pricing_type_id = 2 WHERE pricing_type_id IS NULL;

ALTER TABLE stage_options ALTER COLUMN pricing_type_id SET NOT NULL;
ALTER TABLE stage_options DROP COLUMN IF EXISTS pricing_type;
ALTER TABLE stage_options RENAME COLUMN unit TO unit_label;

CREATE INDEX IF NOT EXISTS idx_stage_options_unit ON stage_options(unit_id);
"#;

const DOWN_SQL: &str = r#"
DROP INDEX IF EXISTS idx_stage_options_unit;
ALTER TABLE stage_options RENAME COLUMN unit_label TO unit;
ALTER TABLE stage_options ADD COLUMN IF NOT EXISTS pricing_type varchar(64) NULL;

UPDATE stage_options AS so
SET pricing_type = pt.code
FROM pricing_types AS pt
WHERE so.pricing_type_id = pt.id;

UPDATE stage_options AS so
SET unit = u.short_name
FROM units_of_measure AS u
WHERE so.unit IS NULL AND so.unit_id = u.id;

ALTER TABLE stage_options DROP COLUMN IF EXISTS pricing_type_id;
ALTER TABLE stage_options DROP COLUMN IF EXISTS unit_id;
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
