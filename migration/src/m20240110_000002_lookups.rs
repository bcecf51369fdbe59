use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PricingTypes {
    Table,
    Id,
    Code,
    Name,
}

#[derive(DeriveIden)]
enum UnitsOfMeasure {
    Table,
    Id,
    ShortName,
    Name,
}

const PRICING_TYPES: [(i32, &str, &str); 2] = [
    (1, "CALCULABLE", "Calculable"),
    (2, "INCLUDED_IN_PRICE", "Included in price"),
];

const UNITS: [(&str, &str); 7] = [
    ("words", "Words"),
    ("chars", "Characters"),
    ("pcs", "Pieces"),
    ("pages", "Pages"),
    ("hours", "Hours"),
    ("min", "Minutes"),
    ("sheets", "Author sheets"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingTypes::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PricingTypes::Code)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PricingTypes::Name).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        for (id, code, name) in PRICING_TYPES {
            let insert = Query::insert()
                .into_table(PricingTypes::Table)
                .columns([PricingTypes::Id, PricingTypes::Code, PricingTypes::Name])
                .values_panic([id.into(), code.into(), name.into()])
                .on_conflict(OnConflict::column(PricingTypes::Id).do_nothing().to_owned())
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(UnitsOfMeasure::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitsOfMeasure::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UnitsOfMeasure::ShortName)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UnitsOfMeasure::Name).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        for (short_name, name) in UNITS {
            let insert = Query::insert()
                .into_table(UnitsOfMeasure::Table)
                .columns([UnitsOfMeasure::ShortName, UnitsOfMeasure::Name])
                .values_panic([short_name.into(), name.into()])
                .on_conflict(
                    OnConflict::column(UnitsOfMeasure::ShortName)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitsOfMeasure::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PricingTypes::Table).to_owned())
            .await
    }
}
