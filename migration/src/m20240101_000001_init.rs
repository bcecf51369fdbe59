use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    ProjectId,
    Title,
    ClientName,
    Status,
    Deadline,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderStages {
    Table,
    Id,
    OrderId,
    Name,
    Description,
    Position,
    CreatedAt,
    UpdatedAt,
}

/// Options as the first releases stored them: unit and pricing type were free text.
#[derive(DeriveIden)]
enum StageOptions {
    Table,
    Id,
    StageId,
    Name,
    Description,
    PricingType,
    VolumeMin,
    VolumeMax,
    NominalVolume,
    PricePerUnit,
    Unit,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto";"#)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Projects::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Projects::Description).text())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_name")
                    .table(Projects::Table)
                    .col(Projects::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Orders::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Orders::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Orders::ClientName).string_len(256))
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(32)
                            .not_null()
                            .default("NEW"),
                    )
                    .col(ColumnDef::new(Orders::Deadline).date())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_project")
                            .from(Orders::Table, Orders::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_project")
                    .table(Orders::Table)
                    .col(Orders::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderStages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderStages::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(OrderStages::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderStages::Name).string_len(256).not_null())
                    .col(ColumnDef::new(OrderStages::Description).text())
                    .col(
                        ColumnDef::new(OrderStages::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderStages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(OrderStages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_stages_order")
                            .from(OrderStages::Table, OrderStages::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_stages_order_position")
                    .table(OrderStages::Table)
                    .col(OrderStages::OrderId)
                    .col(OrderStages::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StageOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StageOptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(StageOptions::StageId).uuid().not_null())
                    .col(ColumnDef::new(StageOptions::Name).string_len(256).not_null())
                    .col(ColumnDef::new(StageOptions::Description).text())
                    .col(ColumnDef::new(StageOptions::PricingType).string_len(64))
                    .col(ColumnDef::new(StageOptions::VolumeMin).double())
                    .col(ColumnDef::new(StageOptions::VolumeMax).double())
                    .col(ColumnDef::new(StageOptions::NominalVolume).double())
                    .col(ColumnDef::new(StageOptions::PricePerUnit).double())
                    .col(ColumnDef::new(StageOptions::Unit).string_len(64))
                    .col(
                        ColumnDef::new(StageOptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(StageOptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stage_options_stage")
                            .from(StageOptions::Table, StageOptions::StageId)
                            .to(OrderStages::Table, OrderStages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stage_options_stage")
                    .table(StageOptions::Table)
                    .col(StageOptions::StageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StageOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderStages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        Ok(())
    }
}
