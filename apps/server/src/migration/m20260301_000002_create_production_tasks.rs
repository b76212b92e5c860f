//! Create production_tasks table.
//!
//! One row per process (cutting, sewing, ...) of an order.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_orders::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductionTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionTasks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductionTasks::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProductionTasks::Process)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionTasks::Sequence)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductionTasks::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ProductionTasks::QtyTarget)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionTasks::QtyCompleted)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductionTasks::QtyDefect)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ProductionTasks::ActualStart).timestamp_with_time_zone())
                    .col(ColumnDef::new(ProductionTasks::ActualEnd).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ProductionTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProductionTasks::Table, ProductionTasks::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_tasks_order_id")
                    .table(ProductionTasks::Table)
                    .col(ProductionTasks::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_tasks_status")
                    .table(ProductionTasks::Table)
                    .col(ProductionTasks::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductionTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductionTasks {
    Table,
    Id,
    OrderId,
    Process,
    Sequence,
    Status,
    QtyTarget,
    QtyCompleted,
    QtyDefect,
    ActualStart,
    ActualEnd,
    CreatedAt,
    UpdatedAt,
}
