//! Create qc_sheets table.
//!
//! Inspection history is append-only; no update trigger.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_orders::Orders;
use super::m20260301_000002_create_production_tasks::ProductionTasks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QcSheets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QcSheets::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(QcSheets::InspectionCode)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(QcSheets::ProductionTaskId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QcSheets::OrderId).uuid().not_null())
                    .col(ColumnDef::new(QcSheets::QtyChecked).big_integer().not_null())
                    .col(ColumnDef::new(QcSheets::QtyNg).big_integer().not_null())
                    .col(ColumnDef::new(QcSheets::PassRate).double().not_null())
                    .col(ColumnDef::new(QcSheets::DefectRate).double().not_null())
                    .col(ColumnDef::new(QcSheets::Result).string_len(10).not_null())
                    .col(ColumnDef::new(QcSheets::InspectorId).string_len(100))
                    .col(ColumnDef::new(QcSheets::Notes).text())
                    .col(
                        ColumnDef::new(QcSheets::InspectedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QcSheets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QcSheets::Table, QcSheets::ProductionTaskId)
                            .to(ProductionTasks::Table, ProductionTasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QcSheets::Table, QcSheets::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_qc_sheets_task_id")
                    .table(QcSheets::Table)
                    .col(QcSheets::ProductionTaskId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_qc_sheets_inspected_at")
                    .table(QcSheets::Table)
                    .col(QcSheets::InspectedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QcSheets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum QcSheets {
    Table,
    Id,
    InspectionCode,
    ProductionTaskId,
    OrderId,
    QtyChecked,
    QtyNg,
    PassRate,
    DefectRate,
    Result,
    InspectorId,
    Notes,
    InspectedAt,
    CreatedAt,
}
