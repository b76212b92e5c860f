//! Create defect_logs table.

use sea_orm_migration::prelude::*;

use super::m20260301_000003_create_qc_sheets::QcSheets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DefectLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DefectLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DefectLogs::QcSheetId).uuid().not_null())
                    .col(ColumnDef::new(DefectLogs::DefectType).string_len(100).not_null())
                    .col(ColumnDef::new(DefectLogs::DefectCategory).string_len(100))
                    .col(ColumnDef::new(DefectLogs::Severity).string_len(10).not_null())
                    .col(
                        ColumnDef::new(DefectLogs::QtyDefect)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(DefectLogs::Description).text())
                    .col(ColumnDef::new(DefectLogs::Station).string_len(100))
                    .col(ColumnDef::new(DefectLogs::ActionTaken).text())
                    .col(
                        ColumnDef::new(DefectLogs::IsResolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DefectLogs::ResolvedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DefectLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DefectLogs::Table, DefectLogs::QcSheetId)
                            .to(QcSheets::Table, QcSheets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_defect_logs_qc_sheet_id")
                    .table(DefectLogs::Table)
                    .col(DefectLogs::QcSheetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DefectLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DefectLogs {
    Table,
    Id,
    QcSheetId,
    DefectType,
    DefectCategory,
    Severity,
    QtyDefect,
    Description,
    Station,
    ActionTaken,
    IsResolved,
    ResolvedAt,
    CreatedAt,
}
