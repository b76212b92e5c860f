//! Defect log entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "defect_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub qc_sheet_id: Uuid,
    pub defect_type: String,
    pub defect_category: Option<String>,
    /// minor, major, critical
    pub severity: String,
    pub qty_defect: i64,
    pub description: Option<String>,
    pub station: Option<String>,
    pub action_taken: Option<String>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qc_sheet::Entity",
        from = "Column::QcSheetId",
        to = "super::qc_sheet::Column::Id",
        on_delete = "Cascade"
    )]
    QcSheet,
}

impl Related<super::qc_sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QcSheet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
