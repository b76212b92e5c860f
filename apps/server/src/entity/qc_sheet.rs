//! QC sheet (inspection) entity for SeaORM.
//!
//! Rows are append-only: a re-inspection after rework inserts a new sheet.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "qc_sheets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// QC-YYYYMMDD-NNNN
    #[sea_orm(unique)]
    pub inspection_code: String,
    pub production_task_id: Uuid,
    /// Denormalised from the task for order-level queries
    pub order_id: Uuid,
    pub qty_checked: i64,
    pub qty_ng: i64,
    pub pass_rate: f64,
    pub defect_rate: f64,
    /// pass, fail
    pub result: String,
    pub inspector_id: Option<String>,
    pub notes: Option<String>,
    pub inspected_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::production_task::Entity",
        from = "Column::ProductionTaskId",
        to = "super::production_task::Column::Id",
        on_delete = "Cascade"
    )]
    ProductionTask,
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(has_many = "super::defect_log::Entity")]
    DefectLogs,
}

impl Related<super::production_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionTask.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::defect_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DefectLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
