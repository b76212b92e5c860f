//! Production task entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "production_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    /// cutting, sewing, sablon, finishing, packing
    pub process: String,
    /// Position within the order's production sequence
    pub sequence: i32,
    /// pending, in_progress, completed, inspected_pass, inspected_fail, rework
    pub status: String,
    pub qty_target: i64,
    pub qty_completed: i64,
    pub qty_defect: i64,
    pub actual_start: Option<DateTimeUtc>,
    pub actual_end: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(has_many = "super::qc_sheet::Entity")]
    QcSheets,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::qc_sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QcSheets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
