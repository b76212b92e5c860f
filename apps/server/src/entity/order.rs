//! Order entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_code: String,
    pub customer_id: String,
    /// Garment model being produced
    pub product_model: String,
    pub qty_total: i64,
    /// draft, in_production, qc_pending, completed, cancelled
    pub status: String,
    pub deadline: Option<Date>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::production_task::Entity")]
    ProductionTasks,
    #[sea_orm(has_many = "super::qc_sheet::Entity")]
    QcSheets,
}

impl Related<super::production_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionTasks.def()
    }
}

impl Related<super::qc_sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QcSheets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
