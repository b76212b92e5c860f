//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_orders;
mod m20260301_000002_create_production_tasks;
mod m20260301_000003_create_qc_sheets;
mod m20260301_000004_create_defect_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_orders::Migration),
            Box::new(m20260301_000002_create_production_tasks::Migration),
            Box::new(m20260301_000003_create_qc_sheets::Migration),
            Box::new(m20260301_000004_create_defect_logs::Migration),
        ]
    }
}
