//! SeaORM entity definitions.

pub mod defect_log;
pub mod order;
pub mod production_task;
pub mod qc_sheet;
