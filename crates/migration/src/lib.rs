pub use sea_orm_migration::prelude::*;

mod m20260212_090000_directory;
mod m20260212_120000_daily_operations;
mod m20260213_100000_milk_ledger;
mod m20260214_090000_attendance_salary;
mod m20260216_140000_borrow_lend;
mod m20260220_100000_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260212_090000_directory::Migration),
            Box::new(m20260212_120000_daily_operations::Migration),
            Box::new(m20260213_100000_milk_ledger::Migration),
            Box::new(m20260214_090000_attendance_salary::Migration),
            Box::new(m20260216_140000_borrow_lend::Migration),
            Box::new(m20260220_100000_notifications::Migration),
        ]
    }
}
