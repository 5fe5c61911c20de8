use sea_orm_migration::prelude::*;

use crate::m20260212_090000_directory::Employees;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    EmployeeId,
    Date,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Salaries {
    Table,
    Id,
    EmployeeId,
    Month,
    BaseSalary,
    TotalDeductions,
    FinalSalary,
    DaysWorked,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Deductions {
    Table,
    Id,
    SalaryId,
    Amount,
    Reason,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::EmployeeId).string().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(ColumnDef::new(Attendance::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendance-employee_id")
                            .from(Attendance::Table, Attendance::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-attendance-employee_id-date")
                    .table(Attendance::Table)
                    .col(Attendance::EmployeeId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Salaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Salaries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Salaries::EmployeeId).string().not_null())
                    .col(ColumnDef::new(Salaries::Month).string().not_null())
                    .col(
                        ColumnDef::new(Salaries::BaseSalary)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Salaries::TotalDeductions)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salaries::FinalSalary)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salaries::DaysWorked)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Salaries::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Salaries::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-salaries-employee_id")
                            .from(Salaries::Table, Salaries::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-salaries-employee_id-month")
                    .table(Salaries::Table)
                    .col(Salaries::EmployeeId)
                    .col(Salaries::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deductions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deductions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deductions::SalaryId).string().not_null())
                    .col(
                        ColumnDef::new(Deductions::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deductions::Reason).string().not_null())
                    .col(ColumnDef::new(Deductions::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deductions-salary_id")
                            .from(Deductions::Table, Deductions::SalaryId)
                            .to(Salaries::Table, Salaries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deductions-salary_id")
                    .table(Deductions::Table)
                    .col(Deductions::SalaryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deductions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Salaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        Ok(())
    }
}
