use sea_orm_migration::prelude::*;

use crate::m20260212_090000_directory::Managers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum DailyOperations {
    Table,
    Id,
    ManagerId,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum FeedRecords {
    Table,
    Id,
    RecordId,
    Date,
    FeedType,
    Quantity,
    Cost,
    CreatedAt,
}

#[derive(Iden)]
enum ExpenseRecords {
    Table,
    Id,
    RecordId,
    Date,
    Category,
    Amount,
    CreatedAt,
}

#[derive(Iden)]
enum MedicineRecords {
    Table,
    Id,
    RecordId,
    Date,
    MedicineName,
    Cost,
    CreatedAt,
}

#[derive(Iden)]
enum MilkDistribution {
    Table,
    Id,
    RecordId,
    Date,
    TotalMilk,
    LeftoverMilk,
    LeftoverSales,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyOperations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyOperations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyOperations::ManagerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyOperations::Date).date().not_null())
                    .col(
                        ColumnDef::new(DailyOperations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-daily_operations-manager_id")
                            .from(DailyOperations::Table, DailyOperations::ManagerId)
                            .to(Managers::Table, Managers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-daily_operations-manager_id-date")
                    .table(DailyOperations::Table)
                    .col(DailyOperations::ManagerId)
                    .col(DailyOperations::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeedRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedRecords::RecordId).string().not_null())
                    .col(ColumnDef::new(FeedRecords::Date).date().not_null())
                    .col(ColumnDef::new(FeedRecords::FeedType).string().not_null())
                    .col(
                        ColumnDef::new(FeedRecords::Quantity)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeedRecords::Cost)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeedRecords::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-feed_records-record_id")
                            .from(FeedRecords::Table, FeedRecords::RecordId)
                            .to(DailyOperations::Table, DailyOperations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseRecords::RecordId).string().not_null())
                    .col(ColumnDef::new(ExpenseRecords::Date).date().not_null())
                    .col(ColumnDef::new(ExpenseRecords::Category).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseRecords::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_records-record_id")
                            .from(ExpenseRecords::Table, ExpenseRecords::RecordId)
                            .to(DailyOperations::Table, DailyOperations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MedicineRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MedicineRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MedicineRecords::RecordId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MedicineRecords::Date).date().not_null())
                    .col(
                        ColumnDef::new(MedicineRecords::MedicineName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MedicineRecords::Cost)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MedicineRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-medicine_records-record_id")
                            .from(MedicineRecords::Table, MedicineRecords::RecordId)
                            .to(DailyOperations::Table, DailyOperations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MilkDistribution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MilkDistribution::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MilkDistribution::RecordId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MilkDistribution::Date).date().not_null())
                    .col(
                        ColumnDef::new(MilkDistribution::TotalMilk)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MilkDistribution::LeftoverMilk)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MilkDistribution::LeftoverSales)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MilkDistribution::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-milk_distribution-record_id")
                            .from(MilkDistribution::Table, MilkDistribution::RecordId)
                            .to(DailyOperations::Table, DailyOperations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-milk_distribution-record_id")
                    .table(MilkDistribution::Table)
                    .col(MilkDistribution::RecordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MilkDistribution::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MedicineRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyOperations::Table).to_owned())
            .await?;
        Ok(())
    }
}
