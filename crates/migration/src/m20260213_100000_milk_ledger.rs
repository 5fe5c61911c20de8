use sea_orm_migration::prelude::*;

use crate::m20260212_090000_directory::{Managers, Sellers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum MilkReceived {
    Table,
    Id,
    SellerId,
    ManagerId,
    Quantity,
    Date,
    Source,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    SellerId,
    Date,
    Quantity,
    CustomerName,
    TotalAmount,
    CreatedAt,
}

#[derive(Iden)]
enum DailyTotals {
    Table,
    Id,
    SellerId,
    Date,
    Revenue,
    CashSales,
    OnlineSales,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MilkReceived::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MilkReceived::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MilkReceived::SellerId).string().not_null())
                    .col(ColumnDef::new(MilkReceived::ManagerId).string())
                    .col(
                        ColumnDef::new(MilkReceived::Quantity)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MilkReceived::Date).date().not_null())
                    .col(ColumnDef::new(MilkReceived::Source).string().not_null())
                    .col(ColumnDef::new(MilkReceived::Status).string().not_null())
                    .col(
                        ColumnDef::new(MilkReceived::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-milk_received-seller_id")
                            .from(MilkReceived::Table, MilkReceived::SellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-milk_received-manager_id")
                            .from(MilkReceived::Table, MilkReceived::ManagerId)
                            .to(Managers::Table, Managers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-milk_received-seller_id-date")
                    .table(MilkReceived::Table)
                    .col(MilkReceived::SellerId)
                    .col(MilkReceived::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-milk_received-date")
                    .table(MilkReceived::Table)
                    .col(MilkReceived::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::SellerId).string().not_null())
                    .col(ColumnDef::new(Sales::Date).date().not_null())
                    .col(
                        ColumnDef::new(Sales::Quantity)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sales::CustomerName).string().not_null())
                    .col(
                        ColumnDef::new(Sales::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-seller_id")
                            .from(Sales::Table, Sales::SellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-seller_id-date")
                    .table(Sales::Table)
                    .col(Sales::SellerId)
                    .col(Sales::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyTotals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyTotals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyTotals::SellerId).string().not_null())
                    .col(ColumnDef::new(DailyTotals::Date).date().not_null())
                    .col(
                        ColumnDef::new(DailyTotals::Revenue)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyTotals::CashSales)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyTotals::OnlineSales)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DailyTotals::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-daily_totals-seller_id")
                            .from(DailyTotals::Table, DailyTotals::SellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-daily_totals-seller_id-date")
                    .table(DailyTotals::Table)
                    .col(DailyTotals::SellerId)
                    .col(DailyTotals::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyTotals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MilkReceived::Table).to_owned())
            .await?;
        Ok(())
    }
}
