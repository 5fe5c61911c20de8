use sea_orm_migration::prelude::*;

use crate::m20260212_090000_directory::Sellers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum MilkRequests {
    Table,
    Id,
    FromSellerId,
    ToSellerId,
    Quantity,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BorrowLendRecords {
    Table,
    Id,
    BorrowerSellerId,
    LenderSellerId,
    Quantity,
    BorrowDate,
    Settled,
    RequestId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MilkRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MilkRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MilkRequests::FromSellerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MilkRequests::ToSellerId).string())
                    .col(
                        ColumnDef::new(MilkRequests::Quantity)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MilkRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(MilkRequests::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilkRequests::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-milk_requests-from_seller_id")
                            .from(MilkRequests::Table, MilkRequests::FromSellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-milk_requests-to_seller_id")
                            .from(MilkRequests::Table, MilkRequests::ToSellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-milk_requests-status")
                    .table(MilkRequests::Table)
                    .col(MilkRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BorrowLendRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BorrowLendRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::BorrowerSellerId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::LenderSellerId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::Quantity)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::BorrowDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::Settled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::RequestId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BorrowLendRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrow_lend_records-borrower_seller_id")
                            .from(
                                BorrowLendRecords::Table,
                                BorrowLendRecords::BorrowerSellerId,
                            )
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrow_lend_records-lender_seller_id")
                            .from(BorrowLendRecords::Table, BorrowLendRecords::LenderSellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-borrow_lend_records-request_id")
                            .from(BorrowLendRecords::Table, BorrowLendRecords::RequestId)
                            .to(MilkRequests::Table, MilkRequests::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-borrow_lend_records-request_id")
                    .table(BorrowLendRecords::Table)
                    .col(BorrowLendRecords::RequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-borrow_lend_records-lender_seller_id")
                    .table(BorrowLendRecords::Table)
                    .col(BorrowLendRecords::LenderSellerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BorrowLendRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MilkRequests::Table).to_owned())
            .await?;
        Ok(())
    }
}
