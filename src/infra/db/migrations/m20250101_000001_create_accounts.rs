//! Migration: accounts with per-kind profile tables.

use sea_orm_migration::prelude::*;

use crate::config::VALID_ACCOUNT_KINDS;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::LoginEmail)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::ProfilePhotoFilePath).string().null())
                    .col(
                        ColumnDef::new(Accounts::Kind)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(Accounts::Kind).is_in(VALID_ACCOUNT_KINDS.iter().copied())),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_kind")
                    .table(Accounts::Table)
                    .col(Accounts::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlumnusProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlumnusProfiles::AccountId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlumnusProfiles::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(AlumnusProfiles::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(AlumnusProfiles::PhoneNumber).string_len(30).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alumnus_profiles_account")
                            .from(AlumnusProfiles::Table, AlumnusProfiles::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompanyProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyProfiles::AccountId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyProfiles::CompanyName)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyProfiles::MailingAddress)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyProfiles::WebsiteUrl)
                            .string_len(200)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyProfiles::PhoneNumber)
                            .string_len(30)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CompanyProfiles::PublicEmail).string_len(120).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_profiles_account")
                            .from(CompanyProfiles::Table, CompanyProfiles::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AlumnusProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
    LoginEmail,
    PasswordHash,
    ProfilePhotoFilePath,
    Kind,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum AlumnusProfiles {
    Table,
    AccountId,
    FirstName,
    LastName,
    PhoneNumber,
}

#[derive(Iden)]
pub enum CompanyProfiles {
    Table,
    AccountId,
    CompanyName,
    MailingAddress,
    WebsiteUrl,
    PhoneNumber,
    PublicEmail,
}
