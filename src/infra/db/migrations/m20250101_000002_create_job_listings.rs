//! Migration: job listings owned by company profiles.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_accounts::CompanyProfiles;
use crate::config::{
    MAX_DESCRIPTION_LENGTH, MAX_JOB_SITE_LENGTH, MAX_TITLE_LENGTH, POSITION_CONTRACT,
    POSITION_FREELANCE, POSITION_FULL_TIME, POSITION_INTERNSHIP, POSITION_PART_TIME,
    POSITION_TEMPORARY, POSITION_VOLUNTEER, STATUS_APPROVED, STATUS_DELETION_REQUESTED,
    STATUS_PENDING, STATUS_REJECTED, STATUS_UPDATE_REQUESTED,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let positions = [
            POSITION_CONTRACT,
            POSITION_FREELANCE,
            POSITION_FULL_TIME,
            POSITION_INTERNSHIP,
            POSITION_PART_TIME,
            POSITION_TEMPORARY,
            POSITION_VOLUNTEER,
        ];
        let statuses = [
            STATUS_PENDING,
            STATUS_APPROVED,
            STATUS_REJECTED,
            STATUS_DELETION_REQUESTED,
            STATUS_UPDATE_REQUESTED,
        ];

        manager
            .create_table(
                Table::create()
                    .table(JobListings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobListings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JobListings::CompanyId).uuid().not_null())
                    .col(
                        ColumnDef::new(JobListings::Title)
                            .string_len(MAX_TITLE_LENGTH as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobListings::PositionType)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(JobListings::PositionType).is_in(positions)),
                    )
                    .col(
                        ColumnDef::new(JobListings::Description)
                            .string_len(MAX_DESCRIPTION_LENGTH as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobListings::MonthlySalaryTtd)
                            .integer()
                            .not_null()
                            .check(Expr::col(JobListings::MonthlySalaryTtd).gte(0)),
                    )
                    .col(
                        ColumnDef::new(JobListings::IsRemote)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(JobListings::JobSite)
                            .string_len(MAX_JOB_SITE_LENGTH as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobListings::AdminApprovalStatus)
                            .string_len(24)
                            .not_null()
                            .default(STATUS_PENDING)
                            .check(Expr::col(JobListings::AdminApprovalStatus).is_in(statuses)),
                    )
                    .col(
                        ColumnDef::new(JobListings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobListings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_listings_company")
                            .from(JobListings::Table, JobListings::CompanyId)
                            .to(CompanyProfiles::Table, CompanyProfiles::AccountId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_listings_company_id")
                    .table(JobListings::Table)
                    .col(JobListings::CompanyId)
                    .to_owned(),
            )
            .await?;

        // Search only ever looks at approved listings
        manager
            .create_index(
                Index::create()
                    .name("idx_job_listings_approval_status")
                    .table(JobListings::Table)
                    .col(JobListings::AdminApprovalStatus)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobListings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum JobListings {
    Table,
    Id,
    CompanyId,
    Title,
    PositionType,
    Description,
    MonthlySalaryTtd,
    IsRemote,
    JobSite,
    AdminApprovalStatus,
    CreatedAt,
    UpdatedAt,
}
