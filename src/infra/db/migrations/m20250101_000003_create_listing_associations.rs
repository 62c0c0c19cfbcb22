//! Migration: applications, saved listings and company subscriptions.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_accounts::{AlumnusProfiles, CompanyProfiles};
use super::m20250101_000002_create_job_listings::JobListings;
use crate::config::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobApplications::AlumnusId).uuid().not_null())
                    .col(ColumnDef::new(JobApplications::JobListingId).uuid().not_null())
                    .col(
                        ColumnDef::new(JobApplications::ResumeFilePath)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobApplications::WorkExperience).text().null())
                    .col(
                        ColumnDef::new(JobApplications::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::CompanyApprovalStatus)
                            .string_len(16)
                            .not_null()
                            .default(STATUS_PENDING)
                            .check(Expr::col(JobApplications::CompanyApprovalStatus).is_in([
                                STATUS_PENDING,
                                STATUS_APPROVED,
                                STATUS_REJECTED,
                            ])),
                    )
                    .primary_key(
                        Index::create()
                            .col(JobApplications::AlumnusId)
                            .col(JobApplications::JobListingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_alumnus")
                            .from(JobApplications::Table, JobApplications::AlumnusId)
                            .to(AlumnusProfiles::Table, AlumnusProfiles::AccountId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_listing")
                            .from(JobApplications::Table, JobApplications::JobListingId)
                            .to(JobListings::Table, JobListings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavedJobListings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedJobListings::AlumnusId).uuid().not_null())
                    .col(ColumnDef::new(SavedJobListings::JobListingId).uuid().not_null())
                    .col(
                        ColumnDef::new(SavedJobListings::SavedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SavedJobListings::AlumnusId)
                            .col(SavedJobListings::JobListingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_job_listings_alumnus")
                            .from(SavedJobListings::Table, SavedJobListings::AlumnusId)
                            .to(AlumnusProfiles::Table, AlumnusProfiles::AccountId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_job_listings_listing")
                            .from(SavedJobListings::Table, SavedJobListings::JobListingId)
                            .to(JobListings::Table, JobListings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompanySubscriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CompanySubscriptions::AlumnusId).uuid().not_null())
                    .col(ColumnDef::new(CompanySubscriptions::CompanyId).uuid().not_null())
                    .col(
                        ColumnDef::new(CompanySubscriptions::SubscribedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CompanySubscriptions::AlumnusId)
                            .col(CompanySubscriptions::CompanyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_subscriptions_alumnus")
                            .from(CompanySubscriptions::Table, CompanySubscriptions::AlumnusId)
                            .to(AlumnusProfiles::Table, AlumnusProfiles::AccountId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_subscriptions_company")
                            .from(CompanySubscriptions::Table, CompanySubscriptions::CompanyId)
                            .to(CompanyProfiles::Table, CompanyProfiles::AccountId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Fan-out on publish looks subscribers up by company
        manager
            .create_index(
                Index::create()
                    .name("idx_company_subscriptions_company_id")
                    .table(CompanySubscriptions::Table)
                    .col(CompanySubscriptions::CompanyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanySubscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavedJobListings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum JobApplications {
    Table,
    AlumnusId,
    JobListingId,
    ResumeFilePath,
    WorkExperience,
    AppliedAt,
    CompanyApprovalStatus,
}

#[derive(Iden)]
enum SavedJobListings {
    Table,
    AlumnusId,
    JobListingId,
    SavedAt,
}

#[derive(Iden)]
enum CompanySubscriptions {
    Table,
    AlumnusId,
    CompanyId,
    SubscribedAt,
}
