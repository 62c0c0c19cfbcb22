//! Job listing domain entity, its enumerations and search filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::{
    JOB_SITE_REMOTE, JOB_SITE_UNSPECIFIED, MAX_DESCRIPTION_LENGTH, MAX_JOB_SITE_LENGTH,
    MAX_TITLE_LENGTH, POSITION_CONTRACT, POSITION_FREELANCE, POSITION_FULL_TIME,
    POSITION_INTERNSHIP, POSITION_PART_TIME, POSITION_TEMPORARY, POSITION_VOLUNTEER,
    STATUS_APPROVED, STATUS_DELETION_REQUESTED, STATUS_PENDING, STATUS_REJECTED,
    STATUS_UPDATE_REQUESTED,
};
use crate::errors::{AppError, AppResult};

/// Kind of position offered by a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PositionType {
    #[serde(rename = "CONTRACT")]
    Contract,
    #[serde(rename = "FREELANCE")]
    Freelance,
    #[serde(rename = "FULL TIME")]
    FullTime,
    #[serde(rename = "INTERNSHIP")]
    Internship,
    #[serde(rename = "PART TIME")]
    PartTime,
    #[serde(rename = "TEMPORARY")]
    Temporary,
    #[serde(rename = "VOLUNTEER")]
    Volunteer,
}

impl PositionType {
    pub const ALL: [PositionType; 7] = [
        PositionType::Contract,
        PositionType::Freelance,
        PositionType::FullTime,
        PositionType::Internship,
        PositionType::PartTime,
        PositionType::Temporary,
        PositionType::Volunteer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionType::Contract => POSITION_CONTRACT,
            PositionType::Freelance => POSITION_FREELANCE,
            PositionType::FullTime => POSITION_FULL_TIME,
            PositionType::Internship => POSITION_INTERNSHIP,
            PositionType::PartTime => POSITION_PART_TIME,
            PositionType::Temporary => POSITION_TEMPORARY,
            PositionType::Volunteer => POSITION_VOLUNTEER,
        }
    }
}

impl std::str::FromStr for PositionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace(|c: char| c == '_' || c == '-', " ");
        PositionType::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Unknown position type: {}", s)))
    }
}

impl std::fmt::Display for PositionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin approval state of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ApprovalStatus {
    #[default]
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "DELETION REQUESTED")]
    DeletionRequested,
    #[serde(rename = "UPDATE REQUESTED")]
    UpdateRequested,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 5] = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
        ApprovalStatus::DeletionRequested,
        ApprovalStatus::UpdateRequested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => STATUS_PENDING,
            ApprovalStatus::Approved => STATUS_APPROVED,
            ApprovalStatus::Rejected => STATUS_REJECTED,
            ApprovalStatus::DeletionRequested => STATUS_DELETION_REQUESTED,
            ApprovalStatus::UpdateRequested => STATUS_UPDATE_REQUESTED,
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace(|c: char| c == '_' || c == '-', " ");
        ApprovalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Unknown approval status: {}", s)))
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job listing domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct JobListing {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Junior Software Developer")]
    pub title: String,
    pub position_type: PositionType,
    pub description: String,
    #[schema(example = 8000)]
    pub monthly_salary_ttd: i32,
    pub is_remote: bool,
    #[schema(example = "Port of Spain")]
    pub job_site: String,
    pub admin_approval_status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobListing {
    pub fn is_approved(&self) -> bool {
        self.admin_approval_status == ApprovalStatus::Approved
    }

    pub fn is_owned_by(&self, company_id: Uuid) -> bool {
        self.company_id == company_id
    }
}

/// Validated input for a new listing.
///
/// Construct through [`NewJobListing::new`], which enforces the length limits
/// and normalizes `job_site` for remote listings.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobListing {
    pub company_id: Uuid,
    pub title: String,
    pub position_type: PositionType,
    pub description: String,
    pub monthly_salary_ttd: i32,
    pub is_remote: bool,
    pub job_site: String,
}

impl NewJobListing {
    pub fn new(
        company_id: Uuid,
        title: &str,
        position_type: PositionType,
        description: &str,
        monthly_salary_ttd: i32,
        is_remote: bool,
        job_site: Option<&str>,
    ) -> AppResult<Self> {
        let title = title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AppError::validation(format!(
                "Title must be between 1 and {} characters",
                MAX_TITLE_LENGTH
            )));
        }

        let description = description.trim();
        if description.is_empty() || description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::validation(format!(
                "Description must be between 1 and {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }

        if monthly_salary_ttd < 0 {
            return Err(AppError::validation("Monthly salary cannot be negative"));
        }

        Ok(Self {
            company_id,
            title: title.to_string(),
            position_type,
            description: description.to_string(),
            monthly_salary_ttd,
            is_remote,
            job_site: normalize_job_site(is_remote, job_site)?,
        })
    }
}

/// Remote listings always use `N/A`; an empty site becomes `(Not specified)`.
pub fn normalize_job_site(is_remote: bool, job_site: Option<&str>) -> AppResult<String> {
    if is_remote {
        return Ok(JOB_SITE_REMOTE.to_string());
    }

    match job_site.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(JOB_SITE_UNSPECIFIED.to_string()),
        Some(site) if site.chars().count() > MAX_JOB_SITE_LENGTH => Err(AppError::validation(
            format!("Job site must be at most {} characters", MAX_JOB_SITE_LENGTH),
        )),
        Some(site) => Ok(site.to_string()),
    }
}

/// A listing joined with its company's name, as returned by search
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ListingWithCompany {
    #[serde(flatten)]
    pub listing: JobListing,
    #[schema(example = "Sample Company")]
    pub company_name: String,
}

/// Filters for the public listing search. Every filter is optional.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingSearch {
    /// Case-insensitive match on title or company name
    pub q: Option<String>,
    pub position_type: Option<PositionType>,
    /// Exact job site
    pub location: Option<String>,
    /// Inclusive lower salary bound
    pub min_salary: Option<i32>,
    /// Inclusive upper salary bound
    pub max_salary: Option<i32>,
}

impl ListingSearch {
    /// Reject inverted salary ranges.
    pub fn validate(&self) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(AppError::validation(
                    "min_salary cannot be greater than max_salary",
                ));
            }
        }
        Ok(())
    }

    /// The search term, trimmed, if there is one.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
