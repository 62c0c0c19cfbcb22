//! Job application domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use crate::errors::AppError;

/// Company decision on an application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ApplicationStatus {
    #[default]
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => STATUS_PENDING,
            ApplicationStatus::Approved => STATUS_APPROVED,
            ApplicationStatus::Rejected => STATUS_REJECTED,
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            STATUS_PENDING => Ok(ApplicationStatus::Pending),
            STATUS_APPROVED => Ok(ApplicationStatus::Approved),
            STATUS_REJECTED => Ok(ApplicationStatus::Rejected),
            _ => Err(AppError::validation(format!(
                "Unknown application status: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alumnus' application to a listing, keyed by `(alumnus_id, job_listing_id)`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct JobApplication {
    pub alumnus_id: Uuid,
    pub job_listing_id: Uuid,
    #[schema(example = "resumes/0b8e...-cv.pdf")]
    pub resume_file_path: String,
    pub work_experience: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub company_approval_status: ApplicationStatus,
}

impl JobApplication {
    /// A fresh pending application.
    pub fn new(
        alumnus_id: Uuid,
        job_listing_id: Uuid,
        resume_file_path: String,
        work_experience: Option<String>,
    ) -> Result<Self, AppError> {
        if resume_file_path.trim().is_empty() {
            return Err(AppError::validation("A resume is required to apply"));
        }

        Ok(Self {
            alumnus_id,
            job_listing_id,
            resume_file_path,
            work_experience: work_experience
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty()),
            applied_at: Utc::now(),
            company_approval_status: ApplicationStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_is_pending() {
        let app = JobApplication::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "resumes/cv.pdf".to_string(),
            Some("  ".to_string()),
        )
        .unwrap();
        assert_eq!(app.company_approval_status, ApplicationStatus::Pending);
        assert!(app.work_experience.is_none());
    }

    #[test]
    fn test_resume_is_required() {
        let result = JobApplication::new(Uuid::new_v4(), Uuid::new_v4(), " ".to_string(), None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_status_parsing_rejects_listing_only_states() {
        assert_eq!(
            "approved".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Approved
        );
        assert!("DELETION REQUESTED".parse::<ApplicationStatus>().is_err());
    }
}
