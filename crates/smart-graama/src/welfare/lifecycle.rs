//! Application status state machine and the reviewer permission check.
//!
//! Pending is the only initial state. A reviewer may move an application to any of
//! Under Review, Approved, or Rejected from any state, so re-review and reverted
//! decisions are allowed. The only guards are the caller's role and the target set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::UserId;
use super::repository::ApplicationRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const REVIEW_TARGETS: [ApplicationStatus; 3] = [
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Pending and Under Review applications still await a decision.
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Pending | ApplicationStatus::UnderReview
        )
    }

    /// Parse a reviewer-supplied status. Only the exact review target labels match.
    pub fn review_target(raw: &str) -> Result<Self, LifecycleError> {
        Self::REVIEW_TARGETS
            .into_iter()
            .find(|status| status.label() == raw)
            .ok_or_else(|| LifecycleError::InvalidStatus(raw.to_string()))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller roles recognised by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Resident,
    Officer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::Officer => "officer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = LifecycleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resident" => Ok(Role::Resident),
            "officer" => Ok(Role::Officer),
            "admin" => Ok(Role::Admin),
            _ => Err(LifecycleError::UnknownRole(value.to_string())),
        }
    }
}

pub const fn can_review(role: Role) -> bool {
    matches!(role, Role::Officer | Role::Admin)
}

/// Check the caller's role, then the requested target status.
pub fn authorize_review(role: Role, requested: &str) -> Result<ApplicationStatus, LifecycleError> {
    if !can_review(role) {
        return Err(LifecycleError::Forbidden(role));
    }
    ApplicationStatus::review_target(requested)
}

/// Reviewer command applied to a stored application in a single store update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub status: ApplicationStatus,
    pub reviewer_id: UserId,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl ReviewDecision {
    pub fn apply_to(&self, record: &mut ApplicationRecord) {
        record.status = self.status;
        record.reviewer = Some(self.reviewer_id.clone());
        record.review_date = Some(self.timestamp);
        record.review_comment = Some(self.comment.clone());
        record.updated_at = self.timestamp;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("role '{0}' is not authorized to review applications")]
    Forbidden(Role),
    #[error("invalid status '{0}': expected one of Under Review, Approved, Rejected")]
    InvalidStatus(String),
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}
