use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    ApplicationId, Resident, ResidentId, ResidentSubmission, Scheme, SchemeId, SchemeSubmission,
};
use super::eligibility::{self, EligibilityReport};
use super::identity::Caller;
use super::intake::{self, IntakeViolation};
use super::lifecycle::{self, ApplicationStatus, LifecycleError, ReviewDecision};
use super::repository::{ApplicationRecord, StoreError, WelfareStore};
use crate::config::WelfarePolicy;

static RESIDENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SCHEME_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

/// Application form submitted on behalf of a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub resident_id: ResidentId,
    pub scheme_id: SchemeId,
    pub aadhaar: String,
    pub rd_number: String,
    pub ration_card_number: String,
}

/// Reviewer input. The status stays a raw string so unsupported values surface as
/// invalid arguments rather than deserialization failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub status: String,
    #[serde(default)]
    pub review_comment: Option<String>,
}

/// Service composing the record store, the eligibility evaluator and the review lifecycle.
pub struct WelfareService<S> {
    store: Arc<S>,
    policy: WelfarePolicy,
}

impl<S> WelfareService<S>
where
    S: WelfareStore + 'static,
{
    pub fn new(store: Arc<S>, policy: WelfarePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> WelfarePolicy {
        self.policy
    }

    pub fn register_resident(
        &self,
        submission: ResidentSubmission,
    ) -> Result<Resident, ServiceError> {
        let id = ResidentId(next_id(&RESIDENT_SEQUENCE, "res"));
        let resident = intake::resident_from_submission(id, submission, Utc::now())?;
        let aadhaar = resident.aadhaar.clone();

        let stored = self
            .store
            .insert_resident(resident)
            .map_err(|err| match err {
                StoreError::Conflict => ServiceError::Conflict(format!(
                    "Aadhaar number {aadhaar} already exists"
                )),
                other => ServiceError::Store(other),
            })?;

        info!(resident_id = %stored.id, "resident registered");
        Ok(stored)
    }

    pub fn update_resident(
        &self,
        id: &ResidentId,
        mut submission: ResidentSubmission,
    ) -> Result<Resident, ServiceError> {
        let existing = self.resident(id)?;
        // Omitted `schemes` keeps the granted list; an empty list clears it.
        if submission.schemes.is_none() {
            submission.schemes = Some(existing.schemes);
        }
        let resident =
            intake::resident_from_submission(id.clone(), submission, existing.join_date)?;
        let aadhaar = resident.aadhaar.clone();

        self.store
            .update_resident(resident)
            .map_err(|err| match err {
                StoreError::Conflict => ServiceError::Conflict(format!(
                    "Aadhaar number {aadhaar} already exists"
                )),
                StoreError::NotFound => ServiceError::not_found("Resident", id),
                other => ServiceError::Store(other),
            })
    }

    pub fn resident(&self, id: &ResidentId) -> Result<Resident, ServiceError> {
        self.store
            .fetch_resident(id)?
            .ok_or_else(|| ServiceError::not_found("Resident", id))
    }

    pub fn residents(&self) -> Result<Vec<Resident>, ServiceError> {
        Ok(self.store.list_residents()?)
    }

    /// Delete a resident who has no application awaiting a decision.
    pub fn remove_resident(&self, id: &ResidentId) -> Result<(), ServiceError> {
        self.store
            .delete_resident_if_idle(id)
            .map_err(|err| match err {
                StoreError::InUse => ServiceError::Conflict(format!(
                    "Resident {id} has an application awaiting review"
                )),
                StoreError::NotFound => ServiceError::not_found("Resident", id),
                other => ServiceError::Store(other),
            })?;
        info!(resident_id = %id, "resident deleted");
        Ok(())
    }

    pub fn create_scheme(&self, submission: SchemeSubmission) -> Result<Scheme, ServiceError> {
        let id = SchemeId(next_id(&SCHEME_SEQUENCE, "sch"));
        let scheme = intake::scheme_from_submission(id, submission, Utc::now())?;
        let stored = self.store.insert_scheme(scheme)?;
        info!(scheme_id = %stored.id, scheme = %stored.name, "scheme created");
        Ok(stored)
    }

    pub fn update_scheme(
        &self,
        id: &SchemeId,
        submission: SchemeSubmission,
    ) -> Result<Scheme, ServiceError> {
        let existing = self.scheme(id)?;
        let scheme = intake::scheme_from_submission(id.clone(), submission, existing.created_at)?;
        self.store.update_scheme(scheme).map_err(|err| match err {
            StoreError::NotFound => ServiceError::not_found("Scheme", id),
            other => ServiceError::Store(other),
        })
    }

    pub fn scheme(&self, id: &SchemeId) -> Result<Scheme, ServiceError> {
        self.store
            .fetch_scheme(id)?
            .ok_or_else(|| ServiceError::not_found("Scheme", id))
    }

    pub fn schemes(&self) -> Result<Vec<Scheme>, ServiceError> {
        Ok(self.store.list_schemes()?)
    }

    /// Delete a scheme with no application awaiting a decision.
    pub fn remove_scheme(&self, id: &SchemeId) -> Result<(), ServiceError> {
        self.store
            .delete_scheme_if_idle(id)
            .map_err(|err| match err {
                StoreError::InUse => ServiceError::Conflict(format!(
                    "Scheme {id} has applications awaiting review"
                )),
                StoreError::NotFound => ServiceError::not_found("Scheme", id),
                other => ServiceError::Store(other),
            })?;
        info!(scheme_id = %id, "scheme deleted");
        Ok(())
    }

    /// Resolve both records and run the eligibility evaluator. Read-only.
    pub fn check_eligibility(
        &self,
        resident_id: &ResidentId,
        scheme_id: &SchemeId,
    ) -> Result<EligibilityReport, ServiceError> {
        let (resident, scheme) = self.resolve_pair(resident_id, scheme_id)?;
        let verdict = eligibility::evaluate(&resident, &scheme);
        debug!(
            resident_id = %resident.id,
            scheme_id = %scheme.id,
            eligible = verdict.eligible,
            "eligibility evaluated"
        );
        Ok(EligibilityReport::new(&resident, &scheme, verdict))
    }

    /// Create a Pending application.
    ///
    /// Eligibility is only re-checked here when the policy enables it; otherwise callers
    /// are trusted to have consulted the evaluator first. The store's create-if-absent
    /// remains the final duplicate check.
    pub fn apply(&self, request: ApplicationRequest) -> Result<ApplicationRecord, ServiceError> {
        intake::check_application_request(&request)?;
        let (resident, scheme) = self.resolve_pair(&request.resident_id, &request.scheme_id)?;

        if self.policy.enforce_eligibility_on_apply {
            let verdict = eligibility::evaluate(&resident, &scheme);
            if !verdict.eligible {
                warn!(
                    resident_id = %resident.id,
                    scheme_id = %scheme.id,
                    "application rejected by eligibility re-check"
                );
                return Err(ServiceError::NotEligible(verdict.reason));
            }
        }

        if self
            .store
            .find_application(&resident.id, &scheme.id)?
            .is_some()
        {
            return Err(already_applied());
        }

        let now = Utc::now();
        let record = ApplicationRecord {
            id: ApplicationId(next_id(&APPLICATION_SEQUENCE, "app")),
            resident_id: resident.id,
            scheme_id: scheme.id,
            aadhaar: request.aadhaar.trim().to_string(),
            rd_number: request.rd_number.trim().to_string(),
            ration_card_number: request.ration_card_number.trim().to_string(),
            status: ApplicationStatus::Pending,
            reviewer: None,
            review_date: None,
            review_comment: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .store
            .insert_application(record)
            .map_err(|err| match err {
                StoreError::Conflict => already_applied(),
                other => ServiceError::Store(other),
            })?;

        info!(
            application_id = %stored.id,
            resident_id = %stored.resident_id,
            scheme_id = %stored.scheme_id,
            "application submitted"
        );
        Ok(stored)
    }

    pub fn review(
        &self,
        caller: &Caller,
        id: &ApplicationId,
        request: ReviewRequest,
    ) -> Result<ApplicationRecord, ServiceError> {
        self.review_at(caller, id, request, Utc::now())
    }

    /// Record a review decision stamped with `now`.
    pub fn review_at(
        &self,
        caller: &Caller,
        id: &ApplicationId,
        request: ReviewRequest,
        now: DateTime<Utc>,
    ) -> Result<ApplicationRecord, ServiceError> {
        let status = lifecycle::authorize_review(caller.role, &request.status).map_err(|err| {
            warn!(application_id = %id, user_id = %caller.user_id, error = %err, "review refused");
            err
        })?;

        let decision = ReviewDecision {
            status,
            reviewer_id: caller.user_id.clone(),
            comment: request.review_comment.unwrap_or_default(),
            timestamp: now,
        };

        let updated = self
            .store
            .apply_review(id, &decision)
            .map_err(|err| match err {
                StoreError::NotFound => ServiceError::not_found("Application", id),
                other => ServiceError::Store(other),
            })?;

        info!(
            application_id = %updated.id,
            reviewer = %caller.user_id,
            status = %updated.status,
            "application reviewed"
        );
        Ok(updated)
    }

    pub fn application(&self, id: &ApplicationId) -> Result<ApplicationRecord, ServiceError> {
        self.store
            .fetch_application(id)?
            .ok_or_else(|| ServiceError::not_found("Application", id))
    }

    pub fn applications(&self) -> Result<Vec<ApplicationRecord>, ServiceError> {
        Ok(self.store.list_applications()?)
    }

    fn resolve_pair(
        &self,
        resident_id: &ResidentId,
        scheme_id: &SchemeId,
    ) -> Result<(Resident, Scheme), ServiceError> {
        let resident = self.store.fetch_resident(resident_id)?;
        let scheme = self.store.fetch_scheme(scheme_id)?;
        match (resident, scheme) {
            (Some(resident), Some(scheme)) => Ok((resident, scheme)),
            (None, _) => Err(ServiceError::not_found("Resident", resident_id)),
            (_, None) => Err(ServiceError::not_found("Scheme", scheme_id)),
        }
    }
}

fn already_applied() -> ServiceError {
    ServiceError::Conflict("Already applied for this scheme.".to_string())
}

/// Error raised by the welfare service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotEligible(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<IntakeViolation> for ServiceError {
    fn from(value: IntakeViolation) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<LifecycleError> for ServiceError {
    fn from(value: LifecycleError) -> Self {
        match value {
            LifecycleError::Forbidden(_) => Self::Forbidden(value.to_string()),
            LifecycleError::InvalidStatus(_) | LifecycleError::UnknownRole(_) => {
                Self::InvalidArgument(value.to_string())
            }
        }
    }
}
