//! Resident registry, scheme eligibility, and the application review lifecycle.
//!
//! The evaluator and the lifecycle guard are pure functions over loaded records. The
//! service resolves records through the store traits and the router exposes it over
//! HTTP behind bearer-token identity.

pub mod domain;
pub mod eligibility;
pub mod identity;
pub(crate) mod intake;
pub mod lifecycle;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, EligibilityCriteria, Gender, Resident, ResidentId, ResidentStatus,
    ResidentSubmission, Scheme, SchemeId, SchemeStatus, SchemeSubmission, SocialCategory, UserId,
};
pub use eligibility::{evaluate, CriterionViolation, EligibilityReport, EligibilityVerdict};
pub use identity::{Caller, IdentityError, TokenVerifier};
pub use intake::IntakeViolation;
pub use lifecycle::{
    authorize_review, can_review, ApplicationStatus, LifecycleError, ReviewDecision, Role,
};
pub use memory::InMemoryWelfareStore;
pub use repository::{
    ApplicationRecord, ApplicationRepository, ResidentRepository, SchemeRepository, StoreError,
    WelfareStore,
};
pub use router::{welfare_router, WelfareState};
pub use service::{ApplicationRequest, ReviewRequest, ServiceError, WelfareService};
