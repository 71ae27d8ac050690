use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    EligibilityCriteria, Resident, ResidentId, ResidentSubmission, Scheme, SchemeId,
    SchemeSubmission,
};
use super::service::ApplicationRequest;

/// Validation errors raised before a submission reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be a finite, non-negative number")]
    InvalidNumber { field: &'static str },
    #[error("ageMin ({min}) must not exceed ageMax ({max})")]
    AgeRange { min: u32, max: u32 },
    #[error("endDate ({end}) must not precede startDate ({start})")]
    SchemeWindow { start: NaiveDate, end: NaiveDate },
}

fn require(field: &'static str, value: &str) -> Result<(), IntakeViolation> {
    if value.trim().is_empty() {
        Err(IntakeViolation::MissingField { field })
    } else {
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), IntakeViolation> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IntakeViolation::InvalidNumber { field })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Convert a resident submission into a stored record.
pub(crate) fn resident_from_submission(
    id: ResidentId,
    submission: ResidentSubmission,
    join_date: DateTime<Utc>,
) -> Result<Resident, IntakeViolation> {
    require("name", &submission.name)?;
    require("aadhaar", &submission.aadhaar)?;
    require("phone", &submission.phone)?;
    require("address", &submission.address)?;
    non_negative("landSize", submission.land_size)?;

    Ok(Resident {
        id,
        name: submission.name.trim().to_string(),
        aadhaar: submission.aadhaar.trim().to_string(),
        age: submission.age,
        gender: submission.gender,
        phone: submission.phone.trim().to_string(),
        email: blank_to_none(submission.email),
        address: submission.address.trim().to_string(),
        category: submission.category,
        income: submission.income,
        education: blank_to_none(submission.education),
        has_house: submission.has_house,
        land_size: submission.land_size,
        schemes: submission.schemes.unwrap_or_default(),
        status: submission.status,
        join_date,
    })
}

fn check_criteria(criteria: &EligibilityCriteria) -> Result<(), IntakeViolation> {
    if let (Some(min), Some(max)) = (criteria.min_age, criteria.max_age) {
        if min > max {
            return Err(IntakeViolation::AgeRange { min, max });
        }
    }
    if let Some(max_land_size) = criteria.max_land_size {
        non_negative("maxLandSize", max_land_size)?;
    }
    Ok(())
}

/// Convert a scheme submission into a stored record.
pub(crate) fn scheme_from_submission(
    id: SchemeId,
    submission: SchemeSubmission,
    created_at: DateTime<Utc>,
) -> Result<Scheme, IntakeViolation> {
    require("name", &submission.name)?;
    require("description", &submission.description)?;
    require("category", &submission.category)?;
    check_criteria(&submission.eligibility_criteria)?;

    if submission.end_date < submission.start_date {
        return Err(IntakeViolation::SchemeWindow {
            start: submission.start_date,
            end: submission.end_date,
        });
    }

    Ok(Scheme {
        id,
        name: submission.name.trim().to_string(),
        description: submission.description.trim().to_string(),
        category: submission.category.trim().to_string(),
        eligibility_criteria: submission.eligibility_criteria,
        budget: submission.budget,
        utilized: submission.utilized,
        beneficiaries: submission.beneficiaries,
        target_beneficiaries: submission.target_beneficiaries,
        status: submission.status,
        start_date: submission.start_date,
        end_date: submission.end_date,
        created_at,
    })
}

pub(crate) fn check_application_request(
    request: &ApplicationRequest,
) -> Result<(), IntakeViolation> {
    require("residentId", &request.resident_id.0)?;
    require("schemeId", &request.scheme_id.0)?;
    require("aadhaar", &request.aadhaar)?;
    require("rdNumber", &request.rd_number)?;
    require("rationCardNumber", &request.ration_card_number)?;
    Ok(())
}
