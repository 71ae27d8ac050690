mod rules;
mod violation;

pub use violation::CriterionViolation;

use serde::Serialize;

use super::domain::{EligibilityCriteria, Resident, Scheme, SchemeStatus};

/// Verdict for a resident/scheme pair, listing every criterion the resident fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub reason: String,
    pub violations: Vec<CriterionViolation>,
}

/// Evaluate a resident against a scheme.
///
/// An inactive scheme short-circuits with the bare inactivity reason. Otherwise every
/// criterion is checked so the caller receives the full list of failures in a fixed
/// order; the order only affects the message, never the outcome.
pub fn evaluate(resident: &Resident, scheme: &Scheme) -> EligibilityVerdict {
    if scheme.status != SchemeStatus::Active {
        let inactive = CriterionViolation::SchemeInactive {
            status: scheme.status,
        };
        return EligibilityVerdict {
            eligible: false,
            reason: inactive.summary(),
            violations: vec![inactive],
        };
    }

    let violations = rules::collect_violations(resident, scheme);
    EligibilityVerdict {
        eligible: violations.is_empty(),
        reason: describe(&scheme.name, &violations),
        violations,
    }
}

fn describe(scheme_name: &str, violations: &[CriterionViolation]) -> String {
    if violations.is_empty() {
        return format!("Eligible for {scheme_name} - All criteria met");
    }

    let reasons = violations
        .iter()
        .map(CriterionViolation::summary)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Not eligible for {scheme_name}: {reasons}")
}

/// Eligibility outcome enriched with the display fields returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reason: String,
    pub scheme_name: String,
    pub resident_name: String,
    pub criteria: EligibilityCriteria,
    pub violations: Vec<CriterionViolation>,
}

impl EligibilityReport {
    pub fn new(resident: &Resident, scheme: &Scheme, verdict: EligibilityVerdict) -> Self {
        Self {
            eligible: verdict.eligible,
            reason: verdict.reason,
            scheme_name: scheme.name.clone(),
            resident_name: resident.name.clone(),
            criteria: scheme.eligibility_criteria.clone(),
            violations: verdict.violations,
        }
    }
}
