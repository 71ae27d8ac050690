use super::super::domain::{Resident, Scheme};
use super::violation::CriterionViolation;

/// Run every criterion check against an active scheme.
pub(crate) fn collect_violations(resident: &Resident, scheme: &Scheme) -> Vec<CriterionViolation> {
    let criteria = &scheme.eligibility_criteria;
    let mut violations = Vec::new();

    if let Some(max_income) = criteria.max_income {
        if resident.income > max_income {
            violations.push(CriterionViolation::IncomeAboveCeiling {
                income: resident.income,
                max_income,
            });
        }
    }

    if let Some(min_age) = criteria.min_age {
        if resident.age < min_age {
            violations.push(CriterionViolation::BelowMinimumAge {
                age: resident.age,
                min_age,
            });
        }
    }

    if let Some(max_age) = criteria.max_age {
        if resident.age > max_age {
            violations.push(CriterionViolation::AboveMaximumAge {
                age: resident.age,
                max_age,
            });
        }
    }

    if let Some(categories) = criteria.categories.as_deref() {
        if !categories.is_empty() && !categories.contains(&resident.category) {
            violations.push(CriterionViolation::CategoryNotAllowed {
                category: resident.category,
            });
        }
    }

    if criteria.must_not_own_house == Some(true) && resident.has_house {
        violations.push(CriterionViolation::OwnsHouse);
    }

    if let Some(max_land_size) = criteria.max_land_size {
        if resident.land_size > max_land_size {
            violations.push(CriterionViolation::LandAboveCeiling {
                land_size: resident.land_size,
                max_land_size,
            });
        }
    }

    if scheme.at_capacity() {
        violations.push(CriterionViolation::BeneficiaryCapacityReached {
            beneficiaries: scheme.beneficiaries,
            target: scheme.target_beneficiaries,
        });
    }

    violations
}
