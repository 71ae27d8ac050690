use serde::Serialize;

use super::super::domain::{SchemeStatus, SocialCategory};

/// A single failed eligibility criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "criterion", rename_all = "snake_case")]
pub enum CriterionViolation {
    SchemeInactive {
        status: SchemeStatus,
    },
    IncomeAboveCeiling {
        income: u64,
        max_income: u64,
    },
    BelowMinimumAge {
        age: u32,
        min_age: u32,
    },
    AboveMaximumAge {
        age: u32,
        max_age: u32,
    },
    CategoryNotAllowed {
        category: SocialCategory,
    },
    OwnsHouse,
    LandAboveCeiling {
        land_size: f64,
        max_land_size: f64,
    },
    BeneficiaryCapacityReached {
        beneficiaries: u32,
        target: u32,
    },
}

impl CriterionViolation {
    pub fn summary(&self) -> String {
        match self {
            CriterionViolation::SchemeInactive { status } => {
                format!("scheme is not currently active (status: {status})")
            }
            CriterionViolation::IncomeAboveCeiling { income, max_income } => format!(
                "Income (₹{}) exceeds maximum limit (₹{})",
                group_thousands(*income),
                group_thousands(*max_income)
            ),
            CriterionViolation::BelowMinimumAge { age, min_age } => {
                format!("Age ({age}) is below minimum requirement ({min_age})")
            }
            CriterionViolation::AboveMaximumAge { age, max_age } => {
                format!("Age ({age}) is above maximum requirement ({max_age})")
            }
            CriterionViolation::CategoryNotAllowed { category } => {
                format!("Category ({category}) is not eligible for this scheme")
            }
            CriterionViolation::OwnsHouse => "Scheme requires not owning a house".to_string(),
            CriterionViolation::LandAboveCeiling {
                land_size,
                max_land_size,
            } => format!(
                "Land size ({land_size} acres) exceeds maximum limit ({max_land_size} acres)"
            ),
            CriterionViolation::BeneficiaryCapacityReached { .. } => {
                "Scheme has reached maximum number of beneficiaries".to_string()
            }
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
