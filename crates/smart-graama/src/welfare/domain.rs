use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

record_id!(
    /// Identifier wrapper for registered residents.
    ResidentId
);
record_id!(
    /// Identifier wrapper for welfare schemes.
    SchemeId
);
record_id!(
    /// Identifier wrapper for scheme applications.
    ApplicationId
);
record_id!(
    /// Account identifier supplied by the identity collaborator.
    UserId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Social category recorded for reservation-based schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialCategory {
    General,
    #[serde(rename = "SC")]
    ScheduledCaste,
    #[serde(rename = "ST")]
    ScheduledTribe,
    #[serde(rename = "OBC")]
    OtherBackwardClass,
}

impl SocialCategory {
    pub const fn label(self) -> &'static str {
        match self {
            SocialCategory::General => "General",
            SocialCategory::ScheduledCaste => "SC",
            SocialCategory::ScheduledTribe => "ST",
            SocialCategory::OtherBackwardClass => "OBC",
        }
    }
}

impl fmt::Display for SocialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidentStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

/// Registered resident of the panchayat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    /// National identity (Aadhaar) number, unique across residents.
    pub aadhaar: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub category: SocialCategory,
    /// Annual household income in rupees.
    pub income: u64,
    pub education: Option<String>,
    pub has_house: bool,
    /// Agricultural land holding in acres.
    pub land_size: f64,
    /// Names of schemes already granted to the resident.
    pub schemes: Vec<String>,
    pub status: ResidentStatus,
    pub join_date: DateTime<Utc>,
}

/// Inbound payload for registering or editing a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentSubmission {
    pub name: String,
    pub aadhaar: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub category: SocialCategory,
    pub income: u64,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub has_house: bool,
    #[serde(default)]
    pub land_size: f64,
    /// Granted scheme names. `None` leaves an existing resident's list untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
    #[serde(default)]
    pub status: ResidentStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemeStatus {
    #[default]
    Active,
    Pending,
    Completed,
    Suspended,
}

impl SchemeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SchemeStatus::Active => "Active",
            SchemeStatus::Pending => "Pending",
            SchemeStatus::Completed => "Completed",
            SchemeStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for SchemeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional constraints a resident must satisfy. `None` leaves a dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EligibilityCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_income: Option<u64>,
    #[serde(rename = "ageMin", skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(rename = "ageMax", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    /// Allow-list of categories; absent or empty admits every category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<SocialCategory>>,
    #[serde(rename = "mustNotHaveHouse", skip_serializing_if = "Option::is_none")]
    pub must_not_own_house: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_land_size: Option<f64>,
}

/// Government benefit scheme administered by the panchayat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: SchemeId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub eligibility_criteria: EligibilityCriteria,
    pub budget: u64,
    pub utilized: u64,
    pub beneficiaries: u32,
    pub target_beneficiaries: u32,
    pub status: SchemeStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Scheme {
    pub fn at_capacity(&self) -> bool {
        self.beneficiaries >= self.target_beneficiaries
    }
}

/// Inbound payload for defining or editing a scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSubmission {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub eligibility_criteria: EligibilityCriteria,
    pub budget: u64,
    #[serde(default)]
    pub utilized: u64,
    #[serde(default)]
    pub beneficiaries: u32,
    pub target_beneficiaries: u32,
    #[serde(default)]
    pub status: SchemeStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
