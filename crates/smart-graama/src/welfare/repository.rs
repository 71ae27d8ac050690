use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, Resident, ResidentId, Scheme, SchemeId, UserId};
use super::lifecycle::{ApplicationStatus, ReviewDecision};

/// Stored application linking one resident to one scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub resident_id: ResidentId,
    pub scheme_id: SchemeId,
    pub aadhaar: String,
    pub rd_number: String,
    pub ration_card_number: String,
    pub status: ApplicationStatus,
    pub reviewer: Option<UserId>,
    pub review_date: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn targets(&self, resident_id: &ResidentId, scheme_id: &SchemeId) -> bool {
        &self.resident_id == resident_id && &self.scheme_id == scheme_id
    }
}

/// Resident storage. Inserts and updates must reject a duplicate Aadhaar number.
///
/// `delete_resident_if_idle` checks for open applications and removes the record as one
/// atomic step, failing with [`StoreError::InUse`] when an application still awaits review.
pub trait ResidentRepository: Send + Sync {
    fn insert_resident(&self, resident: Resident) -> Result<Resident, StoreError>;
    fn update_resident(&self, resident: Resident) -> Result<Resident, StoreError>;
    fn fetch_resident(&self, id: &ResidentId) -> Result<Option<Resident>, StoreError>;
    fn list_residents(&self) -> Result<Vec<Resident>, StoreError>;
    fn delete_resident_if_idle(&self, id: &ResidentId) -> Result<(), StoreError>;
}

/// Scheme storage. `delete_scheme_if_idle` follows the same atomic guard as residents.
pub trait SchemeRepository: Send + Sync {
    fn insert_scheme(&self, scheme: Scheme) -> Result<Scheme, StoreError>;
    fn update_scheme(&self, scheme: Scheme) -> Result<Scheme, StoreError>;
    fn fetch_scheme(&self, id: &SchemeId) -> Result<Option<Scheme>, StoreError>;
    fn list_schemes(&self) -> Result<Vec<Scheme>, StoreError>;
    fn delete_scheme_if_idle(&self, id: &SchemeId) -> Result<(), StoreError>;
}

/// Application storage.
///
/// `insert_application` is an atomic create-if-absent keyed by the (resident, scheme)
/// pair and `apply_review` an atomic read-modify-write, so concurrent requests cannot
/// produce duplicate applications or interleaved review fields.
pub trait ApplicationRepository: Send + Sync {
    fn insert_application(
        &self,
        record: ApplicationRecord,
    ) -> Result<ApplicationRecord, StoreError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<ApplicationRecord>, StoreError>;
    fn find_application(
        &self,
        resident_id: &ResidentId,
        scheme_id: &SchemeId,
    ) -> Result<Option<ApplicationRecord>, StoreError>;
    fn apply_review(
        &self,
        id: &ApplicationId,
        decision: &ReviewDecision,
    ) -> Result<ApplicationRecord, StoreError>;
    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
}

/// Everything the welfare service needs from its record store.
pub trait WelfareStore: ResidentRepository + SchemeRepository + ApplicationRepository {}

impl<T> WelfareStore for T where T: ResidentRepository + SchemeRepository + ApplicationRepository {}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record is referenced by an open application")]
    InUse,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
