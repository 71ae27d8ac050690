use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::WelfarePolicy;
use crate::welfare::domain::{
    ApplicationId, EligibilityCriteria, Gender, Resident, ResidentId, ResidentStatus,
    ResidentSubmission, Scheme, SchemeId, SchemeStatus, SchemeSubmission, SocialCategory, UserId,
};
use crate::welfare::identity::{Caller, TokenVerifier};
use crate::welfare::lifecycle::{ReviewDecision, Role};
use crate::welfare::memory::InMemoryWelfareStore;
use crate::welfare::repository::{
    ApplicationRecord, ApplicationRepository, ResidentRepository, SchemeRepository, StoreError,
};
use crate::welfare::router::welfare_router;
use crate::welfare::service::{ApplicationRequest, WelfareService};

pub(super) const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

pub(super) fn resident() -> Resident {
    Resident {
        id: ResidentId::from("res-ramesh"),
        name: "Ramesh Kumar".to_string(),
        aadhaar: "123456789012".to_string(),
        age: 45,
        gender: Gender::Male,
        phone: "9876543210".to_string(),
        email: Some("ramesh@email.com".to_string()),
        address: "Village: Sample Village, District: Sample District".to_string(),
        category: SocialCategory::General,
        income: 250_000,
        education: Some("12th Standard".to_string()),
        has_house: false,
        land_size: 1.5,
        schemes: Vec::new(),
        status: ResidentStatus::Active,
        join_date: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
    }
}

pub(super) fn housing_criteria() -> EligibilityCriteria {
    EligibilityCriteria {
        max_income: Some(300_000),
        min_age: Some(18),
        max_age: Some(65),
        categories: Some(vec![
            SocialCategory::General,
            SocialCategory::ScheduledCaste,
            SocialCategory::ScheduledTribe,
            SocialCategory::OtherBackwardClass,
        ]),
        must_not_own_house: Some(true),
        max_land_size: Some(2.5),
    }
}

pub(super) fn housing_scheme() -> Scheme {
    Scheme {
        id: SchemeId::from("sch-pmay"),
        name: "Pradhan Mantri Awas Yojana (PMAY)".to_string(),
        description: "Housing for All".to_string(),
        category: "Housing".to_string(),
        eligibility_criteria: housing_criteria(),
        budget: 5_000_000,
        utilized: 2_500_000,
        beneficiaries: 25,
        target_beneficiaries: 50,
        status: SchemeStatus::Active,
        start_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid"),
        end_date: NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid"),
        created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub(super) fn open_scheme() -> Scheme {
    Scheme {
        eligibility_criteria: EligibilityCriteria::default(),
        ..housing_scheme()
    }
}

pub(super) fn resident_submission(aadhaar: &str) -> ResidentSubmission {
    let resident = resident();
    ResidentSubmission {
        name: resident.name,
        aadhaar: aadhaar.to_string(),
        age: resident.age,
        gender: resident.gender,
        phone: resident.phone,
        email: resident.email,
        address: resident.address,
        category: resident.category,
        income: resident.income,
        education: resident.education,
        has_house: resident.has_house,
        land_size: resident.land_size,
        schemes: None,
        status: ResidentStatus::Active,
    }
}

pub(super) fn scheme_submission() -> SchemeSubmission {
    let scheme = housing_scheme();
    SchemeSubmission {
        name: scheme.name,
        description: scheme.description,
        category: scheme.category,
        eligibility_criteria: scheme.eligibility_criteria,
        budget: scheme.budget,
        utilized: scheme.utilized,
        beneficiaries: scheme.beneficiaries,
        target_beneficiaries: scheme.target_beneficiaries,
        status: scheme.status,
        start_date: scheme.start_date,
        end_date: scheme.end_date,
    }
}

pub(super) fn application_request(resident: &ResidentId, scheme: &SchemeId) -> ApplicationRequest {
    ApplicationRequest {
        resident_id: resident.clone(),
        scheme_id: scheme.clone(),
        aadhaar: "123456789012".to_string(),
        rd_number: "RD-2024-0042".to_string(),
        ration_card_number: "KA-RC-778812".to_string(),
    }
}

pub(super) fn caller(role: Role) -> Caller {
    Caller {
        user_id: UserId(format!("{}-1", role.label())),
        role,
    }
}

pub(super) fn build_service() -> (WelfareService<InMemoryWelfareStore>, Arc<InMemoryWelfareStore>) {
    build_service_with_policy(WelfarePolicy::default())
}

pub(super) fn build_service_with_policy(
    policy: WelfarePolicy,
) -> (WelfareService<InMemoryWelfareStore>, Arc<InMemoryWelfareStore>) {
    let store = Arc::new(InMemoryWelfareStore::default());
    let service = WelfareService::new(store.clone(), policy);
    (service, store)
}

/// Register the sample resident and housing scheme, returning their ids.
pub(super) fn seed(service: &WelfareService<InMemoryWelfareStore>) -> (ResidentId, SchemeId) {
    let resident = service
        .register_resident(resident_submission("123456789012"))
        .expect("resident registers");
    let scheme = service
        .create_scheme(scheme_submission())
        .expect("scheme creates");
    (resident.id, scheme.id)
}

pub(super) fn verifier() -> Arc<TokenVerifier> {
    Arc::new(TokenVerifier::from_secret(TEST_SECRET, 15))
}

pub(super) fn bearer(role: Role) -> String {
    let token = verifier()
        .issue(&caller(role).user_id, role)
        .expect("token issues");
    format!("Bearer {token}")
}

pub(super) fn router_with_service(service: WelfareService<InMemoryWelfareStore>) -> axum::Router {
    welfare_router(Arc::new(service), verifier())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("database offline".to_string()))
}

impl ResidentRepository for UnavailableStore {
    fn insert_resident(&self, _resident: Resident) -> Result<Resident, StoreError> {
        offline()
    }

    fn update_resident(&self, _resident: Resident) -> Result<Resident, StoreError> {
        offline()
    }

    fn fetch_resident(&self, _id: &ResidentId) -> Result<Option<Resident>, StoreError> {
        offline()
    }

    fn list_residents(&self) -> Result<Vec<Resident>, StoreError> {
        offline()
    }

    fn delete_resident_if_idle(&self, _id: &ResidentId) -> Result<(), StoreError> {
        offline()
    }
}

impl SchemeRepository for UnavailableStore {
    fn insert_scheme(&self, _scheme: Scheme) -> Result<Scheme, StoreError> {
        offline()
    }

    fn update_scheme(&self, _scheme: Scheme) -> Result<Scheme, StoreError> {
        offline()
    }

    fn fetch_scheme(&self, _id: &SchemeId) -> Result<Option<Scheme>, StoreError> {
        offline()
    }

    fn list_schemes(&self) -> Result<Vec<Scheme>, StoreError> {
        offline()
    }

    fn delete_scheme_if_idle(&self, _id: &SchemeId) -> Result<(), StoreError> {
        offline()
    }
}

impl ApplicationRepository for UnavailableStore {
    fn insert_application(
        &self,
        _record: ApplicationRecord,
    ) -> Result<ApplicationRecord, StoreError> {
        offline()
    }

    fn fetch_application(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        offline()
    }

    fn find_application(
        &self,
        _resident_id: &ResidentId,
        _scheme_id: &SchemeId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        offline()
    }

    fn apply_review(
        &self,
        _id: &ApplicationId,
        _decision: &ReviewDecision,
    ) -> Result<ApplicationRecord, StoreError> {
        offline()
    }

    fn list_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        offline()
    }
}
