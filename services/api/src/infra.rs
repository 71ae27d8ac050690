use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use smart_graama::welfare::{
    EligibilityCriteria, Gender, Resident, ResidentStatus, ResidentSubmission, Scheme,
    SchemeStatus, SchemeSubmission, ServiceError, SocialCategory, WelfareService, WelfareStore,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Records created by [`seed_sample_data`].
#[derive(Debug, Default)]
pub(crate) struct SampleData {
    pub(crate) schemes: Vec<Scheme>,
    pub(crate) residents: Vec<Resident>,
}

const SAMPLE_ADDRESS: &str = "Village: Sample Village, District: Sample District, State: Karnataka";

const ALL_CATEGORIES: [SocialCategory; 4] = [
    SocialCategory::General,
    SocialCategory::ScheduledCaste,
    SocialCategory::ScheduledTribe,
    SocialCategory::OtherBackwardClass,
];

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn window(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let start = parse_date(start).map_err(ServiceError::InvalidArgument)?;
    let end = parse_date(end).map_err(ServiceError::InvalidArgument)?;
    Ok((start, end))
}

fn sample_schemes() -> Result<Vec<SchemeSubmission>, ServiceError> {
    let (housing_start, housing_end) = window("2023-01-01", "2025-12-31")?;
    let (pension_start, pension_end) = window("2023-01-01", "2024-12-31")?;
    let (scholarship_start, scholarship_end) = window("2023-06-01", "2024-05-31")?;

    Ok(vec![
        SchemeSubmission {
            name: "Pradhan Mantri Awas Yojana (PMAY)".to_string(),
            description: "Housing for All scheme providing affordable housing to urban and rural poor"
                .to_string(),
            category: "Housing".to_string(),
            eligibility_criteria: EligibilityCriteria {
                max_income: Some(300_000),
                min_age: Some(18),
                max_age: Some(65),
                categories: Some(ALL_CATEGORIES.to_vec()),
                must_not_own_house: Some(true),
                max_land_size: Some(2.5),
            },
            budget: 5_000_000,
            utilized: 2_500_000,
            beneficiaries: 25,
            target_beneficiaries: 50,
            status: SchemeStatus::Active,
            start_date: housing_start,
            end_date: housing_end,
        },
        SchemeSubmission {
            name: "Old Age Pension Scheme".to_string(),
            description: "Financial assistance for senior citizens above 60 years".to_string(),
            category: "Social Welfare".to_string(),
            eligibility_criteria: EligibilityCriteria {
                max_income: Some(200_000),
                min_age: Some(60),
                max_age: Some(120),
                categories: Some(ALL_CATEGORIES.to_vec()),
                must_not_own_house: Some(false),
                max_land_size: None,
            },
            budget: 2_000_000,
            utilized: 800_000,
            beneficiaries: 40,
            target_beneficiaries: 100,
            status: SchemeStatus::Active,
            start_date: pension_start,
            end_date: pension_end,
        },
        SchemeSubmission {
            name: "Scholarship for SC/ST Students".to_string(),
            description: "Educational scholarship for students from SC/ST communities".to_string(),
            category: "Education".to_string(),
            eligibility_criteria: EligibilityCriteria {
                max_income: Some(450_000),
                min_age: Some(5),
                max_age: Some(25),
                categories: Some(vec![
                    SocialCategory::ScheduledCaste,
                    SocialCategory::ScheduledTribe,
                ]),
                must_not_own_house: Some(false),
                max_land_size: None,
            },
            budget: 1_500_000,
            utilized: 600_000,
            beneficiaries: 30,
            target_beneficiaries: 75,
            status: SchemeStatus::Active,
            start_date: scholarship_start,
            end_date: scholarship_end,
        },
    ])
}

#[allow(clippy::too_many_arguments)]
fn sample_resident(
    name: &str,
    aadhaar: &str,
    age: u32,
    gender: Gender,
    phone: &str,
    category: SocialCategory,
    income: u64,
    education: &str,
    has_house: bool,
    land_size: f64,
    schemes: &[&str],
) -> ResidentSubmission {
    let handle = name
        .split_whitespace()
        .next()
        .unwrap_or(name)
        .to_ascii_lowercase();
    ResidentSubmission {
        name: name.to_string(),
        aadhaar: aadhaar.to_string(),
        age,
        gender,
        phone: phone.to_string(),
        email: Some(format!("{handle}@email.com")),
        address: SAMPLE_ADDRESS.to_string(),
        category,
        income,
        education: Some(education.to_string()),
        has_house,
        land_size,
        schemes: Some(schemes.iter().map(|scheme| scheme.to_string()).collect()),
        status: ResidentStatus::Active,
    }
}

fn sample_residents() -> Vec<ResidentSubmission> {
    vec![
        sample_resident(
            "Ramesh Kumar",
            "123456789012",
            45,
            Gender::Male,
            "9876543210",
            SocialCategory::General,
            250_000,
            "12th Standard",
            false,
            1.5,
            &[],
        ),
        sample_resident(
            "Lakshmi Devi",
            "234567890123",
            65,
            Gender::Female,
            "8765432109",
            SocialCategory::ScheduledCaste,
            180_000,
            "8th Standard",
            true,
            0.5,
            &["Old Age Pension Scheme"],
        ),
        sample_resident(
            "Arjun Singh",
            "345678901234",
            22,
            Gender::Male,
            "7654321098",
            SocialCategory::ScheduledTribe,
            300_000,
            "Graduation",
            false,
            2.0,
            &["Scholarship for SC/ST Students"],
        ),
        sample_resident(
            "Priya Sharma",
            "456789012345",
            35,
            Gender::Female,
            "6543210987",
            SocialCategory::OtherBackwardClass,
            400_000,
            "Post Graduation",
            true,
            3.0,
            &[],
        ),
    ]
}

/// Load the sample panchayat: three schemes and four residents.
pub(crate) fn seed_sample_data<S>(service: &WelfareService<S>) -> Result<SampleData, ServiceError>
where
    S: WelfareStore + 'static,
{
    let mut seeded = SampleData::default();
    for submission in sample_schemes()? {
        seeded.schemes.push(service.create_scheme(submission)?);
    }
    for submission in sample_residents() {
        seeded.residents.push(service.register_resident(submission)?);
    }
    Ok(seeded)
}
