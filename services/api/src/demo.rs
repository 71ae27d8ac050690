use crate::infra::{seed_sample_data, SampleData};
use clap::Args;
use smart_graama::config::WelfarePolicy;
use smart_graama::error::AppError;
use smart_graama::welfare::{
    ApplicationRequest, Caller, InMemoryWelfareStore, ResidentId, ReviewRequest, Role, SchemeId,
    UserId, WelfareService,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Re-check eligibility when the application is submitted.
    #[arg(long)]
    pub(crate) enforce_eligibility: bool,
    /// Skip the application and review portion of the demo.
    #[arg(long)]
    pub(crate) skip_application: bool,
    /// Status recorded by the reviewing officer.
    #[arg(long, default_value = "Approved")]
    pub(crate) decision: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        enforce_eligibility,
        skip_application,
        decision,
    } = args;

    let service = WelfareService::new(
        Arc::new(InMemoryWelfareStore::default()),
        WelfarePolicy {
            enforce_eligibility_on_apply: enforce_eligibility,
        },
    );
    let seeded = seed_sample_data(&service)?;

    println!("Smart Graama welfare demo");
    println!(
        "Sample panchayat: {} schemes, {} residents",
        seeded.schemes.len(),
        seeded.residents.len()
    );

    let eligible_pairs = render_eligibility_matrix(&service, &seeded)?;

    if skip_application {
        return Ok(());
    }

    println!("\nApplication review demo");
    let Some((resident, scheme)) = eligible_pairs.first() else {
        println!("  No eligible resident/scheme pair to apply for");
        return Ok(());
    };
    let Some(resident) = seeded.residents.iter().find(|r| &r.id == resident) else {
        return Ok(());
    };

    let record = match service.apply(ApplicationRequest {
        resident_id: resident.id.clone(),
        scheme_id: scheme.clone(),
        aadhaar: resident.aadhaar.clone(),
        rd_number: "RD-DEMO-001".to_string(),
        ration_card_number: "RC-DEMO-001".to_string(),
    }) {
        Ok(record) => record,
        Err(err) => {
            println!("  Application rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- {} applied for {} -> application {} ({})",
        resident.name, record.scheme_id, record.id, record.status
    );

    if let Err(err) = service.apply(ApplicationRequest {
        resident_id: record.resident_id.clone(),
        scheme_id: record.scheme_id.clone(),
        aadhaar: record.aadhaar.clone(),
        rd_number: record.rd_number.clone(),
        ration_card_number: record.ration_card_number.clone(),
    }) {
        println!("- Second application refused: {}", err);
    }

    let resident_caller = Caller {
        user_id: UserId::from("resident-demo"),
        role: Role::Resident,
    };
    if let Err(err) = service.review(&resident_caller, &record.id, review_request(&decision)) {
        println!("- Resident review refused: {}", err);
    }

    let officer = Caller {
        user_id: UserId::from("officer-demo"),
        role: Role::Officer,
    };
    match service.review(&officer, &record.id, review_request(&decision)) {
        Ok(updated) => println!(
            "- Officer {} recorded {} (comment: {})",
            officer.user_id,
            updated.status,
            updated.review_comment.as_deref().unwrap_or("")
        ),
        Err(err) => println!("- Officer review failed: {}", err),
    }

    Ok(())
}

fn review_request(decision: &str) -> ReviewRequest {
    ReviewRequest {
        status: decision.to_string(),
        review_comment: Some("Documents verified at panchayat office".to_string()),
    }
}

/// Print the verdict for every resident and scheme, returning the eligible pairs.
fn render_eligibility_matrix(
    service: &WelfareService<InMemoryWelfareStore>,
    seeded: &SampleData,
) -> Result<Vec<(ResidentId, SchemeId)>, AppError> {
    let mut eligible = Vec::new();

    println!("\nEligibility matrix");
    for resident in &seeded.residents {
        println!(
            "- {} (age {}, {}, income {})",
            resident.name, resident.age, resident.category, resident.income
        );
        for scheme in &seeded.schemes {
            let report = service.check_eligibility(&resident.id, &scheme.id)?;
            let marker = if report.eligible { "yes" } else { "no " };
            println!("  [{}] {}", marker, report.reason);
            if report.eligible {
                eligible.push((resident.id.clone(), scheme.id.clone()));
            }
        }
    }

    Ok(eligible)
}
