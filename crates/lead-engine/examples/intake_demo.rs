//! Wires the engine against an in-memory store and walks one lead from
//! intake to conversion.
//!
//! Run with: `cargo run --example intake_demo -p lead-engine`

use database::models::LeadStatus;
use database::{staff, Database};
use lead_engine::{Actor, ConversionRequest, LeadEngine, LeadIntake, LoggingSink};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db = Database::connect("sqlite::memory:").await?;
    db.migrate().await?;

    staff::create_staff(db.pool(), "studio-1", "Priya Menon").await?;
    staff::serve_region(db.pool(), "studio-1", "Mumbai").await?;

    let engine = LeadEngine::new(db, LoggingSink);
    let manager = Actor::manager("ops-1");

    let lead = engine
        .create_lead(
            &manager,
            LeadIntake {
                name: "Asha Rao".to_string(),
                email: Some("asha@example.com".to_string()),
                phone: Some("9876543210".to_string()),
                source: Some("referral".to_string()),
                region: Some("Mumbai".to_string()),
                budget_min: Some(600_000),
                budget_max: Some(900_000),
                project_type: Some("full_home".to_string()),
                property_type: Some("apartment".to_string()),
                timeline: Some("immediate".to_string()),
                description: Some("Three bedroom apartment, full interiors".to_string()),
            },
        )
        .await?;
    println!(
        "created lead {} (score {}, assigned to {:?})",
        lead.id, lead.score, lead.assigned_staff_id
    );

    engine
        .transition(&manager, &lead.id, LeadStatus::Contacted, None)
        .await?;
    engine
        .transition(&manager, &lead.id, LeadStatus::Qualified, None)
        .await?;

    let conversion = engine
        .convert_lead(
            &manager,
            &lead.id,
            ConversionRequest {
                title: "Rao residence interiors".to_string(),
                budget: 750_000,
                duration_weeks: Some(12),
            },
        )
        .await?;
    println!(
        "converted lead {} into project {} ({})",
        conversion.lead.id, conversion.project.id, conversion.project.title
    );

    Ok(())
}
