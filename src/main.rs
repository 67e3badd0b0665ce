//! Caresight - Entry Point
//!
//! Interactive chat loop over a demo analytics store. Each input line
//! goes through the intent dispatcher; provider-backed lookups run
//! against the endpoints named in the config file.

use caresight::chat::{build_engine, EngineDeps, Response};
use caresight::core::config::EngineConfig;
use caresight::core::error::Result;
use caresight::core::types::Region;
use caresight::providers::{
    DisabledSearch, DocumentQa, HttpDocumentQa, HttpRegistry, HttpSearch, SearchProvider,
};
use caresight::store::{
    ContractTemplate, MemoryStore, OrganizationRecord, OutcomeType, PaperRecord, PatientSummary,
};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "caresight", about = "Chat-driven analytics insights")]
struct Args {
    /// Path to a TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("caresight=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;

    tracing::info!("Caresight starting...");

    let store = Arc::new(MemoryStore::new());
    seed_demo_data(&store);

    let registry = Arc::new(HttpRegistry::new(
        config.registry_url.clone(),
        Duration::from_secs(config.registry_timeout_secs),
        config.registry_max_results,
    )?);

    let search: Arc<dyn SearchProvider> = match &config.search_url {
        Some(url) => Arc::new(HttpSearch::new(
            url.clone(),
            Duration::from_secs(config.search_timeout_secs),
        )?),
        None => {
            tracing::warn!("no search endpoint configured - web fallback disabled");
            Arc::new(DisabledSearch)
        }
    };

    let document_qa: Option<Arc<dyn DocumentQa>> = match &config.document_qa_url {
        Some(url) => Some(Arc::new(HttpDocumentQa::new(
            url.clone(),
            Duration::from_secs(config.search_timeout_secs),
        )?)),
        None => {
            tracing::warn!("no document Q&A endpoint configured - document questions disabled");
            None
        }
    };

    let engine = build_engine(EngineDeps {
        store,
        registry,
        search,
        document_qa,
        config,
    })?;

    println!("\n=== CARESIGHT ===");
    println!("Chat-driven insights over the demo analytics store");
    println!();
    println!("Try:");
    println!("  top 5 HCOs with highest ghost patients");
    println!("  What is the address of Memorial Hospital?");
    println!("  Find papers by Kahraman E");
    println!("  show contract templates");
    println!("  quit / q to exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        match engine.process_message(input).await {
            Ok(Response::Text(text)) => println!("{}\n", text),
            Ok(Response::Messages(messages)) => {
                for message in messages {
                    println!("{}\n", message);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "handler failed");
                println!("Something went wrong processing that request.\n");
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Seed a small, self-consistent demo dataset
fn seed_demo_data(store: &MemoryStore) {
    let orgs = [
        ("HCO-001", "Memorial Hospital", "CA", Region::West, 3750, 1250),
        ("HCO-002", "City Medical Center", "NY", Region::Northeast, 4020, 980),
        ("HCO-003", "Regional Health System", "TX", Region::South, 4125, 875),
        ("HCO-004", "Lakeside Clinic", "IL", Region::Midwest, 2200, 640),
        ("HCO-005", "Tyrone Hospital", "PA", Region::Northeast, 1380, 460),
    ];
    for (id, name, state, region, treated, ghost) in orgs {
        store.insert_org(OrganizationRecord {
            id: id.into(),
            name: name.into(),
            state: state.into(),
            region,
            treated_patients: treated,
            ghost_patients: ghost,
            address: None,
            city: None,
            zip_code: None,
            address_last_updated: None,
        });
    }

    let papers = [
        (
            "Minimally Invasive Valve Repair Outcomes",
            "Journal of Cardiac Surgery",
            "Kahraman E",
            "Ankara University Faculty of Medicine",
        ),
        (
            "Long-Term Survival After CAR-T Therapy",
            "Blood Advances",
            "Sharma R",
            "MD Anderson Cancer Center",
        ),
        (
            "Robotic Resection in Hepatobiliary Surgery",
            "Annals of Surgery",
            "Nakamura H",
            "Kyoto University Hospital",
        ),
    ];
    for (title, journal, author, affiliation) in papers {
        store.insert_external_paper(PaperRecord {
            title: title.into(),
            journal: journal.into(),
            author_name: author.into(),
            affiliation: affiliation.into(),
            ..Default::default()
        });
    }

    store.insert_template(ContractTemplate {
        template_id: "survival-12m".into(),
        name: "12-Month Survival".into(),
        outcome_type: OutcomeType::Survival12Month,
        default_rebate_percent: 50,
        default_time_window: 12,
    });
    store.insert_template(ContractTemplate {
        template_id: "retreatment-18m".into(),
        name: "18-Month Retreatment".into(),
        outcome_type: OutcomeType::Retreatment,
        default_rebate_percent: 40,
        default_time_window: 18,
    });
    store.insert_template(ContractTemplate {
        template_id: "toxicity-30d".into(),
        name: "30-Day Toxicity".into(),
        outcome_type: OutcomeType::Toxicity,
        default_rebate_percent: 30,
        default_time_window: 1,
    });

    store.set_patient_summary(PatientSummary {
        total_patients: 2000,
        avg_age: 67,
        male_percent: 58,
        avg_prior_lines: 3.2,
        payer_dist: vec![
            ("Medicare".into(), 1100),
            ("Commercial".into(), 600),
            ("Medicaid".into(), 300),
        ],
        region_dist: vec![
            ("South".into(), 700),
            ("West".into(), 550),
            ("Northeast".into(), 450),
            ("Midwest".into(), 300),
        ],
        age_buckets: [300, 700, 800, 200],
        toxicity_count: 240,
        event_12m_count: 500,
        retreatment_18m_count: 160,
    });

    tracing::info!("Seeded demo store with 5 HCOs, 3 external papers, 3 contract templates");
}
