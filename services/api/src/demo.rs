use crate::infra::{
    default_upsell_policy, standard_orchestrator, InMemoryProfileRepository,
    InMemoryPromptPublisher,
};
use clap::Args;
use scorecard::error::AppError;
use scorecard::scoring::{
    ContactChannels, MediaAssets, OrganizationProfile, ProfileRepository, ProfileScoringService,
    ProgramListing, ScoreSummary, ScoringOrchestrator, SnapshotImporter, SocialLink,
    SocialNetwork, VerificationStatus, WebPresence,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional directory CSV export to drive the intake portion of the demo.
    #[arg(long)]
    pub(crate) snapshot_csv: Option<PathBuf>,
    /// Include the full per-rule breakdown in the demo output.
    #[arg(long)]
    pub(crate) include_rules: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScorePreviewArgs {
    /// Directory CSV export to score; defaults to the built-in sample profile.
    #[arg(long)]
    pub(crate) snapshot_csv: Option<PathBuf>,
    /// Organization slug to select from the export (defaults to the first row).
    #[arg(long)]
    pub(crate) slug: Option<String>,
    /// Include the full per-rule breakdown in the output.
    #[arg(long)]
    pub(crate) list_rules: bool,
}

pub(crate) async fn run_score_preview(args: ScorePreviewArgs) -> Result<(), AppError> {
    let ScorePreviewArgs {
        snapshot_csv,
        slug,
        list_rules,
    } = args;

    let (profile, imported) = load_profile(snapshot_csv, slug)?;
    let orchestrator = standard_orchestrator()?;
    let summary = orchestrator.evaluate(&profile).await?;

    if imported {
        println!("Data source: directory CSV export");
    } else {
        println!("Data source: built-in sample profile");
    }
    render_score_report(&profile, &summary, &orchestrator, list_rules);

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        snapshot_csv,
        include_rules,
    } = args;

    println!("Profile scoring demo");
    let (profile, imported) = load_profile(snapshot_csv, None)?;
    if imported {
        println!("Data source: directory CSV export");
    } else {
        println!("Data source: built-in sample profile");
    }

    let repository = Arc::new(InMemoryProfileRepository::default());
    let prompts = Arc::new(InMemoryPromptPublisher::default());
    let orchestrator = Arc::new(standard_orchestrator()?);
    let service = Arc::new(ProfileScoringService::new(
        repository.clone(),
        prompts.clone(),
        orchestrator.clone(),
        default_upsell_policy(),
    ));

    let record = match service.submit(profile) {
        Ok(record) => record,
        Err(err) => {
            println!("  Snapshot rejected: {}", err);
            return Ok(());
        }
    };
    let view = record.status_view();
    println!(
        "- Stored profile {} -> status {}",
        view.profile_id.0, view.status
    );

    let summary = match service.evaluate(&record.profile_id).await {
        Ok(summary) => summary,
        Err(err) => {
            println!("  Evaluation unavailable: {}", err);
            return Ok(());
        }
    };

    println!();
    render_score_report(&record.profile, &summary, &orchestrator, include_rules);

    let stored_view = match repository.fetch(&record.profile_id) {
        Ok(Some(record)) => record.status_view(),
        Ok(None) => {
            println!("  Repository lookup returned no record");
            return Ok(());
        }
        Err(err) => {
            println!("  Repository unavailable: {}", err);
            return Ok(());
        }
    };
    match serde_json::to_string_pretty(&stored_view) {
        Ok(json) => println!("\nPublic status payload:\n{}", json),
        Err(err) => println!("\nPublic status payload unavailable: {}", err),
    }

    let events = prompts.events();
    if events.is_empty() {
        println!("\nUpsell prompts: none dispatched");
    } else {
        println!("\nUpsell prompts:");
        for prompt in events {
            println!(
                "  - template={} -> {} ({} open gaps)",
                prompt.template,
                prompt.profile_id.0,
                prompt
                    .details
                    .get("open_gaps")
                    .map(String::as_str)
                    .unwrap_or("?")
            );
        }
    }

    Ok(())
}

fn load_profile(
    snapshot_csv: Option<PathBuf>,
    slug: Option<String>,
) -> Result<(OrganizationProfile, bool), AppError> {
    match snapshot_csv {
        Some(path) => {
            let profiles = SnapshotImporter::from_path(path)?;
            let selected = match &slug {
                Some(slug) => profiles.into_iter().find(|profile| &profile.slug == slug),
                None => profiles.into_iter().next(),
            };
            match selected {
                Some(profile) => Ok((profile, true)),
                None => Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    match slug {
                        Some(slug) => format!("no organization '{slug}' in export"),
                        None => "export contains no rows".to_string(),
                    },
                ))),
            }
        }
        None => Ok((sample_profile(), false)),
    }
}

pub(crate) fn render_score_report(
    profile: &OrganizationProfile,
    summary: &ScoreSummary,
    orchestrator: &ScoringOrchestrator,
    list_rules: bool,
) {
    println!(
        "Readiness report for {} ({})",
        profile.display_name, profile.slug
    );
    for category in &profile.categories {
        if orchestrator.catalog().rule_set_for(category).is_some() {
            println!("- category {category}");
        } else {
            println!("- category {category} (no rule-set, skipped)");
        }
    }

    println!(
        "\nOverall: {}/{} ({}% ready)",
        summary.total_score,
        summary.total_max_score,
        summary.completion_percent()
    );

    println!("\nGroup scores");
    for group in summary.group_scores.values() {
        match group_label(profile, orchestrator, &group.group_key) {
            Some(label) => println!("- {}: {}/{}", label, group.score, group.max_score),
            None => println!("- {}: {}/{}", group.group_key, group.score, group.max_score),
        }
    }

    if list_rules {
        println!("\nRule breakdown");
        for rule in summary.rule_scores.values() {
            match &rule.note {
                Some(note) => println!("- {}: {}/{} ({})", rule.rule_key, rule.score, rule.max_score, note),
                None => println!("- {}: {}/{}", rule.rule_key, rule.score, rule.max_score),
            }
        }
    }

    let recommendations: Vec<&str> = summary
        .gaps()
        .filter_map(|gap| {
            orchestrator
                .registry()
                .resolve(&gap.rule_key)
                .and_then(|rule| rule.remediation())
        })
        .collect();
    if recommendations.is_empty() {
        println!("\nRecommended actions: none, profile is fully ready");
    } else {
        println!("\nRecommended actions");
        for action in recommendations {
            println!("- {}", action);
        }
    }
}

fn group_label(
    profile: &OrganizationProfile,
    orchestrator: &ScoringOrchestrator,
    group_key: &str,
) -> Option<&'static str> {
    profile
        .categories
        .iter()
        .filter_map(|category| orchestrator.catalog().rule_set_for(category))
        .flat_map(|rule_set| rule_set.groups.iter())
        .find(|group| group.key == group_key)
        .map(|group| group.label)
}

/// Mid-strength sample used by the demo and preview fallbacks; close enough
/// to ready that the gaps read as actionable.
pub(crate) fn sample_profile() -> OrganizationProfile {
    OrganizationProfile {
        slug: "riverside-academy".to_string(),
        display_name: "Riverside Academy".to_string(),
        categories: vec!["private-school".to_string()],
        verification: VerificationStatus {
            verified: true,
            verified_on: chrono::NaiveDate::from_ymd_opt(2026, 3, 2),
        },
        contact: ContactChannels {
            phone: Some("+1 515 555 0101".to_string()),
            email: None,
            whatsapp: Some("+1 515 555 0102".to_string()),
        },
        web: WebPresence {
            website_domain: Some("riverside.example".to_string()),
            google_business_profile: None,
            social_links: vec![SocialLink {
                network: SocialNetwork::Facebook,
                url: "https://facebook.com/riversideacademy".to_string(),
            }],
        },
        media: MediaAssets {
            logo_key: Some("media/riverside/logo.png".to_string()),
            cover_key: None,
            gallery: vec![
                "media/riverside/campus.jpg".to_string(),
                "media/riverside/library.jpg".to_string(),
            ],
        },
        description: Some("Independent K-8 school in the Riverside district.".to_string()),
        programs: vec![
            ProgramListing {
                name: "Lower School".to_string(),
                summary: Some("Grades K-4".to_string()),
                monthly_fee: Some(480),
                enrollment_open: true,
            },
            ProgramListing {
                name: "Middle School".to_string(),
                summary: Some("Grades 5-8".to_string()),
                monthly_fee: None,
                enrollment_open: true,
            },
        ],
        admissions: None,
    }
}
