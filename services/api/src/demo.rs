use crate::infra::{sample_desk, LoggingNotificationPublisher};
use campaign_desk::error::AppError;
use campaign_desk::workflows::campaigns::{
    ApplicationRequest, BudgetResolution, CampaignDeskService, CampaignId, CampaignSnapshot,
    DeskSnapshot, EligibilityVerdict, InMemoryCampaignRepository, InfluencerId, RepositoryError,
    ReviewDecision, ReviewOutcome,
};
use campaign_desk::workflows::roster::RosterImporter;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Desk snapshot JSON (campaigns, phases, visibility, applicants, applications)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Campaign identifier
    #[arg(long)]
    pub(crate) campaign: String,
    /// Influencer database identifier
    #[arg(long)]
    pub(crate) influencer: String,
    /// Print the quote as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EligibleArgs {
    /// Desk snapshot JSON (campaigns, phases, visibility, applicants, applications)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Campaign identifier
    #[arg(long)]
    pub(crate) campaign: String,
    /// Optional roster CSV replacing the snapshot's applicant pool
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

#[derive(Serialize)]
struct QuoteReport<'a> {
    campaign_id: &'a CampaignId,
    influencer_id: &'a InfluencerId,
    eligibility: &'a EligibilityVerdict,
    budget: &'a BudgetResolution,
    negotiation_enabled: bool,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        snapshot,
        campaign,
        influencer,
        json,
    } = args;

    let desk = DeskSnapshot::from_path(snapshot)?;
    let view = campaign_view(&desk, campaign)?;
    let influencer = InfluencerId(influencer);
    let applicant = view
        .applicant(&influencer)
        .ok_or(RepositoryError::NotFound)?;

    let verdict = view.verdict(applicant);
    let budget = view.budget_for(&influencer);
    let negotiation = view.negotiation_enabled(&influencer);

    if json {
        let report = QuoteReport {
            campaign_id: &view.campaign.id,
            influencer_id: &influencer,
            eligibility: &verdict,
            budget: &budget,
            negotiation_enabled: negotiation,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(err) => println!("Quote unavailable: {err}"),
        }
        return Ok(());
    }

    println!(
        "Campaign {} ({}) for {}",
        view.campaign.title,
        view.campaign.status.label(),
        influencer.0
    );
    println!("- Eligibility: {}", verdict.summary());
    println!("- Budget: {}", describe_budget(&budget));
    println!(
        "- Negotiation: {}",
        if negotiation { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub(crate) fn run_eligible(args: EligibleArgs) -> Result<(), AppError> {
    let EligibleArgs {
        snapshot,
        campaign,
        roster,
    } = args;

    let desk = DeskSnapshot::from_path(snapshot)?;
    let mut view = campaign_view(&desk, campaign)?;
    if let Some(path) = roster {
        view.applicants = RosterImporter::from_path(path)?;
    }

    let eligible = view.eligible_applicants();
    println!(
        "{} of {} applicants eligible for {}",
        eligible.len(),
        view.applicants.len(),
        view.campaign.title
    );
    for applicant in &view.applicants {
        match view.verdict(applicant) {
            EligibilityVerdict::Eligible => println!("+ {}", applicant.db_id.0),
            EligibilityVerdict::Ineligible { reason } => {
                println!("- {} ({})", applicant.db_id.0, reason.summary())
            }
        }
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let desk = sample_desk();
    let campaign_id = desk
        .campaigns
        .first()
        .map(|campaign| campaign.id.clone())
        .ok_or(RepositoryError::NotFound)?;
    let applicant_ids: Vec<InfluencerId> = desk
        .applicants
        .iter()
        .map(|profile| profile.db_id.clone())
        .collect();

    let repository = Arc::new(InMemoryCampaignRepository::seeded(desk)?);
    let notifications = Arc::new(LoggingNotificationPublisher::default());
    let service = CampaignDeskService::new(repository, notifications.clone());

    println!("Campaign desk demo ({})", campaign_id.0);
    println!("\nQuotes");
    for influencer in &applicant_ids {
        let quote = service.quote(&campaign_id, influencer)?;
        println!(
            "- {}: {} | {} | negotiation {}",
            influencer.0,
            quote.eligibility.summary(),
            describe_budget(&quote.budget),
            if quote.negotiation_enabled { "on" } else { "off" }
        );
    }

    println!("\nApplications");
    for (influencer, negotiated_amount) in [("inf-ada", None), ("inf-cy", Some(1400))] {
        let request = ApplicationRequest {
            influencer_id: InfluencerId(influencer.to_string()),
            negotiated_amount,
            applied_on: None,
        };
        match service.apply(&campaign_id, request) {
            Ok(application) => {
                println!(
                    "- {} applied as {} for {:?}{}",
                    influencer,
                    application.id.0,
                    application.budget_applied_for,
                    if application.is_negotiated { " (negotiated)" } else { "" }
                );
                let outcome = if application.is_negotiated {
                    ReviewOutcome::Reject
                } else {
                    ReviewOutcome::Approve
                };
                let reviewed = service.review(
                    &application.id,
                    ReviewDecision {
                        outcome,
                        final_offer_amount: None,
                    },
                )?;
                println!("  reviewed -> {}", reviewed.status.label());
            }
            Err(err) => println!("- {} refused: {}", influencer, err),
        }
    }

    if let Err(err) = service.apply(
        &campaign_id,
        ApplicationRequest {
            influencer_id: InfluencerId("inf-bo".to_string()),
            negotiated_amount: None,
            applied_on: None,
        },
    ) {
        println!("- inf-bo refused: {}", err);
    }

    let events = notifications.events();
    if events.is_empty() {
        println!("\nNotifications: none dispatched");
    } else {
        println!("\nNotifications");
        for event in events {
            println!("- template={} -> {}", event.template, event.recipient.0);
        }
    }

    Ok(())
}

fn campaign_view(desk: &DeskSnapshot, campaign: String) -> Result<CampaignSnapshot, AppError> {
    desk.campaign(&CampaignId(campaign))
        .ok_or_else(|| RepositoryError::NotFound.into())
}

fn describe_budget(budget: &BudgetResolution) -> String {
    let amount = match budget.amount {
        Some(amount) => format!("budget {amount}"),
        None => "no budget visible".to_string(),
    };
    match budget.stale_assignment {
        Some(phase) => format!(
            "{amount} via {} (assigned phase {phase} no longer exists)",
            budget.source.label()
        ),
        None => format!("{amount} via {}", budget.source.label()),
    }
}
