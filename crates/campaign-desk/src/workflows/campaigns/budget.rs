use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, Campaign, CampaignPhase, InfluencerId, InfluencerVisibility,
};

/// Rule of the resolution chain that produced a visible budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BudgetSource {
    /// The influencer already applied; the figure recorded at apply time is frozen.
    AlreadyApplied { application_id: ApplicationId },
    CustomOffer,
    AssignedPhase { phase_number: u32 },
    HighestActivePhase { phase_number: u32 },
    /// No rule matched and no phase is active; nothing is shown.
    NoActivePhase,
}

impl BudgetSource {
    pub const fn label(&self) -> &'static str {
        match self {
            BudgetSource::AlreadyApplied { .. } => "already_applied",
            BudgetSource::CustomOffer => "custom_offer",
            BudgetSource::AssignedPhase { .. } => "assigned_phase",
            BudgetSource::HighestActivePhase { .. } => "highest_active_phase",
            BudgetSource::NoActivePhase => "no_active_phase",
        }
    }
}

/// Budget figure an influencer is shown, along with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResolution {
    pub source: BudgetSource,
    /// `None` means no budget is visible.
    pub amount: Option<u32>,
    /// Phase number of an assignment whose phase no longer exists. Resolution fell through
    /// to the next rule when this is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_assignment: Option<u32>,
}

/// Walk the resolution chain for one influencer.
///
/// Rows that belong to other campaigns are ignored, so callers may pass unfiltered
/// collections. The first matching rule wins:
/// an existing application, then a non-zero custom offer, then an assigned phase that
/// still exists, then the active phase with the highest number.
pub fn resolve_budget(
    campaign: &Campaign,
    phases: &[CampaignPhase],
    visibility: &[InfluencerVisibility],
    applications: &[Application],
    influencer_id: &InfluencerId,
) -> BudgetResolution {
    if let Some(application) = applications.iter().find(|application| {
        application.campaign_id == campaign.id && &application.influencer_id == influencer_id
    }) {
        return BudgetResolution {
            source: BudgetSource::AlreadyApplied {
                application_id: application.id.clone(),
            },
            amount: application.budget_applied_for,
            stale_assignment: None,
        };
    }

    let row = visibility_row(campaign, visibility, influencer_id);

    if let Some(amount) = row.and_then(InfluencerVisibility::known_custom_offer) {
        return BudgetResolution {
            source: BudgetSource::CustomOffer,
            amount: Some(amount),
            stale_assignment: None,
        };
    }

    let mut stale_assignment = None;
    if let Some(assigned) = row.and_then(|row| row.assigned_phase) {
        match campaign_phases(campaign, phases).find(|phase| phase.phase_number == assigned) {
            Some(phase) => {
                return BudgetResolution {
                    source: BudgetSource::AssignedPhase {
                        phase_number: phase.phase_number,
                    },
                    amount: Some(phase.budget_amount),
                    stale_assignment: None,
                };
            }
            None => stale_assignment = Some(assigned),
        }
    }

    match highest_active_phase(campaign, phases) {
        Some(phase) => BudgetResolution {
            source: BudgetSource::HighestActivePhase {
                phase_number: phase.phase_number,
            },
            amount: Some(phase.budget_amount),
            stale_assignment,
        },
        None => BudgetResolution {
            source: BudgetSource::NoActivePhase,
            amount: None,
            stale_assignment,
        },
    }
}

/// Single budget figure shown to `influencer_id`, or `None` when nothing is visible.
pub fn visible_budget(
    campaign: &Campaign,
    phases: &[CampaignPhase],
    visibility: &[InfluencerVisibility],
    applications: &[Application],
    influencer_id: &InfluencerId,
) -> Option<u32> {
    resolve_budget(campaign, phases, visibility, applications, influencer_id).amount
}

/// Whether budget negotiation is offered to `influencer_id`.
///
/// Does not consider whether the influencer already applied.
pub fn negotiation_enabled(
    campaign: &Campaign,
    visibility: &[InfluencerVisibility],
    influencer_id: &InfluencerId,
) -> bool {
    visibility_row(campaign, visibility, influencer_id)
        .map(|row| row.negotiation_visible)
        .unwrap_or(false)
}

/// Active phase with the largest phase number. Recomputed on every call.
pub fn highest_active_phase<'a>(
    campaign: &Campaign,
    phases: &'a [CampaignPhase],
) -> Option<&'a CampaignPhase> {
    campaign_phases(campaign, phases)
        .filter(|phase| phase.is_active)
        .max_by_key(|phase| phase.phase_number)
}

fn campaign_phases<'a, 'c>(
    campaign: &'c Campaign,
    phases: &'a [CampaignPhase],
) -> impl Iterator<Item = &'a CampaignPhase> + 'c
where
    'a: 'c,
{
    phases
        .iter()
        .filter(move |phase| phase.campaign_id == campaign.id)
}

fn visibility_row<'a>(
    campaign: &Campaign,
    visibility: &'a [InfluencerVisibility],
    influencer_id: &InfluencerId,
) -> Option<&'a InfluencerVisibility> {
    visibility
        .iter()
        .find(|row| row.campaign_id == campaign.id && &row.influencer_id == influencer_id)
}
