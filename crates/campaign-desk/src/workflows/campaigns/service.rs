use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::budget::BudgetResolution;
use super::domain::{
    ApplicantProfile, Application, ApplicationId, ApplicationStatus, Campaign, CampaignId,
    InfluencerId, InfluencerVisibility, Notification,
};
use super::eligibility::{eligible_campaigns, EligibilityVerdict, IneligibilityReason};
use super::repository::{
    CampaignRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use super::snapshot::CampaignSnapshot;

/// Service composing the repository, the eligibility filter, and the budget resolver.
pub struct CampaignDeskService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// What one influencer sees when opening a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetQuote {
    pub campaign_id: CampaignId,
    pub influencer_id: InfluencerId,
    pub eligibility: EligibilityVerdict,
    pub budget: BudgetResolution,
    pub negotiation_enabled: bool,
    pub already_applied: bool,
}

/// Influencer request to apply to a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub influencer_id: InfluencerId,
    /// Counter-offer; only accepted when negotiation is enabled for the influencer.
    #[serde(default)]
    pub negotiated_amount: Option<u32>,
    #[serde(default)]
    pub applied_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approve,
    Reject,
}

/// Admin decision on a pending application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub outcome: ReviewOutcome,
    #[serde(default)]
    pub final_offer_amount: Option<u32>,
}

impl<R, N> CampaignDeskService<R, N>
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn snapshot(&self, campaign_id: &CampaignId) -> Result<CampaignSnapshot, CampaignServiceError> {
        let snapshot = self
            .repository
            .snapshot(campaign_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(snapshot)
    }

    /// Eligibility, visible budget, and negotiation flag for one influencer.
    pub fn quote(
        &self,
        campaign_id: &CampaignId,
        influencer_id: &InfluencerId,
    ) -> Result<BudgetQuote, CampaignServiceError> {
        let snapshot = self.snapshot(campaign_id)?;
        let applicant = snapshot
            .applicant(influencer_id)
            .ok_or(RepositoryError::NotFound)?;

        let budget = snapshot.budget_for(influencer_id);
        if let Some(phase_number) = budget.stale_assignment {
            debug!(
                campaign = %campaign_id.0,
                influencer = %influencer_id.0,
                phase_number,
                "assigned phase no longer exists; using fallback budget"
            );
        }

        Ok(BudgetQuote {
            campaign_id: campaign_id.clone(),
            influencer_id: influencer_id.clone(),
            eligibility: snapshot.verdict(applicant),
            already_applied: snapshot.application_for(influencer_id).is_some(),
            negotiation_enabled: snapshot.negotiation_enabled(influencer_id),
            budget,
        })
    }

    /// Applicant pool filtered down to those eligible for the campaign, in pool order.
    pub fn eligible_applicants(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<ApplicantProfile>, CampaignServiceError> {
        let snapshot = self.snapshot(campaign_id)?;
        Ok(snapshot
            .eligible_applicants()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Record an application, freezing the budget the influencer sees right now.
    pub fn apply(
        &self,
        campaign_id: &CampaignId,
        request: ApplicationRequest,
    ) -> Result<Application, CampaignServiceError> {
        let snapshot = self.snapshot(campaign_id)?;
        let applicant = snapshot
            .applicant(&request.influencer_id)
            .ok_or(RepositoryError::NotFound)?;

        if let EligibilityVerdict::Ineligible { reason } = snapshot.verdict(applicant) {
            return Err(CampaignServiceError::Ineligible(reason));
        }
        if snapshot.application_for(&request.influencer_id).is_some() {
            return Err(RepositoryError::Conflict.into());
        }

        let (budget_applied_for, is_negotiated) = match request.negotiated_amount {
            Some(amount) => {
                if !snapshot.negotiation_enabled(&request.influencer_id) {
                    return Err(CampaignServiceError::NegotiationUnavailable);
                }
                (Some(amount), true)
            }
            None => (snapshot.budget_for(&request.influencer_id).amount, false),
        };

        let application = Application {
            id: next_application_id(),
            campaign_id: campaign_id.clone(),
            influencer_id: request.influencer_id,
            status: ApplicationStatus::Pending,
            budget_applied_for,
            is_negotiated,
            final_offer_amount: None,
            applied_on: request
                .applied_on
                .unwrap_or_else(|| Utc::now().date_naive()),
        };

        let stored = self.repository.insert_application(application)?;
        info!(
            application = %stored.id.0,
            campaign = %stored.campaign_id.0,
            influencer = %stored.influencer_id.0,
            budget = ?stored.budget_applied_for,
            negotiated = stored.is_negotiated,
            "application recorded"
        );
        Ok(stored)
    }

    /// Approve or reject a pending application and notify the influencer.
    ///
    /// Only one review of an application can win. When the notification cannot be
    /// delivered the application goes back to pending so the review can be retried.
    pub fn review(
        &self,
        application_id: &ApplicationId,
        decision: ReviewDecision,
    ) -> Result<Application, CampaignServiceError> {
        let pending = self
            .repository
            .fetch_application(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        if pending.status.is_terminal() {
            return Err(CampaignServiceError::AlreadyReviewed {
                status: pending.status,
            });
        }

        let mut application = pending.clone();
        let template = match decision.outcome {
            ReviewOutcome::Approve => {
                application.status = ApplicationStatus::Approved;
                application.final_offer_amount = decision
                    .final_offer_amount
                    .or(application.budget_applied_for);
                "application_approved"
            }
            ReviewOutcome::Reject => {
                application.status = ApplicationStatus::Rejected;
                application.final_offer_amount = decision.final_offer_amount;
                "application_rejected"
            }
        };

        self.transition(pending.status, application.clone())?;

        let notification = review_notification(&application, template);
        if let Err(err) = self.notifications.publish(notification) {
            warn!(
                application = %application.id.0,
                error = %err,
                "review notification failed; reverting to pending"
            );
            if let Err(revert) = self.transition(application.status, pending) {
                error!(
                    application = %application.id.0,
                    error = %revert,
                    "could not revert application after failed notification"
                );
            }
            return Err(err.into());
        }

        info!(
            application = %application.id.0,
            status = application.status.label(),
            "application reviewed"
        );
        Ok(application)
    }

    fn transition(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<(), CampaignServiceError> {
        match self.repository.transition_application(expected, application) {
            Ok(()) => Ok(()),
            Err(RepositoryError::StatusChanged { current }) => {
                Err(CampaignServiceError::AlreadyReviewed { status: current })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Campaigns the influencer may apply to, ordered by campaign id.
    pub fn eligible_campaigns(
        &self,
        influencer_id: &InfluencerId,
    ) -> Result<Vec<Campaign>, CampaignServiceError> {
        let applicant = self
            .repository
            .fetch_applicant(influencer_id)?
            .ok_or(RepositoryError::NotFound)?;
        let campaigns = self.repository.list_campaigns()?;
        Ok(eligible_campaigns(&campaigns, &applicant)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Create or replace the visibility row for a (campaign, influencer) pair.
    pub fn upsert_visibility(&self, row: InfluencerVisibility) -> Result<(), CampaignServiceError> {
        let snapshot = self.snapshot(&row.campaign_id)?;
        if let Some(assigned) = row.assigned_phase {
            if !snapshot
                .phases
                .iter()
                .any(|phase| phase.phase_number == assigned)
            {
                warn!(
                    campaign = %row.campaign_id.0,
                    influencer = %row.influencer_id.0,
                    assigned,
                    "visibility assigns a phase that does not exist"
                );
            }
        }

        self.repository.upsert_visibility(row)?;
        Ok(())
    }

    /// Clear assignments pointing at deleted phases. Returns how many rows changed.
    pub fn clear_stale_assignments(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<usize, CampaignServiceError> {
        let snapshot = self.snapshot(campaign_id)?;
        let stale: Vec<InfluencerVisibility> =
            snapshot.stale_assignments().into_iter().cloned().collect();

        for mut row in stale.iter().cloned() {
            row.assigned_phase = None;
            self.repository.upsert_visibility(row)?;
        }

        if !stale.is_empty() {
            info!(
                campaign = %campaign_id.0,
                cleared = stale.len(),
                "cleared stale phase assignments"
            );
        }
        Ok(stale.len())
    }
}

fn review_notification(application: &Application, template: &str) -> Notification {
    let mut details = BTreeMap::new();
    details.insert("application_id".to_string(), application.id.0.clone());
    details.insert(
        "status".to_string(),
        application.status.label().to_string(),
    );
    if let Some(amount) = application.final_offer_amount {
        details.insert("final_offer_amount".to_string(), amount.to_string());
    }
    Notification {
        recipient: application.influencer_id.clone(),
        template: template.to_string(),
        campaign_id: application.campaign_id.clone(),
        details,
    }
}

/// Error raised by the campaign desk service.
#[derive(Debug, thiserror::Error)]
pub enum CampaignServiceError {
    #[error("applicant is not eligible: {}", .0.summary())]
    Ineligible(IneligibilityReason),
    #[error("budget negotiation is not enabled for this influencer")]
    NegotiationUnavailable,
    #[error("application already {}", .status.label())]
    AlreadyReviewed { status: ApplicationStatus },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
