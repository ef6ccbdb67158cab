use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantProfile, Application, ApplicationId, ApplicationStatus, Campaign, CampaignId,
    CampaignPhase, InfluencerId, InfluencerVisibility, Notification,
};
use super::snapshot::{CampaignSnapshot, DeskSnapshot};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations hand out owned snapshots; a snapshot is never partially updated.
pub trait CampaignRepository: Send + Sync {
    fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign, RepositoryError>;
    fn list_campaigns(&self) -> Result<Vec<Campaign>, RepositoryError>;
    fn upsert_phase(&self, phase: CampaignPhase) -> Result<(), RepositoryError>;
    fn delete_phase(&self, id: &CampaignId, phase_number: u32) -> Result<(), RepositoryError>;
    fn upsert_visibility(&self, row: InfluencerVisibility) -> Result<(), RepositoryError>;
    fn upsert_applicant(&self, profile: ApplicantProfile) -> Result<(), RepositoryError>;
    fn fetch_applicant(&self, id: &InfluencerId)
        -> Result<Option<ApplicantProfile>, RepositoryError>;
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    /// Replace a stored application only while its status is still `expected`.
    ///
    /// The check and the write happen atomically; a concurrent change is reported as
    /// `StatusChanged` with the status found.
    fn transition_application(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<(), RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    fn snapshot(&self, id: &CampaignId) -> Result<Option<CampaignSnapshot>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("application is already {}", .current.label())]
    StatusChanged { current: ApplicationStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound delivery hook for influencer notifications (e-mail, in-app inbox, ...).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub campaign_id: CampaignId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_applied_for: Option<u32>,
    pub is_negotiated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_offer_amount: Option<u32>,
}

impl From<&Application> for ApplicationStatusView {
    fn from(application: &Application) -> Self {
        Self {
            application_id: application.id.clone(),
            campaign_id: application.campaign_id.clone(),
            status: application.status.label().to_string(),
            budget_applied_for: application.budget_applied_for,
            is_negotiated: application.is_negotiated,
            final_offer_amount: application.final_offer_amount,
        }
    }
}

#[derive(Default)]
struct DeskState {
    campaigns: HashMap<CampaignId, Campaign>,
    phases: HashMap<(CampaignId, u32), CampaignPhase>,
    visibility: HashMap<(CampaignId, InfluencerId), InfluencerVisibility>,
    applicants: Vec<ApplicantProfile>,
    applications: HashMap<ApplicationId, Application>,
}

/// Process-local repository backing the CLI, the demo server, and tests.
#[derive(Default)]
pub struct InMemoryCampaignRepository {
    state: Mutex<DeskState>,
}

impl InMemoryCampaignRepository {
    /// Build a repository pre-populated from a desk snapshot.
    ///
    /// Later rows replace earlier ones sharing the same key; duplicate applications for a
    /// (campaign, influencer) pair are rejected.
    pub fn seeded(snapshot: DeskSnapshot) -> Result<Self, RepositoryError> {
        let repository = Self::default();
        for campaign in snapshot.campaigns {
            repository.insert_campaign(campaign)?;
        }
        for phase in snapshot.phases {
            repository.upsert_phase(phase)?;
        }
        for row in snapshot.visibility {
            repository.upsert_visibility(row)?;
        }
        for profile in snapshot.applicants {
            repository.upsert_applicant(profile)?;
        }
        for application in snapshot.applications {
            repository.insert_application(application)?;
        }
        Ok(repository)
    }

    fn lock(&self) -> Result<MutexGuard<'_, DeskState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl CampaignRepository for InMemoryCampaignRepository {
    fn insert_campaign(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.campaigns.contains_key(&campaign.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.campaigns.insert(campaign.id.clone(), campaign.clone());
        Ok(campaign)
    }

    fn list_campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let guard = self.lock()?;
        let mut campaigns: Vec<Campaign> = guard.campaigns.values().cloned().collect();
        campaigns.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(campaigns)
    }

    fn upsert_phase(&self, phase: CampaignPhase) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.campaigns.contains_key(&phase.campaign_id) {
            return Err(RepositoryError::NotFound);
        }
        guard
            .phases
            .insert((phase.campaign_id.clone(), phase.phase_number), phase);
        Ok(())
    }

    fn delete_phase(&self, id: &CampaignId, phase_number: u32) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        guard
            .phases
            .remove(&(id.clone(), phase_number))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn upsert_visibility(&self, row: InfluencerVisibility) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.campaigns.contains_key(&row.campaign_id) {
            return Err(RepositoryError::NotFound);
        }
        guard
            .visibility
            .insert((row.campaign_id.clone(), row.influencer_id.clone()), row);
        Ok(())
    }

    fn upsert_applicant(&self, profile: ApplicantProfile) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard
            .applicants
            .iter()
            .position(|existing| existing.db_id == profile.db_id)
        {
            Some(index) => guard.applicants[index] = profile,
            None => guard.applicants.push(profile),
        }
        Ok(())
    }

    fn fetch_applicant(
        &self,
        id: &InfluencerId,
    ) -> Result<Option<ApplicantProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applicants
            .iter()
            .find(|profile| &profile.db_id == id)
            .cloned())
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.lock()?;
        let duplicate = guard.applications.values().any(|existing| {
            existing.campaign_id == application.campaign_id
                && existing.influencer_id == application.influencer_id
        });
        if duplicate || guard.applications.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn transition_application(
        &self,
        expected: ApplicationStatus,
        application: Application,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let existing = guard
            .applications
            .get_mut(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if existing.status != expected {
            return Err(RepositoryError::StatusChanged {
                current: existing.status,
            });
        }
        *existing = application;
        Ok(())
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.applications.get(id).cloned())
    }

    fn snapshot(&self, id: &CampaignId) -> Result<Option<CampaignSnapshot>, RepositoryError> {
        let guard = self.lock()?;
        let Some(campaign) = guard.campaigns.get(id).cloned() else {
            return Ok(None);
        };

        let mut phases: Vec<CampaignPhase> = guard
            .phases
            .values()
            .filter(|phase| &phase.campaign_id == id)
            .cloned()
            .collect();
        phases.sort_by_key(|phase| phase.phase_number);

        let mut visibility: Vec<InfluencerVisibility> = guard
            .visibility
            .values()
            .filter(|row| &row.campaign_id == id)
            .cloned()
            .collect();
        visibility.sort_by(|left, right| left.influencer_id.cmp(&right.influencer_id));

        let mut applications: Vec<Application> = guard
            .applications
            .values()
            .filter(|application| &application.campaign_id == id)
            .cloned()
            .collect();
        applications.sort_by(|left, right| left.influencer_id.cmp(&right.influencer_id));

        Ok(Some(CampaignSnapshot {
            campaign,
            phases,
            visibility,
            applications,
            applicants: guard.applicants.clone(),
        }))
    }
}
