use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::budget::{negotiation_enabled, resolve_budget, BudgetResolution};
use super::domain::{
    ApplicantProfile, Application, Campaign, CampaignId, CampaignPhase, InfluencerId,
    InfluencerVisibility,
};
use super::eligibility::{eligibility_verdict, eligible_applicants, EligibilityVerdict};

/// Consistent, owned view of one campaign's rows plus the applicant pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub campaign: Campaign,
    pub phases: Vec<CampaignPhase>,
    pub visibility: Vec<InfluencerVisibility>,
    pub applications: Vec<Application>,
    pub applicants: Vec<ApplicantProfile>,
}

impl CampaignSnapshot {
    pub fn applicant(&self, influencer_id: &InfluencerId) -> Option<&ApplicantProfile> {
        self.applicants
            .iter()
            .find(|profile| &profile.db_id == influencer_id)
    }

    pub fn application_for(&self, influencer_id: &InfluencerId) -> Option<&Application> {
        self.applications
            .iter()
            .find(|application| &application.influencer_id == influencer_id)
    }

    pub fn eligible_applicants(&self) -> Vec<&ApplicantProfile> {
        eligible_applicants(&self.campaign, &self.applicants)
    }

    pub fn verdict(&self, applicant: &ApplicantProfile) -> EligibilityVerdict {
        eligibility_verdict(&self.campaign, applicant)
    }

    pub fn budget_for(&self, influencer_id: &InfluencerId) -> BudgetResolution {
        resolve_budget(
            &self.campaign,
            &self.phases,
            &self.visibility,
            &self.applications,
            influencer_id,
        )
    }

    pub fn negotiation_enabled(&self, influencer_id: &InfluencerId) -> bool {
        negotiation_enabled(&self.campaign, &self.visibility, influencer_id)
    }

    /// Visibility rows whose assigned phase no longer exists in this campaign.
    pub fn stale_assignments(&self) -> Vec<&InfluencerVisibility> {
        self.visibility
            .iter()
            .filter(|row| {
                row.assigned_phase.is_some_and(|assigned| {
                    !self
                        .phases
                        .iter()
                        .any(|phase| phase.phase_number == assigned)
                })
            })
            .collect()
    }
}

/// Full desk export: every campaign, phase, visibility row, applicant, and application.
///
/// This is the JSON document accepted by the CLI and used to seed the in-memory repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskSnapshot {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub phases: Vec<CampaignPhase>,
    #[serde(default)]
    pub visibility: Vec<InfluencerVisibility>,
    #[serde(default)]
    pub applicants: Vec<ApplicantProfile>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl DeskSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Narrow the export down to one campaign.
    pub fn campaign(&self, id: &CampaignId) -> Option<CampaignSnapshot> {
        let campaign = self.campaigns.iter().find(|campaign| &campaign.id == id)?;

        Some(CampaignSnapshot {
            campaign: campaign.clone(),
            phases: self
                .phases
                .iter()
                .filter(|phase| &phase.campaign_id == id)
                .cloned()
                .collect(),
            visibility: self
                .visibility
                .iter()
                .filter(|row| &row.campaign_id == id)
                .cloned()
                .collect(),
            applications: self
                .applications
                .iter()
                .filter(|application| &application.campaign_id == id)
                .cloned()
                .collect(),
            applicants: self.applicants.clone(),
        })
    }
}

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read desk snapshot: {}", err),
            SnapshotError::Json(err) => write!(f, "invalid desk snapshot JSON: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
