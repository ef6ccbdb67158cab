use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignId(pub String);

/// Stable database identifier of an influencer profile, distinct from any auth identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InfluencerId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Lifecycle of a campaign. Only active campaigns accept applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl CampaignStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Archived => "archived",
        }
    }
}

/// A brand's solicitation together with its targeting criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    #[serde(default)]
    pub min_followers: Option<u32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub status: CampaignStatus,
}

impl Campaign {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    /// Minimum follower count, treating `0` as unrestricted.
    pub fn known_min_followers(&self) -> Option<u32> {
        self.min_followers.filter(|minimum| *minimum > 0)
    }

    /// Target city, treating blank strings as unrestricted.
    pub fn known_city(&self) -> Option<&str> {
        known_text(self.city.as_deref())
    }
}

/// Candidate profile that may apply to campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub db_id: InfluencerId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub follower_count: Option<u32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ApplicantProfile {
    /// Follower count, treating a recorded `0` as not yet known.
    pub fn known_follower_count(&self) -> Option<u32> {
        self.follower_count.filter(|count| *count > 0)
    }

    pub fn known_city(&self) -> Option<&str> {
        known_text(self.city.as_deref())
    }
}

fn known_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Review state of an application. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

/// Record of one influencer applying to one campaign, with the budget frozen at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub campaign_id: CampaignId,
    pub influencer_id: InfluencerId,
    pub status: ApplicationStatus,
    pub budget_applied_for: Option<u32>,
    #[serde(default)]
    pub is_negotiated: bool,
    #[serde(default)]
    pub final_offer_amount: Option<u32>,
    pub applied_on: NaiveDate,
}

/// Numbered budget tier of a campaign. Numbers are unique per campaign but may have gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPhase {
    pub campaign_id: CampaignId,
    pub phase_number: u32,
    pub budget_amount: u32,
    #[serde(default)]
    pub is_active: bool,
}

/// Per-influencer exception to the default phase budget and negotiation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluencerVisibility {
    pub campaign_id: CampaignId,
    pub influencer_id: InfluencerId,
    #[serde(default)]
    pub assigned_phase: Option<u32>,
    #[serde(default)]
    pub negotiation_visible: bool,
    #[serde(default)]
    pub custom_offer_amount: Option<u32>,
}

impl InfluencerVisibility {
    pub fn new(campaign_id: CampaignId, influencer_id: InfluencerId) -> Self {
        Self {
            campaign_id,
            influencer_id,
            assigned_phase: None,
            negotiation_visible: false,
            custom_offer_amount: None,
        }
    }

    /// Custom offer, treating `0` as no override.
    pub fn known_custom_offer(&self) -> Option<u32> {
        self.custom_offer_amount.filter(|amount| *amount > 0)
    }
}

/// Message delivered to an influencer when the desk acts on their application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: InfluencerId,
    pub template: String,
    pub campaign_id: CampaignId,
    pub details: BTreeMap<String, String>,
}
