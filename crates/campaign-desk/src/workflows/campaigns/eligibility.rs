use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, Campaign, CampaignStatus};

/// Outcome of matching one applicant against one campaign's targeting criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum EligibilityVerdict {
    Eligible,
    Ineligible { reason: IneligibilityReason },
}

impl EligibilityVerdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityVerdict::Eligible)
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityVerdict::Eligible => "eligible to apply".to_string(),
            EligibilityVerdict::Ineligible { reason } => reason.summary(),
        }
    }
}

/// First targeting criterion an applicant failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibilityReason {
    CampaignInactive { status: CampaignStatus },
    InsufficientFollowers { required: u32, actual: u32 },
    CityMismatch { required: String, actual: String },
    NoSharedCategory,
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::CampaignInactive { status } => {
                format!("campaign is {} and not accepting applications", status.label())
            }
            IneligibilityReason::InsufficientFollowers { required, actual } => {
                format!("requires {required} followers, profile has {actual}")
            }
            IneligibilityReason::CityMismatch { required, actual } => {
                format!("campaign targets {required}, profile is in {actual}")
            }
            IneligibilityReason::NoSharedCategory => {
                "no category in common with the campaign".to_string()
            }
        }
    }
}

/// Match an applicant against a campaign.
///
/// Criteria are checked in a fixed order and the first failure is reported. A criterion
/// only applies when both the campaign and the profile carry a value for it, so
/// incomplete profiles are never disqualified by missing data.
pub fn eligibility_verdict(campaign: &Campaign, applicant: &ApplicantProfile) -> EligibilityVerdict {
    match first_failure(campaign, applicant) {
        Some(reason) => EligibilityVerdict::Ineligible { reason },
        None => EligibilityVerdict::Eligible,
    }
}

pub fn is_eligible(campaign: &Campaign, applicant: &ApplicantProfile) -> bool {
    first_failure(campaign, applicant).is_none()
}

/// Order-preserving filter of `applicants` down to those eligible for `campaign`.
pub fn eligible_applicants<'a>(
    campaign: &Campaign,
    applicants: &'a [ApplicantProfile],
) -> Vec<&'a ApplicantProfile> {
    applicants
        .iter()
        .filter(|applicant| is_eligible(campaign, applicant))
        .collect()
}

/// Order-preserving filter of `campaigns` down to those `applicant` may apply to.
pub fn eligible_campaigns<'a>(
    campaigns: &'a [Campaign],
    applicant: &ApplicantProfile,
) -> Vec<&'a Campaign> {
    campaigns
        .iter()
        .filter(|campaign| is_eligible(campaign, applicant))
        .collect()
}

fn first_failure(campaign: &Campaign, applicant: &ApplicantProfile) -> Option<IneligibilityReason> {
    if !campaign.is_active() {
        return Some(IneligibilityReason::CampaignInactive {
            status: campaign.status,
        });
    }

    if let (Some(required), Some(actual)) = (
        campaign.known_min_followers(),
        applicant.known_follower_count(),
    ) {
        if actual < required {
            return Some(IneligibilityReason::InsufficientFollowers { required, actual });
        }
    }

    if let (Some(required), Some(actual)) = (campaign.known_city(), applicant.known_city()) {
        if required != actual {
            return Some(IneligibilityReason::CityMismatch {
                required: required.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    if !campaign.categories.is_empty()
        && !applicant.categories.is_empty()
        && !campaign
            .categories
            .iter()
            .any(|category| applicant.categories.contains(category))
    {
        return Some(IneligibilityReason::NoSharedCategory);
    }

    None
}
