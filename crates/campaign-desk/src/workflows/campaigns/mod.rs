//! Campaign eligibility matching, tiered budget visibility, and the application workflow
//! built on top of them.
//!
//! `eligibility` and `budget` are pure functions over snapshots; `repository` and `service`
//! own the mutable state and hand those snapshots in.

pub mod budget;
pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use budget::{
    highest_active_phase, negotiation_enabled, resolve_budget, visible_budget, BudgetResolution,
    BudgetSource,
};
pub use domain::{
    ApplicantProfile, Application, ApplicationId, ApplicationStatus, Campaign, CampaignId,
    CampaignPhase, CampaignStatus, InfluencerId, InfluencerVisibility, Notification,
};
pub use eligibility::{
    eligibility_verdict, eligible_applicants, eligible_campaigns, is_eligible,
    EligibilityVerdict, IneligibilityReason,
};
pub use repository::{
    ApplicationStatusView, CampaignRepository, InMemoryCampaignRepository, NotificationError,
    NotificationPublisher, RepositoryError,
};
pub use router::campaign_router;
pub use service::{
    ApplicationRequest, BudgetQuote, CampaignDeskService, CampaignServiceError, ReviewDecision,
    ReviewOutcome,
};
pub use snapshot::{CampaignSnapshot, DeskSnapshot, SnapshotError};
