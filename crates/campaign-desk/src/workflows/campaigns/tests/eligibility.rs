use super::common::*;
use crate::workflows::campaigns::domain::CampaignStatus;
use crate::workflows::campaigns::eligibility::{
    eligibility_verdict, eligible_applicants, eligible_campaigns, is_eligible,
    EligibilityVerdict, IneligibilityReason,
};

#[test]
fn matching_profile_is_eligible() {
    let applicant = profile("inf-ada", Some(10_000), Some("Austin"), &["fashion", "travel"]);

    assert!(is_eligible(&campaign(), &applicant));
    assert_eq!(
        eligibility_verdict(&campaign(), &applicant),
        EligibilityVerdict::Eligible
    );
}

#[test]
fn low_follower_count_is_ineligible() {
    let applicant = profile("inf-bo", Some(3_000), Some("Austin"), &["fashion"]);

    assert!(!is_eligible(&campaign(), &applicant));
    match eligibility_verdict(&campaign(), &applicant) {
        EligibilityVerdict::Ineligible {
            reason: IneligibilityReason::InsufficientFollowers { required, actual },
        } => {
            assert_eq!(required, 5000);
            assert_eq!(actual, 3000);
        }
        other => panic!("expected follower shortfall, got {other:?}"),
    }
}

#[test]
fn follower_minimum_is_inclusive() {
    let applicant = profile("inf-edge", Some(5_000), Some("Austin"), &["fashion"]);
    assert!(is_eligible(&campaign(), &applicant));
}

#[test]
fn inactive_campaigns_have_no_eligible_applicants() {
    let pool = vec![
        profile("inf-ada", Some(10_000), Some("Austin"), &["fashion"]),
        profile("inf-cy", None, None, &[]),
    ];

    for status in [
        CampaignStatus::Draft,
        CampaignStatus::Completed,
        CampaignStatus::Archived,
    ] {
        let mut closed = campaign();
        closed.status = status;
        assert!(eligible_applicants(&closed, &pool).is_empty());
        assert_eq!(
            eligibility_verdict(&closed, &pool[0]),
            EligibilityVerdict::Ineligible {
                reason: IneligibilityReason::CampaignInactive { status },
            }
        );
    }
}

#[test]
fn missing_profile_data_never_disqualifies() {
    let unknown = profile("inf-cy", None, None, &[]);
    assert!(is_eligible(&campaign(), &unknown));

    let zero_followers = profile("inf-zero", Some(0), Some(""), &[]);
    assert!(is_eligible(&campaign(), &zero_followers));

    let unknown_followers = profile("inf-dee", None, Some("Austin"), &["fashion"]);
    assert!(is_eligible(&campaign(), &unknown_followers));
}

#[test]
fn unrestricted_campaign_fields_pass_everyone() {
    let mut relaxed = campaign();
    relaxed.min_followers = Some(0);
    relaxed.city = Some(String::new());
    relaxed.categories.clear();

    let applicant = profile("inf-far", Some(12), Some("Reno"), &["gaming"]);
    assert!(is_eligible(&relaxed, &applicant));
}

#[test]
fn empty_campaign_categories_ignore_applicant_categories() {
    let mut no_categories = campaign();
    no_categories.categories.clear();

    for categories in [&[][..], &["gaming"][..], &["fashion", "food"][..]] {
        let applicant = profile("inf-any", Some(9_000), Some("Austin"), categories);
        assert!(is_eligible(&no_categories, &applicant));
    }
}

#[test]
fn city_comparison_is_exact() {
    let lowercase = profile("inf-lc", Some(9_000), Some("austin"), &["fashion"]);
    match eligibility_verdict(&campaign(), &lowercase) {
        EligibilityVerdict::Ineligible {
            reason: IneligibilityReason::CityMismatch { required, actual },
        } => {
            assert_eq!(required, "Austin");
            assert_eq!(actual, "austin");
        }
        other => panic!("expected city mismatch, got {other:?}"),
    }
}

#[test]
fn disjoint_categories_are_ineligible() {
    let applicant = profile("inf-food", Some(9_000), Some("Austin"), &["food", "travel"]);
    assert_eq!(
        eligibility_verdict(&campaign(), &applicant),
        EligibilityVerdict::Ineligible {
            reason: IneligibilityReason::NoSharedCategory,
        }
    );
}

#[test]
fn batch_filter_preserves_order_and_duplicates() {
    let ada = profile("inf-ada", Some(10_000), Some("Austin"), &["fashion"]);
    let bo = profile("inf-bo", Some(3_000), Some("Austin"), &["fashion"]);
    let cy = profile("inf-cy", None, None, &[]);
    let pool = vec![cy.clone(), bo, ada.clone(), cy.clone()];

    let eligible = eligible_applicants(&campaign(), &pool);

    let ids: Vec<&str> = eligible.iter().map(|p| p.db_id.0.as_str()).collect();
    assert_eq!(ids, vec!["inf-cy", "inf-ada", "inf-cy"]);
}

#[test]
fn verdict_is_idempotent() {
    let applicant = profile("inf-bo", Some(3_000), Some("Austin"), &["fashion"]);
    let first = eligibility_verdict(&campaign(), &applicant);
    let second = eligibility_verdict(&campaign(), &applicant);
    assert_eq!(first, second);
    assert_eq!(
        is_eligible(&campaign(), &applicant),
        is_eligible(&campaign(), &applicant)
    );
}

#[test]
fn applicant_side_listing_filters_campaigns() {
    let mut draft = open_campaign();
    draft.status = CampaignStatus::Draft;
    let campaigns = vec![campaign(), open_campaign(), draft];

    let newcomer = profile("inf-new", Some(800), Some("Austin"), &["fashion"]);
    let listed = eligible_campaigns(&campaigns, &newcomer);

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, open_campaign().id);
}

#[test]
fn summaries_explain_the_refusal() {
    let reason = IneligibilityReason::InsufficientFollowers {
        required: 5000,
        actual: 3000,
    };
    assert!(reason.summary().contains("5000"));
    assert!(EligibilityVerdict::Eligible.summary().contains("eligible"));
    assert!(IneligibilityReason::CampaignInactive {
        status: CampaignStatus::Archived
    }
    .summary()
    .contains("archived"));
}
