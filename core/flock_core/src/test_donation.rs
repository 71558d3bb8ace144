use chrono::{Duration, TimeZone, Utc};

use crate::invariants::{assert_charge_transition, assert_money_in_column};
use crate::{
    sort_donations, sort_projects, sort_rewards, ChargeStatus, ModelError, Money, NewDonation,
    NewProject, NewReward, Project, Reward, Validate,
};

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn reward(id: i64, project_id: i64, amount: &str) -> Reward {
    Reward {
        id,
        project_id,
        title: "Poster".to_string(),
        available_times: Some(3),
        donation_amount: money(amount),
    }
}

#[test]
fn test_new_donation_is_uncharged_with_random_id() {
    let a = NewDonation::new(1, money("12.34"), "Ada", "ada@example.com").into_donation();
    let b = NewDonation::new(1, money("12.34"), "Ada", "ada@example.com").into_donation();

    assert_eq!(a.status(), ChargeStatus::Uncharged);
    assert!(!a.is_charged());
    assert_ne!(a.id, b.id);
    assert_eq!(a.id.get_version_num(), 4);
    assert_money_in_column(&a.amount);
}

#[test]
fn test_amount_cents() {
    let d = NewDonation::new(1, money("12.34"), "Ada", "ada@example.com").into_donation();
    assert_eq!(d.amount_cents(), 1234);
    let d = NewDonation::new(1, money("0.5"), "Ada", "ada@example.com").into_donation();
    assert_eq!(d.amount_cents(), 50);
}

#[test]
fn test_charge_is_one_way() {
    let before = NewDonation::new(1, money("20"), "Ada", "ada@example.com").into_donation();
    let mut after = before.clone();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

    after.charge(at, Some("ch_123".to_string())).unwrap();
    assert_charge_transition(&before, &after);
    assert_eq!(after.status(), ChargeStatus::Charged);
    assert_eq!(after.transaction, "ch_123");

    let again = after.charge(at + Duration::hours(1), Some("ch_456".to_string()));
    assert_eq!(again, Err(ModelError::AlreadyCharged(after.id)));
    assert_eq!(after.charged_at, Some(at));
    assert_eq!(after.transaction, "ch_123");
}

#[test]
fn test_charge_without_reference_keeps_existing() {
    let mut input = NewDonation::new(1, money("20"), "Ada", "ada@example.com");
    input.transaction = "pi_abc".to_string();
    let mut donation = input.into_donation();

    donation.charge(Utc::now(), None).unwrap();
    assert!(donation.is_charged());
    assert_eq!(donation.transaction, "pi_abc");
}

#[test]
fn test_donation_input_validation() {
    let ok = NewDonation::new(1, money("5"), "Ada Lovelace", "ada@example.com");
    assert!(ok.validate().is_ok());

    let bad_email = NewDonation::new(1, money("5"), "Ada", "not-an-email");
    assert!(bad_email.validate().is_err());

    let no_name = NewDonation::new(1, money("5"), "", "ada@example.com");
    let err: ModelError = no_name.validate().unwrap_err().into();
    assert!(matches!(err, ModelError::Validation(_)));

    let long_name = NewDonation::new(1, money("5"), "x".repeat(201), "ada@example.com");
    assert!(long_name.validate().is_err());
}

#[test]
fn test_reward_must_match_project_and_threshold() {
    let donation = NewDonation::new(1, money("20.00"), "Ada", "ada@example.com").with_reward(7);

    assert!(donation.validate_against(&reward(7, 1, "20.00")).is_ok());

    assert_eq!(
        donation.validate_against(&reward(7, 2, "5.00")),
        Err(ModelError::RewardMismatch {
            reward_id: 7,
            reward_project: 2,
            project_id: 1,
        })
    );

    assert!(matches!(
        donation.validate_against(&reward(7, 1, "20.01")),
        Err(ModelError::BelowRewardThreshold { reward_id: 7, .. })
    ));
}

#[test]
fn test_project_and_reward_validation() {
    let project = NewProject::new("Community garden", money("1500"));
    assert!(project.validate().is_ok());
    assert!(project.is_active);

    let zero_goal = NewProject::new("Nothing", Money::ZERO);
    assert!(zero_goal.validate().is_err());

    let untitled = NewReward {
        project_id: 1,
        title: String::new(),
        available_times: None,
        donation_amount: money("1"),
    };
    assert!(untitled.validate().is_err());
}

#[test]
fn test_reward_label_and_availability() {
    let r = reward(1, 1, "10");
    assert_eq!(r.label(), "Poster (from 10.00)");
    assert!(r.is_available(2));
    assert!(!r.is_available(3));
    assert!(r.accepts(&money("10")));
    assert!(!r.accepts(&money("9.99")));
}

#[test]
fn test_natural_orderings() {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut rewards = vec![reward(1, 1, "30"), reward(2, 1, "5"), reward(3, 1, "10")];
    sort_rewards(&mut rewards);
    let ids: Vec<i64> = rewards.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let mut donations: Vec<_> = (0..3)
        .map(|i| {
            let mut d = NewDonation::new(1, money("1"), "Ada", "ada@example.com");
            d.created_at = base + Duration::minutes(i);
            d.into_donation()
        })
        .collect();
    sort_donations(&mut donations);
    assert!(donations[0].created_at > donations[1].created_at);
    assert!(donations[1].created_at > donations[2].created_at);

    let mut projects: Vec<Project> = (1..=3)
        .map(|i| Project {
            id: i,
            created_at: base + Duration::days(i),
            is_active: true,
            title: format!("P{i}"),
            funding_goal: money("100"),
            default_amount: Some(money("25")),
        })
        .collect();
    sort_projects(&mut projects);
    assert_eq!(projects[0].id, 3);
    assert_eq!(projects[0].to_string(), "P3");
}

#[test]
fn test_donation_serializes_amount_as_string() {
    let d = NewDonation::new(1, money("12.3"), "Ada", "ada@example.com").into_donation();
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["amount"], "12.30");
    assert_eq!(json["charged_at"], serde_json::Value::Null);
}
