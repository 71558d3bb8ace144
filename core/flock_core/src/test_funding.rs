use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::invariants::{
    assert_all_project_invariants, assert_current_is_oldest_active,
    assert_total_ignores_uncharged,
};
use crate::{
    available_rewards, current, donation_total, funding_percentage, Donation, ModelError, Money,
    Project, ProjectSummary, Reward,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn money(amount: Decimal) -> Money {
    Money::new(amount).unwrap()
}

fn project(id: i64, goal: Decimal, active: bool, age_days: i64) -> Project {
    Project {
        id,
        created_at: t0() - Duration::days(age_days),
        is_active: active,
        title: format!("Project {id}"),
        funding_goal: money(goal),
        default_amount: None,
    }
}

fn reward(id: i64, project_id: i64, cap: Option<u32>, amount: Decimal) -> Reward {
    Reward {
        id,
        project_id,
        title: format!("Reward {id}"),
        available_times: cap,
        donation_amount: money(amount),
    }
}

fn donation(project_id: i64, amount: Decimal, charged: bool, reward: Option<i64>) -> Donation {
    Donation {
        id: Uuid::new_v4(),
        project_id,
        created_at: t0(),
        charged_at: charged.then(t0),
        amount: money(amount),
        selected_reward: reward,
        full_name: "Ada Backer".to_string(),
        email: "ada@example.com".to_string(),
        postal_address: None,
        transaction: String::new(),
    }
}

#[test]
fn test_zero_total_gives_zero_percentage() {
    let p = project(1, dec!(500.00), true, 0);
    let total = donation_total(p.id, &[]);
    assert_eq!(total, Decimal::ZERO);
    assert_eq!(funding_percentage(total, p.funding_goal).unwrap(), Decimal::ZERO);
}

#[test]
fn test_percentage_counts_only_charged_donations() {
    let p = project(1, dec!(100.00), true, 0);
    let donations = vec![
        donation(1, dec!(25.00), true, None),
        donation(1, dec!(50.00), true, None),
        donation(1, dec!(1000.00), false, None),
        donation(2, dec!(40.00), true, None),
    ];

    let total = donation_total(p.id, &donations);
    assert_total_ignores_uncharged(p.id, &donations, total);
    assert_eq!(total, dec!(75.00));
    assert_eq!(funding_percentage(total, p.funding_goal).unwrap(), dec!(75.00));
}

#[test]
fn test_percentage_is_exact_decimal() {
    let pct = funding_percentage(dec!(10.00), money(dec!(30.00))).unwrap();
    assert_eq!(pct.round_dp(4), dec!(33.3333));
    let over = funding_percentage(dec!(150.00), money(dec!(100.00))).unwrap();
    assert_eq!(over, dec!(150));
}

#[test]
fn test_zero_goal_percentage_is_an_error() {
    assert_eq!(
        funding_percentage(dec!(10.00), Money::ZERO),
        Err(ModelError::UndefinedPercentage)
    );
}

#[test]
fn test_percentage_overflow_is_an_error() {
    assert_eq!(
        funding_percentage(Decimal::MAX, money(dec!(1.00))),
        Err(ModelError::PrecisionExceeded(Decimal::MAX))
    );
    let huge = Decimal::MAX / dec!(100);
    assert_eq!(
        funding_percentage(huge, money(dec!(0.01))),
        Err(ModelError::PrecisionExceeded(huge))
    );
}

#[test]
fn test_capped_reward_excluded_when_exhausted() {
    let rewards = vec![reward(10, 1, Some(2), dec!(20.00))];
    let donations = vec![
        donation(1, dec!(20.00), true, Some(10)),
        donation(1, dec!(25.00), false, Some(10)),
    ];
    assert!(available_rewards(1, &rewards, &donations).is_empty());
}

#[test]
fn test_capped_reward_included_with_slots_left() {
    let rewards = vec![reward(10, 1, Some(2), dec!(20.00))];
    let donations = vec![donation(1, dec!(20.00), true, Some(10))];
    let available = available_rewards(1, &rewards, &donations);
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, 10);
}

#[test]
fn test_unlimited_reward_always_available() {
    let rewards = vec![reward(10, 1, None, dec!(5.00))];
    let donations: Vec<Donation> = (0..50)
        .map(|_| donation(1, dec!(5.00), true, Some(10)))
        .collect();
    assert_eq!(available_rewards(1, &rewards, &donations).len(), 1);
}

#[test]
fn test_zero_cap_reward_never_available() {
    let rewards = vec![reward(10, 1, Some(0), dec!(5.00))];
    assert!(available_rewards(1, &rewards, &[]).is_empty());
}

#[test]
fn test_available_rewards_sorted_and_scoped_to_project() {
    let rewards = vec![
        reward(1, 1, None, dec!(100.00)),
        reward(2, 1, None, dec!(10.00)),
        reward(3, 2, None, dec!(1.00)),
        reward(4, 1, None, dec!(50.00)),
    ];
    let ids: Vec<i64> = available_rewards(1, &rewards, &[])
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![2, 4, 1]);
}

#[test]
fn test_current_none_without_active_projects() {
    let projects = vec![project(1, dec!(10.00), false, 3), project(2, dec!(10.00), false, 1)];
    assert!(current(&projects).is_none());
    assert!(current(&[]).is_none());
    assert_current_is_oldest_active(&projects);
}

#[test]
fn test_current_is_earliest_active() {
    let projects = vec![
        project(1, dec!(10.00), false, 30),
        project(2, dec!(10.00), true, 5),
        project(3, dec!(10.00), true, 10),
        project(4, dec!(10.00), true, 1),
    ];
    assert_eq!(current(&projects).map(|p| p.id), Some(3));
    assert_current_is_oldest_active(&projects);
    for p in &projects {
        assert_all_project_invariants(p);
    }
}

#[test]
fn test_summary_snapshot() {
    let p = project(1, dec!(200.00), true, 0);
    let rewards = vec![
        reward(1, 1, Some(1), dec!(10.00)),
        reward(2, 1, None, dec!(50.00)),
    ];
    let donations = vec![
        donation(1, dec!(10.00), true, Some(1)),
        donation(1, dec!(90.00), true, None),
    ];

    let summary = ProjectSummary::compute(p, &rewards, &donations);
    assert_eq!(summary.donation_total, dec!(100.00));
    assert_eq!(summary.funding_percentage, Some(dec!(50)));
    assert_eq!(summary.available_rewards.len(), 1);
    assert_eq!(summary.available_rewards[0].id, 2);
}

#[test]
fn test_summary_with_zero_goal_has_no_percentage() {
    let mut p = project(1, dec!(1.00), true, 0);
    p.funding_goal = Money::ZERO;
    let summary = ProjectSummary::from_parts(p, Decimal::ZERO, vec![]);
    assert_eq!(summary.funding_percentage, None);
}
