//! Member context builder.
//!
//! Derives an ephemeral snapshot of computed attributes for one member at
//! one instant. The snapshot is a pure function of `(member, now)`: it is
//! rebuilt from scratch on every evaluation tick, never persisted, and
//! building it cannot fail -- missing optional data degrades to sentinels
//! or `false`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::member::{CheckInKind, Member, MemberStatus, MembershipType};

/// Sentinel for "no check-in / no measurement on record".
pub const NO_DATA_SENTINEL: i64 = 999;

/// Maximum history entries the streak walk will examine.
const STREAK_SCAN_LIMIT: usize = 100;

/// Derived, read-only snapshot of one member at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberContext {
    pub member_id: String,
    pub member_name: String,
    pub status: MemberStatus,
    pub membership_type: MembershipType,

    /// Whole days from now to the expiry date; negative once expired.
    pub days_until_expiry: i64,
    /// `max(0, -days_until_expiry)`.
    pub days_since_expiry: i64,
    /// Days since the most recent check-in, or [`NO_DATA_SENTINEL`].
    pub days_since_last_check_in: i64,
    /// Heuristic activity rating, clamped to 0..=100.
    pub engagement_score: u8,
    /// Consecutive calendar days with a check-in, ending today.
    pub current_streak: u32,
    pub is_birthday_today: bool,
    pub is_new_member: bool,
    pub is_trial: bool,
    pub is_vip: bool,
    /// Check-ins in the trailing 30 days / 4, one decimal.
    pub avg_weekly_check_ins: f64,
    pub total_check_ins: usize,
    pub gym_only_check_ins: usize,
    pub class_check_ins: usize,
    /// Days since the latest health sample, or [`NO_DATA_SENTINEL`].
    pub days_since_last_measure: i64,
    /// Latest weight minus previous weight; 0.0 with fewer than two samples.
    pub weight_diff: f64,
    /// Latest muscle mass minus previous; 0.0 with fewer than two samples.
    pub muscle_diff: f64,
}

impl MemberContext {
    /// Build the snapshot for `member` as of `now`.
    pub fn build(member: &Member, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();

        let days_until_expiry = (member.expiry_date - today).num_days();
        let days_since_expiry = (-days_until_expiry).max(0);

        let mut check_ins = member.check_ins.clone();
        check_ins.sort_by(|a, b| b.date.cmp(&a.date));

        let days_since_last_check_in = check_ins
            .first()
            .map(|c| (today - c.date).num_days())
            .unwrap_or(NO_DATA_SENTINEL);

        let total_check_ins = check_ins.len();
        let gym_only_check_ins = check_ins
            .iter()
            .filter(|c| c.kind == CheckInKind::Gym)
            .count();
        let class_check_ins = total_check_ins - gym_only_check_ins;

        let engagement_score =
            engagement_score(days_since_last_check_in, total_check_ins);
        let current_streak = current_streak(&check_ins, today);

        let is_birthday_today = member
            .date_of_birth
            .map(|dob| dob.day() == today.day() && dob.month() == today.month())
            .unwrap_or(false);

        let days_since_registration = (today - member.registered_on).num_days();
        let is_new_member = (0..=7).contains(&days_since_registration);
        let is_trial = member.membership_type.is_shortest_tier()
            && (0..=14).contains(&days_since_registration);
        let is_vip = total_check_ins >= 100 || current_streak >= 30;

        let recent = check_ins
            .iter()
            .filter(|c| (today - c.date).num_days() < 30)
            .count();
        let avg_weekly_check_ins = (recent as f64 / 4.0 * 10.0).round() / 10.0;

        let mut metrics = member.health_metrics.clone();
        metrics.sort_by(|a, b| b.recorded_on.cmp(&a.recorded_on));

        let days_since_last_measure = metrics
            .first()
            .map(|m| (today - m.recorded_on).num_days())
            .unwrap_or(NO_DATA_SENTINEL);
        let (weight_diff, muscle_diff) = match (metrics.first(), metrics.get(1)) {
            (Some(latest), Some(prev)) => (
                latest.weight_kg - prev.weight_kg,
                latest.muscle_kg - prev.muscle_kg,
            ),
            _ => (0.0, 0.0),
        };

        Self {
            member_id: member.id.clone(),
            member_name: member.name.clone(),
            status: member.status,
            membership_type: member.membership_type,
            days_until_expiry,
            days_since_expiry,
            days_since_last_check_in,
            engagement_score,
            current_streak,
            is_birthday_today,
            is_new_member,
            is_trial,
            is_vip,
            avg_weekly_check_ins,
            total_check_ins,
            gym_only_check_ins,
            class_check_ins,
            days_since_last_measure,
            weight_diff,
            muscle_diff,
        }
    }

    /// Member-independent stand-in for evaluating per-tick plans, whose
    /// conditions only look at the clock.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            member_id: String::new(),
            member_name: String::new(),
            status: MemberStatus::Active,
            membership_type: MembershipType::Monthly,
            days_until_expiry: (NaiveDate::MAX - today).num_days(),
            days_since_expiry: 0,
            days_since_last_check_in: NO_DATA_SENTINEL,
            engagement_score: 0,
            current_streak: 0,
            is_birthday_today: false,
            is_new_member: false,
            is_trial: false,
            is_vip: false,
            avg_weekly_check_ins: 0.0,
            total_check_ins: 0,
            gym_only_check_ins: 0,
            class_check_ins: 0,
            days_since_last_measure: NO_DATA_SENTINEL,
            weight_diff: 0.0,
            muscle_diff: 0.0,
        }
    }
}

/// Heuristic 0-100 activity rating.
///
/// Base 50, one recency adjustment (bands checked in order, mutually
/// exclusive), one volume bonus (largest applicable band), clamped.
fn engagement_score(days_since_last_check_in: i64, total_check_ins: usize) -> u8 {
    let mut score: i32 = 50;

    if days_since_last_check_in <= 3 {
        score += 30;
    } else if days_since_last_check_in <= 7 {
        score += 15;
    } else if days_since_last_check_in > 14 {
        score -= 30;
    }

    if total_check_ins > 50 {
        score += 25;
    } else if total_check_ins > 20 {
        score += 15;
    } else if total_check_ins > 10 {
        score += 10;
    }

    score.clamp(0, 100) as u8
}

/// Consecutive calendar days with at least one check-in, ending today.
///
/// Walks the history most-recent-first, skipping duplicate same-day
/// entries, and stops at the first gap or after [`STREAK_SCAN_LIMIT`]
/// entries examined. `check_ins` must already be sorted descending.
fn current_streak(check_ins: &[crate::member::CheckIn], today: NaiveDate) -> u32 {
    let mut streak: u32 = 0;
    let mut expected = today;

    for check_in in check_ins.iter().take(STREAK_SCAN_LIMIT) {
        if check_in.date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else if check_in.date == expected + Duration::days(1) {
            // Second check-in on an already-counted day.
            continue;
        } else {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{CheckIn, HealthMetric};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap()
    }

    fn base_member() -> Member {
        Member {
            id: "m-1".to_string(),
            name: "Lee Minho".to_string(),
            phone: String::new(),
            email: String::new(),
            status: MemberStatus::Active,
            membership_type: MembershipType::Quarterly,
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            registered_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            date_of_birth: None,
            check_ins: vec![],
            health_metrics: vec![],
        }
    }

    fn gym_check_in(date: NaiveDate) -> CheckIn {
        CheckIn {
            date,
            kind: CheckInKind::Gym,
        }
    }

    #[test]
    fn expiry_days_can_go_negative() {
        let mut member = base_member();
        member.expiry_date = NaiveDate::from_ymd_opt(2026, 8, 21).unwrap();

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.days_until_expiry, -10);
        assert_eq!(ctx.days_since_expiry, 10);
    }

    #[test]
    fn expiry_in_future_has_zero_days_since() {
        let mut member = base_member();
        member.expiry_date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.days_until_expiry, 7);
        assert_eq!(ctx.days_since_expiry, 0);
    }

    #[test]
    fn no_check_ins_uses_sentinel() {
        let ctx = MemberContext::build(&base_member(), fixed_now());
        assert_eq!(ctx.days_since_last_check_in, NO_DATA_SENTINEL);
        assert_eq!(ctx.current_streak, 0);
    }

    #[test]
    fn engagement_recency_bands_are_exclusive() {
        // Recent check-in, few total: 50 + 30.
        assert_eq!(engagement_score(1, 3), 80);
        // Week-old check-in: 50 + 15.
        assert_eq!(engagement_score(6, 3), 65);
        // 8..=14 days is a neutral band.
        assert_eq!(engagement_score(10, 3), 50);
        // Stale: 50 - 30.
        assert_eq!(engagement_score(20, 3), 20);
        // Sentinel falls into the stale band.
        assert_eq!(engagement_score(NO_DATA_SENTINEL, 0), 20);
    }

    #[test]
    fn engagement_volume_bonus_takes_largest_band() {
        assert_eq!(engagement_score(10, 55), 75);
        assert_eq!(engagement_score(10, 25), 65);
        assert_eq!(engagement_score(10, 11), 60);
        // Clamped at 100: 50 + 30 + 25 = 105.
        assert_eq!(engagement_score(1, 60), 100);
    }

    proptest! {
        #[test]
        fn engagement_score_always_in_bounds(
            days in -5i64..2000,
            total in 0usize..500,
        ) {
            let score = engagement_score(days, total);
            prop_assert!(score <= 100);
        }

        #[test]
        fn expiry_complementarity(offset in -400i64..400) {
            let now = fixed_now();
            let mut member = base_member();
            member.expiry_date = now.date_naive() + Duration::days(offset);

            let ctx = MemberContext::build(&member, now);
            prop_assert_eq!(
                ctx.days_since_expiry,
                (-ctx.days_until_expiry).max(0)
            );
            prop_assert!(
                (ctx.days_until_expiry >= 0) ^ (ctx.days_since_expiry > 0)
            );
        }
    }

    #[test]
    fn streak_counts_consecutive_days_from_today() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.check_ins = (0..5)
            .map(|i| gym_check_in(today - Duration::days(i)))
            .collect();

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.current_streak, 5);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.check_ins = vec![
            gym_check_in(today),
            gym_check_in(today - Duration::days(1)),
            // Gap: day 2 missing.
            gym_check_in(today - Duration::days(3)),
            gym_check_in(today - Duration::days(4)),
        ];

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.current_streak, 2);
    }

    #[test]
    fn streak_is_zero_without_check_in_today() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.check_ins = vec![gym_check_in(today - Duration::days(1))];

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.current_streak, 0);
    }

    #[test]
    fn streak_skips_duplicate_same_day_entries() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.check_ins = vec![
            gym_check_in(today),
            CheckIn {
                date: today,
                kind: CheckInKind::Class,
            },
            gym_check_in(today - Duration::days(1)),
        ];

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.current_streak, 2);
    }

    #[test]
    fn avg_weekly_check_ins_rounds_to_one_decimal() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        // 8 check-ins inside the trailing 30 days, one far outside.
        member.check_ins = (0..8)
            .map(|i| gym_check_in(today - Duration::days(i * 3)))
            .collect();
        member.check_ins.push(gym_check_in(today - Duration::days(90)));

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.avg_weekly_check_ins, 2.0);
    }

    #[test]
    fn birthday_ignores_year() {
        let mut member = base_member();
        member.date_of_birth = NaiveDate::from_ymd_opt(1990, 8, 31);

        let ctx = MemberContext::build(&member, fixed_now());
        assert!(ctx.is_birthday_today);

        member.date_of_birth = NaiveDate::from_ymd_opt(1990, 8, 30);
        let ctx = MemberContext::build(&member, fixed_now());
        assert!(!ctx.is_birthday_today);
    }

    #[test]
    fn new_member_and_trial_windows() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.membership_type = MembershipType::Monthly;

        member.registered_on = today - Duration::days(5);
        let ctx = MemberContext::build(&member, fixed_now());
        assert!(ctx.is_new_member);
        assert!(ctx.is_trial);

        member.registered_on = today - Duration::days(10);
        let ctx = MemberContext::build(&member, fixed_now());
        assert!(!ctx.is_new_member);
        assert!(ctx.is_trial);

        member.registered_on = today - Duration::days(20);
        let ctx = MemberContext::build(&member, fixed_now());
        assert!(!ctx.is_trial);
    }

    #[test]
    fn vip_by_volume_or_streak() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.check_ins = (0..100)
            .map(|i| gym_check_in(today - Duration::days(i * 5)))
            .collect();

        let ctx = MemberContext::build(&member, fixed_now());
        assert!(ctx.is_vip);

        member.check_ins = (0..30)
            .map(|i| gym_check_in(today - Duration::days(i)))
            .collect();
        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.current_streak, 30);
        assert!(ctx.is_vip);
    }

    #[test]
    fn health_deltas_need_two_samples() {
        let today = fixed_now().date_naive();
        let mut member = base_member();

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.days_since_last_measure, NO_DATA_SENTINEL);
        assert_eq!(ctx.weight_diff, 0.0);

        member.health_metrics = vec![HealthMetric {
            recorded_on: today - Duration::days(3),
            weight_kg: 81.0,
            muscle_kg: 35.0,
        }];
        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.days_since_last_measure, 3);
        assert_eq!(ctx.weight_diff, 0.0);
        assert_eq!(ctx.muscle_diff, 0.0);

        member.health_metrics.push(HealthMetric {
            recorded_on: today - Duration::days(30),
            weight_kg: 83.5,
            muscle_kg: 34.0,
        });
        let ctx = MemberContext::build(&member, fixed_now());
        assert!((ctx.weight_diff - (-2.5)).abs() < 1e-9);
        assert!((ctx.muscle_diff - 1.0).abs() < 1e-9);
    }

    #[test]
    fn check_in_kind_counts() {
        let today = fixed_now().date_naive();
        let mut member = base_member();
        member.check_ins = vec![
            gym_check_in(today),
            gym_check_in(today - Duration::days(2)),
            CheckIn {
                date: today - Duration::days(4),
                kind: CheckInKind::Class,
            },
        ];

        let ctx = MemberContext::build(&member, fixed_now());
        assert_eq!(ctx.gym_only_check_ins, 2);
        assert_eq!(ctx.class_check_ins, 1);
        assert_eq!(ctx.total_check_ins, 3);
    }
}
