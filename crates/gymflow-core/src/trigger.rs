//! Trigger evaluation.
//!
//! Each plan id maps to an individually hand-written predicate over the
//! member context and, for per-tick plans, the wall clock. There is no
//! generic rule language. Predicates are pure and infallible; plans whose
//! upstream data does not exist yet report `NotYetSupported` instead of a
//! silent non-match.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::context::{MemberContext, NO_DATA_SENTINEL};
use crate::member::MemberStatus;
use crate::plan::{AutomationPlan, PlanId};

/// Result of evaluating one plan against one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The condition holds; the action should fire.
    Matched,
    /// Evaluated and the condition does not hold.
    NotMatched,
    /// The plan's trigger needs upstream data that does not exist yet.
    NotYetSupported,
}


/// Evaluate `plan` against `ctx` at `now`.
pub fn evaluate(
    plan: &AutomationPlan,
    ctx: &MemberContext,
    now: DateTime<Utc>,
) -> TriggerOutcome {
    use TriggerOutcome::*;

    #[cfg(test)]
    if failpoint::trips(plan.id) {
        panic!("evaluation failure for {}", plan.id.as_str());
    }

    let matched = match plan.id {
        PlanId::ExpiryReminder7d => {
            ctx.days_until_expiry == 7 && ctx.status == MemberStatus::Active
        }
        PlanId::ExpiryReminder3d => {
            ctx.days_until_expiry == 3 && ctx.status == MemberStatus::Active
        }
        PlanId::ExpiredFollowUpCall => (1..=3).contains(&ctx.days_since_expiry),
        PlanId::WinBackOffer => ctx.days_since_expiry == 30,
        PlanId::InactivityNudge7d => ctx.days_since_last_check_in == 7,
        PlanId::AtRiskOutreach => {
            ctx.days_since_last_check_in >= 14
                && ctx.days_since_last_check_in < NO_DATA_SENTINEL
                && ctx.status == MemberStatus::Active
        }
        PlanId::LowEngagementAlert => {
            ctx.engagement_score < 25 && ctx.status == MemberStatus::Active
        }
        PlanId::RegularGoneQuiet => {
            ctx.avg_weekly_check_ins >= 3.0
                && ctx.days_since_last_check_in >= 5
                && ctx.days_since_last_check_in < NO_DATA_SENTINEL
        }
        PlanId::BirthdayGreeting => ctx.is_birthday_today,
        PlanId::StreakCongrats => ctx.current_streak == 7,
        PlanId::VipUpgradeOffer => ctx.is_vip,
        PlanId::WelcomeMessage => ctx.is_new_member && ctx.total_check_ins == 0,
        PlanId::TrialConversionOffer => {
            ctx.is_trial && (0..=3).contains(&ctx.days_until_expiry)
        }
        PlanId::FirstCheckInCongrats => ctx.is_new_member && ctx.total_check_ins == 1,
        PlanId::MeasurementReminder => {
            ctx.days_since_last_measure >= 30
                && ctx.days_since_last_measure < NO_DATA_SENTINEL
        }
        PlanId::MuscleGainCelebration => ctx.muscle_diff >= 1.0,
        PlanId::ClassRecommendation => {
            ctx.gym_only_check_ins >= 20 && ctx.class_check_ins == 0
        }

        // Per-tick plans: conditions only look at the clock.
        PlanId::DailyOperationsReport => now.hour() == 20,
        PlanId::WeeklySummaryEmail => now.weekday() == Weekday::Mon && now.hour() == 9,
        PlanId::MonthlyNewsletter => now.day() == 1 && now.hour() == 10,

        // Upstream data (class bookings, goals, referrals) not wired up yet.
        PlanId::WeightPlateauCoaching
        | PlanId::ClassNoShowFollowUp
        | PlanId::ReferralThankYou => return NotYetSupported,
    };

    if matched {
        Matched
    } else {
        NotMatched
    }
}
