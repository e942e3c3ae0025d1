//! Dashboard aggregates.
//!
//! Recomputed wholesale on every tick by re-scanning the member list;
//! there is no incremental update path. The snapshot only ever reflects
//! the last tick's member set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::MemberContext;
use crate::member::{Member, MemberStatus};

/// At-risk threshold on the engagement score.
const AT_RISK_SCORE: u8 = 30;

/// Derived per-tick aggregate over the full member set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodayStats {
    pub total_members: usize,
    pub active_members: usize,
    /// Active members expiring within the next 7 days.
    pub expiring_soon: usize,
    pub expired: usize,
    /// Registered within the last 7 days.
    pub new_this_week: usize,
    /// Active with an engagement score below the at-risk threshold.
    pub at_risk: usize,
    pub birthdays_today: usize,
    pub vip_members: usize,
    /// Mean engagement score across all members, one decimal.
    pub avg_engagement: f64,
}

impl TodayStats {
    /// Recompute the snapshot from scratch.
    pub fn compute(members: &[Member], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_members: members.len(),
            ..Self::default()
        };
        if members.is_empty() {
            return stats;
        }

        let mut score_sum: u64 = 0;
        for member in members {
            let ctx = MemberContext::build(member, now);
            score_sum += ctx.engagement_score as u64;

            if member.status == MemberStatus::Active {
                stats.active_members += 1;
                if (0..=7).contains(&ctx.days_until_expiry) {
                    stats.expiring_soon += 1;
                }
                if ctx.engagement_score < AT_RISK_SCORE {
                    stats.at_risk += 1;
                }
            }
            if ctx.days_since_expiry > 0 {
                stats.expired += 1;
            }
            if ctx.is_new_member {
                stats.new_this_week += 1;
            }
            if ctx.is_birthday_today {
                stats.birthdays_today += 1;
            }
            if ctx.is_vip {
                stats.vip_members += 1;
            }
        }

        stats.avg_engagement =
            (score_sum as f64 / members.len() as f64 * 10.0).round() / 10.0;
        stats
    }
}
