//! Action execution.
//!
//! Turns a matched plan into its observable effects: exactly one log entry
//! per execution and, for actionable types, one follow-up task. Building
//! the effects is pure and cannot fail; appending them to stores and the
//! webhook relay are the engine's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::MemberContext;
use crate::plan::{ActionType, AutomationPlan, FiringMode, PlanId, Priority};

/// Severity tag on a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Critical,
    Info,
}

/// Immutable record of one action execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub plan_id: PlanId,
    pub plan_name: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    pub at: DateTime<Utc>,
    pub message: String,
    pub severity: Severity,
}

/// Lifecycle status of a follow-up task. Mutated by operators, never by
/// the engine after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// A follow-up work item created as an action side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationTask {
    pub id: String,
    pub plan_id: PlanId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// The effects of one matched plan: exactly one log entry, at most one task.
#[derive(Debug, Clone)]
pub struct ExecutedAction {
    pub log: LogEntry,
    pub task: Option<AutomationTask>,
}

/// Build the effects for a matched plan.
pub fn execute(plan: &AutomationPlan, ctx: &MemberContext, now: DateTime<Utc>) -> ExecutedAction {
    let severity = severity_for(plan);
    let member = member_fields(plan, ctx);
    let message = message_for(plan, ctx);

    let task = match plan.action {
        ActionType::CallReminder => Some(AutomationTask {
            id: Uuid::new_v4().to_string(),
            plan_id: plan.id,
            title: format!("Call {}", ctx.member_name),
            description: format!(
                "Membership expired {} day(s) ago. Call to discuss renewal options.",
                ctx.days_since_expiry
            ),
            member_id: member.0.clone(),
            member_name: member.1.clone(),
            status: TaskStatus::Pending,
            created_at: now,
        }),
        ActionType::CreateTask => Some(AutomationTask {
            id: Uuid::new_v4().to_string(),
            plan_id: plan.id,
            title: format!("Reach out to {}", ctx.member_name),
            description: format!(
                "{} has not checked in for {} day(s). Engagement score is {}.",
                ctx.member_name, ctx.days_since_last_check_in, ctx.engagement_score
            ),
            member_id: member.0.clone(),
            member_name: member.1.clone(),
            status: TaskStatus::Pending,
            created_at: now,
        }),
        _ => None,
    };

    ExecutedAction {
        log: LogEntry {
            id: Uuid::new_v4().to_string(),
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            member_id: member.0,
            member_name: member.1,
            at: now,
            message,
            severity,
        },
        task,
    }
}

/// Per-tick plans carry no member attribution.
fn member_fields(plan: &AutomationPlan, ctx: &MemberContext) -> (Option<String>, Option<String>) {
    match plan.id.firing_mode() {
        FiringMode::PerTick => (None, None),
        FiringMode::PerMember => (
            Some(ctx.member_id.clone()),
            Some(ctx.member_name.clone()),
        ),
    }
}

/// Severity comes from the plan's static priority, defaulting by action
/// type when no priority is set.
fn severity_for(plan: &AutomationPlan) -> Severity {
    match plan.priority {
        Some(Priority::Low) => Severity::Info,
        Some(Priority::Normal) => Severity::Success,
        Some(Priority::High) => Severity::Warning,
        Some(Priority::Critical) => Severity::Critical,
        None => match plan.action {
            ActionType::InternalAlert => Severity::Critical,
            ActionType::CallReminder | ActionType::CreateTask => Severity::Warning,
            ActionType::GenerateReport => Severity::Info,
            _ => Severity::Success,
        },
    }
}

/// Distinctly worded log message per action type. Delivery is logged
/// intent, not confirmation -- there is no real SMS/push/email transport
/// behind these.
fn message_for(plan: &AutomationPlan, ctx: &MemberContext) -> String {
    let name = &ctx.member_name;
    match plan.action {
        ActionType::SendSms => format!(
            "SMS queued for {name} ({} day(s) to expiry)",
            ctx.days_until_expiry
        ),
        ActionType::SendPush => format!("Push notification queued for {name}"),
        ActionType::SendMessage => format!("Message queued for {name}"),
        ActionType::EmailCampaign => format!("Email campaign '{}' enqueued", plan.name),
        ActionType::CallReminder => format!(
            "Call task created for {name} (expired {} day(s) ago)",
            ctx.days_since_expiry
        ),
        ActionType::CreateTask => format!(
            "Follow-up task created for {name} (last check-in {} day(s) ago)",
            ctx.days_since_last_check_in
        ),
        ActionType::InternalAlert => format!(
            "ALERT: {name} engagement dropped to {}",
            ctx.engagement_score
        ),
        ActionType::DiscountOffer => {
            let pct = plan
                .payload
                .as_ref()
                .and_then(|p| p.get("discount_pct"))
                .and_then(|v| v.as_u64())
                .unwrap_or(10);
            format!("Discount offer ({pct}%) sent to {name}")
        }
        ActionType::VipUpgrade => format!(
            "{name} flagged for VIP perks ({} check-ins, {}-day streak)",
            ctx.total_check_ins, ctx.current_streak
        ),
        ActionType::ClassRecommendation => format!(
            "Class recommendation sent to {name} ({} gym-only visits)",
            ctx.gym_only_check_ins
        ),
        ActionType::GenerateReport => format!("Report generated: {}", plan.name),
    }
}
