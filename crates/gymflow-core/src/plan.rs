//! Automation plan catalog.
//!
//! Plans are static catalog entries pairing a trigger condition with an
//! action. The catalog is defined once at startup; the only runtime
//! mutation is the enable/disable toggle.

use serde::{Deserialize, Serialize};

/// Closed enumeration of every known plan.
///
/// Serialized as the stable string ids the catalog has always used
/// (`retention_001` etc.), so toggles and logs survive renames of the
/// Rust-side variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanId {
    #[serde(rename = "retention_001")]
    ExpiryReminder7d,
    #[serde(rename = "retention_002")]
    ExpiryReminder3d,
    #[serde(rename = "retention_003")]
    ExpiredFollowUpCall,
    #[serde(rename = "retention_004")]
    WinBackOffer,
    #[serde(rename = "engagement_001")]
    InactivityNudge7d,
    #[serde(rename = "engagement_002")]
    AtRiskOutreach,
    #[serde(rename = "engagement_003")]
    LowEngagementAlert,
    #[serde(rename = "engagement_004")]
    RegularGoneQuiet,
    #[serde(rename = "milestone_001")]
    BirthdayGreeting,
    #[serde(rename = "milestone_002")]
    StreakCongrats,
    #[serde(rename = "milestone_003")]
    VipUpgradeOffer,
    #[serde(rename = "onboarding_001")]
    WelcomeMessage,
    #[serde(rename = "onboarding_002")]
    TrialConversionOffer,
    #[serde(rename = "onboarding_003")]
    FirstCheckInCongrats,
    #[serde(rename = "health_001")]
    MeasurementReminder,
    #[serde(rename = "health_002")]
    MuscleGainCelebration,
    #[serde(rename = "health_003")]
    WeightPlateauCoaching,
    #[serde(rename = "class_001")]
    ClassRecommendation,
    #[serde(rename = "class_002")]
    ClassNoShowFollowUp,
    #[serde(rename = "referral_001")]
    ReferralThankYou,
    #[serde(rename = "report_001")]
    DailyOperationsReport,
    #[serde(rename = "report_002")]
    WeeklySummaryEmail,
    #[serde(rename = "campaign_001")]
    MonthlyNewsletter,
}

impl PlanId {
    /// The stable string id used in logs and external payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::ExpiryReminder7d => "retention_001",
            PlanId::ExpiryReminder3d => "retention_002",
            PlanId::ExpiredFollowUpCall => "retention_003",
            PlanId::WinBackOffer => "retention_004",
            PlanId::InactivityNudge7d => "engagement_001",
            PlanId::AtRiskOutreach => "engagement_002",
            PlanId::LowEngagementAlert => "engagement_003",
            PlanId::RegularGoneQuiet => "engagement_004",
            PlanId::BirthdayGreeting => "milestone_001",
            PlanId::StreakCongrats => "milestone_002",
            PlanId::VipUpgradeOffer => "milestone_003",
            PlanId::WelcomeMessage => "onboarding_001",
            PlanId::TrialConversionOffer => "onboarding_002",
            PlanId::FirstCheckInCongrats => "onboarding_003",
            PlanId::MeasurementReminder => "health_001",
            PlanId::MuscleGainCelebration => "health_002",
            PlanId::WeightPlateauCoaching => "health_003",
            PlanId::ClassRecommendation => "class_001",
            PlanId::ClassNoShowFollowUp => "class_002",
            PlanId::ReferralThankYou => "referral_001",
            PlanId::DailyOperationsReport => "report_001",
            PlanId::WeeklySummaryEmail => "report_002",
            PlanId::MonthlyNewsletter => "campaign_001",
        }
    }

    /// Parse a stable string id back into a `PlanId`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == s)
    }

    /// Whether a plan is evaluated per member or once per tick.
    pub fn firing_mode(&self) -> FiringMode {
        match self {
            PlanId::DailyOperationsReport
            | PlanId::WeeklySummaryEmail
            | PlanId::MonthlyNewsletter => FiringMode::PerTick,
            _ => FiringMode::PerMember,
        }
    }

    /// Every known plan id, in catalog order.
    pub fn all() -> &'static [PlanId] {
        &[
            PlanId::ExpiryReminder7d,
            PlanId::ExpiryReminder3d,
            PlanId::ExpiredFollowUpCall,
            PlanId::WinBackOffer,
            PlanId::InactivityNudge7d,
            PlanId::AtRiskOutreach,
            PlanId::LowEngagementAlert,
            PlanId::RegularGoneQuiet,
            PlanId::BirthdayGreeting,
            PlanId::StreakCongrats,
            PlanId::VipUpgradeOffer,
            PlanId::WelcomeMessage,
            PlanId::TrialConversionOffer,
            PlanId::FirstCheckInCongrats,
            PlanId::MeasurementReminder,
            PlanId::MuscleGainCelebration,
            PlanId::WeightPlateauCoaching,
            PlanId::ClassRecommendation,
            PlanId::ClassNoShowFollowUp,
            PlanId::ReferralThankYou,
            PlanId::DailyOperationsReport,
            PlanId::WeeklySummaryEmail,
            PlanId::MonthlyNewsletter,
        ]
    }
}

/// How often a plan's condition is checked within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringMode {
    /// Evaluated once per enabled plan per member.
    PerMember,
    /// Time-based/system plan: evaluated once per tick, member-independent.
    PerTick,
}

/// Rough grouping used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    Retention,
    Engagement,
    Milestone,
    Onboarding,
    Health,
    Classes,
    System,
}

/// What a matched plan does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    SendSms,
    SendPush,
    SendMessage,
    EmailCampaign,
    CallReminder,
    CreateTask,
    InternalAlert,
    DiscountOffer,
    VipUpgrade,
    ClassRecommendation,
    GenerateReport,
}

/// Static priority assigned to a plan; drives log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

/// One catalog entry: a named (trigger condition, action) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationPlan {
    pub id: PlanId,
    pub name: String,
    pub description: String,
    pub category: TriggerCategory,
    pub action: ActionType,
    /// Free-form payload forwarded to the action (offer codes, template
    /// hints). Not interpreted by the engine itself.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub enabled: bool,
    /// External workflow to relay to when this plan fires.
    #[serde(default)]
    pub workflow_id: Option<String>,
}

impl AutomationPlan {
    fn new(
        id: PlanId,
        name: &str,
        description: &str,
        category: TriggerCategory,
        action: ActionType,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category,
            action,
            payload: None,
            priority: None,
            enabled: true,
            workflow_id: None,
        }
    }

    fn priority(mut self, p: Priority) -> Self {
        self.priority = Some(p);
        self
    }

    fn workflow(mut self, id: &str) -> Self {
        self.workflow_id = Some(id.to_string());
        self
    }

    fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn payload(mut self, value: serde_json::Value) -> Self {
        self.payload = Some(value);
        self
    }
}

/// The static startup catalog.
///
/// Plans whose trigger needs upstream data that does not exist yet
/// (class bookings, goals, referrals) ship disabled; their evaluator
/// returns `NotYetSupported` either way.
pub fn default_catalog() -> Vec<AutomationPlan> {
    use ActionType::*;
    use TriggerCategory::*;

    vec![
        AutomationPlan::new(
            PlanId::ExpiryReminder7d,
            "Expiry reminder (7 days)",
            "SMS an active member exactly 7 days before their membership expires",
            Retention,
            SendSms,
        )
        .priority(Priority::High)
        .workflow("wf_expiry_7d"),
        AutomationPlan::new(
            PlanId::ExpiryReminder3d,
            "Expiry reminder (3 days)",
            "Push notification 3 days before expiry",
            Retention,
            SendPush,
        )
        .priority(Priority::High)
        .workflow("wf_expiry_3d"),
        AutomationPlan::new(
            PlanId::ExpiredFollowUpCall,
            "Expired follow-up call",
            "Create a call task within 3 days of a membership lapsing",
            Retention,
            CallReminder,
        )
        .priority(Priority::Critical),
        AutomationPlan::new(
            PlanId::WinBackOffer,
            "Win-back offer",
            "Discount offer 30 days after expiry",
            Retention,
            DiscountOffer,
        )
        .payload(serde_json::json!({ "discount_pct": 20 })),
        AutomationPlan::new(
            PlanId::InactivityNudge7d,
            "Inactivity nudge (7 days)",
            "Push notification when a member has not checked in for a week",
            Engagement,
            SendPush,
        ),
        AutomationPlan::new(
            PlanId::AtRiskOutreach,
            "At-risk outreach",
            "Create a call task after 14+ days without a check-in",
            Engagement,
            CreateTask,
        )
        .priority(Priority::High),
        AutomationPlan::new(
            PlanId::LowEngagementAlert,
            "Low engagement alert",
            "Internal alert for active members whose engagement drops below 25",
            Engagement,
            InternalAlert,
        )
        .priority(Priority::Critical),
        AutomationPlan::new(
            PlanId::RegularGoneQuiet,
            "Regular gone quiet",
            "Nudge a 3+/week regular who has been absent for 5 days",
            Engagement,
            SendPush,
        ),
        AutomationPlan::new(
            PlanId::BirthdayGreeting,
            "Birthday greeting",
            "Send a birthday message on the member's birthday",
            Milestone,
            SendMessage,
        )
        .workflow("wf_birthday"),
        AutomationPlan::new(
            PlanId::StreakCongrats,
            "Streak congratulations",
            "Celebrate a 7-day check-in streak",
            Milestone,
            SendPush,
        ),
        AutomationPlan::new(
            PlanId::VipUpgradeOffer,
            "VIP upgrade",
            "Flag a member for VIP perks at 100 lifetime check-ins or a 30-day streak",
            Milestone,
            VipUpgrade,
        )
        .priority(Priority::Low),
        AutomationPlan::new(
            PlanId::WelcomeMessage,
            "Welcome message",
            "Greet a newly registered member who has not visited yet",
            Onboarding,
            SendMessage,
        )
        .workflow("wf_welcome"),
        AutomationPlan::new(
            PlanId::TrialConversionOffer,
            "Trial conversion offer",
            "Discount offer to trial members in their last 3 days",
            Onboarding,
            DiscountOffer,
        )
        .payload(serde_json::json!({ "discount_pct": 15 })),
        AutomationPlan::new(
            PlanId::FirstCheckInCongrats,
            "First check-in congrats",
            "Congratulate a new member on their first visit",
            Onboarding,
            SendPush,
        )
        .priority(Priority::Low),
        AutomationPlan::new(
            PlanId::MeasurementReminder,
            "Measurement reminder",
            "Remind members to re-measure after 30 days",
            Health,
            SendPush,
        ),
        AutomationPlan::new(
            PlanId::MuscleGainCelebration,
            "Muscle gain celebration",
            "Celebrate a 1kg+ muscle gain between measurements",
            Health,
            SendMessage,
        ),
        AutomationPlan::new(
            PlanId::WeightPlateauCoaching,
            "Weight plateau coaching",
            "Offer coaching on a weight plateau (needs goal data)",
            Health,
            CreateTask,
        )
        .disabled(),
        AutomationPlan::new(
            PlanId::ClassRecommendation,
            "Class recommendation",
            "Recommend classes to gym-only regulars",
            Classes,
            ClassRecommendation,
        ),
        AutomationPlan::new(
            PlanId::ClassNoShowFollowUp,
            "Class no-show follow-up",
            "Follow up on class no-shows (needs booking data)",
            Classes,
            SendMessage,
        )
        .disabled(),
        AutomationPlan::new(
            PlanId::ReferralThankYou,
            "Referral thank-you",
            "Thank members who refer a friend (needs referral data)",
            Milestone,
            SendMessage,
        )
        .disabled(),
        AutomationPlan::new(
            PlanId::DailyOperationsReport,
            "Daily operations report",
            "Generate the daily operations report at 20:00",
            System,
            GenerateReport,
        )
        .workflow("wf_daily_report"),
        AutomationPlan::new(
            PlanId::WeeklySummaryEmail,
            "Weekly summary email",
            "Email the weekly summary on Monday mornings",
            System,
            EmailCampaign,
        ),
        AutomationPlan::new(
            PlanId::MonthlyNewsletter,
            "Monthly newsletter",
            "Queue the newsletter campaign on the 1st of the month",
            System,
            EmailCampaign,
        ),
    ]
}
