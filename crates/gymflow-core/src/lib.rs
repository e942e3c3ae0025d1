//! # Gymflow Core Library
//!
//! Core business logic for Gymflow, a gym-member automation engine. The
//! standalone CLI binary drives the same library the way any embedding
//! surface would.
//!
//! ## Architecture
//!
//! - **Context Builder**: pure derivation of per-member metrics
//!   (engagement score, streaks, expiry windows) from one member and the
//!   current instant
//! - **Trigger Evaluator**: a closed dispatch table from plan id to a
//!   hand-written predicate over the member context
//! - **Action Executor**: turns a matched plan into one log entry and,
//!   for actionable plans, one follow-up task
//! - **Engine Loop**: timer-driven driver that evaluates every enabled
//!   plan per tick, with per-day de-duplication and a per-tick action cap
//! - **Storage**: SQLite member/log/task persistence and TOML
//!   configuration
//! - **Relay**: best-effort, fire-and-forget webhook delivery to an
//!   external workflow endpoint
//!
//! ## Key Components
//!
//! - [`AutomationEngine`]: the tick loop
//! - [`MemberContext`]: derived per-member snapshot
//! - [`StateStore`]: explicitly owned engine state (plans, logs, tasks)
//! - [`WebhookRelay`]: outbound delivery with a shared status flag

pub mod action;
pub mod context;
pub mod engine;
pub mod error;
pub mod member;
pub mod plan;
pub mod relay;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod store;
pub mod trigger;

pub use action::{AutomationTask, LogEntry, Severity, TaskStatus};
pub use context::{MemberContext, NO_DATA_SENTINEL};
pub use engine::{
    ActionSink, AutomationEngine, EngineConfig, EngineState, MemberSource, TickSummary,
    MAX_ACTIONS_PER_TICK,
};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use member::{CheckIn, CheckInKind, HealthMetric, Member, MemberStatus, MembershipType};
pub use plan::{default_catalog, ActionType, AutomationPlan, FiringMode, PlanId, TriggerCategory};
pub use relay::{ConnectionStatus, RelayPayload, WebhookRelay};
pub use seed::demo_members;
pub use stats::TodayStats;
pub use storage::{Config, Database};
pub use store::{FiredKey, StateStore, LOG_CAP};
pub use trigger::TriggerOutcome;
