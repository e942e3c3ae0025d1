//! The automation engine loop.
//!
//! A timer-driven driver: each tick builds a context per member,
//! evaluates every enabled plan, executes matched actions up to a
//! per-tick cap, and recomputes the dashboard aggregates. Ticks run to
//! completion inside the loop task, so one tick can never overlap the
//! next.
//!
//! Failure semantics: a panicking evaluation is confined to its
//! (plan, member) pair; relay failures only move the connection-status
//! flag; durable-sink write failures go to stderr. Nothing is retried
//! and there is no fatal engine error -- the loop keeps running.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;

use crate::action::{self, AutomationTask, LogEntry};
use crate::context::MemberContext;
use crate::error::Result;
use crate::member::Member;
use crate::plan::{AutomationPlan, FiringMode};
use crate::relay::{ConnectionStatus, RelayPayload, WebhookRelay};
use crate::stats::TodayStats;
use crate::store::{FiredKey, StateStore};
use crate::trigger::{self, TriggerOutcome};

/// Hard cap on actions executed within one tick.
pub const MAX_ACTIONS_PER_TICK: usize = 50;

/// Read-only member list consumed once per tick.
pub trait MemberSource {
    fn members(&self) -> Result<Vec<Member>>;
}

/// In-memory fixture source.
impl MemberSource for Vec<Member> {
    fn members(&self) -> Result<Vec<Member>> {
        Ok(self.clone())
    }
}

/// Durable append-only sink for executed actions, written fire-and-forget
/// alongside the in-memory store.
pub trait ActionSink {
    fn append_log(&self, entry: &LogEntry) -> Result<()>;
    fn create_task(&self, task: &AutomationTask) -> Result<()>;
}

/// Loop timing and caps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Interval between ticks. The 30-second default is a demo value;
    /// production deployments should run at 5-15 minutes.
    pub tick_interval: Duration,
    /// Delay before the first tick after `run()` starts.
    pub first_run_delay: Duration,
    pub max_actions_per_tick: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
            first_run_delay: Duration::from_secs(3),
            max_actions_per_tick: MAX_ACTIONS_PER_TICK,
        }
    }
}

/// Loop lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Idle,
    Running,
}

/// Outcome counters for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// True when the tick bailed out early (no members or no enabled plans).
    pub skipped: bool,
    /// (plan, context) evaluations performed.
    pub evaluated: usize,
    /// Evaluations whose condition held.
    pub matched: usize,
    /// Actions actually executed (matched minus suppressed, capped).
    pub executed: usize,
    /// Matches suppressed by the per-(plan, member, day) marker.
    pub suppressed: usize,
    /// Evaluations answered `NotYetSupported`.
    pub unsupported: usize,
    /// Evaluations that panicked and were confined.
    pub failed: usize,
}

/// The engine: member source + state store + optional relay/sink.
pub struct AutomationEngine<M: MemberSource> {
    members: M,
    store: StateStore,
    relay: Option<WebhookRelay>,
    sink: Option<Box<dyn ActionSink + Send>>,
    config: EngineConfig,
    state: EngineState,
}

impl<M: MemberSource> AutomationEngine<M> {
    pub fn new(members: M, store: StateStore, config: EngineConfig) -> Self {
        Self {
            members,
            store,
            relay: None,
            sink: None,
            config,
            state: EngineState::Idle,
        }
    }

    pub fn with_relay(mut self, relay: WebhookRelay) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn ActionSink + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn relay_status(&self) -> Option<ConnectionStatus> {
        self.relay.as_ref().map(|r| r.status())
    }

    // ── Loop ─────────────────────────────────────────────────────────

    /// Run the loop: one delayed first tick, then a fixed interval.
    /// Runs until the future is dropped; pair with `stop()` on shutdown.
    pub async fn run(&mut self) {
        self.state = EngineState::Running;

        tokio::time::sleep(self.config.first_run_delay).await;
        self.tick(Utc::now());

        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // The first interval tick completes immediately.
        loop {
            interval.tick().await;
            self.tick(Utc::now());
        }
    }

    pub fn stop(&mut self) {
        self.state = EngineState::Idle;
    }

    /// One full evaluation pass as of `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickSummary {
        let today = now.date_naive();
        self.store.prune_fired(today);

        let members = match self.members.members() {
            Ok(members) => members,
            Err(err) => {
                eprintln!("engine: member source unavailable: {err}");
                return TickSummary {
                    skipped: true,
                    ..TickSummary::default()
                };
            }
        };
        let enabled: Vec<AutomationPlan> =
            self.store.enabled_plans().cloned().collect();

        if members.is_empty() || enabled.is_empty() {
            return TickSummary {
                skipped: true,
                ..TickSummary::default()
            };
        }

        let mut summary = TickSummary::default();

        // Per-tick plans: member-independent, evaluated once against a
        // placeholder context.
        let placeholder = MemberContext::placeholder(now);
        for plan in enabled.iter().filter(|p| p.id.firing_mode() == FiringMode::PerTick) {
            if summary.executed >= self.config.max_actions_per_tick {
                break;
            }
            self.consider(plan, None, &placeholder, now, today, &mut summary);
        }

        // Member-based plans: one context per member, every enabled plan
        // against it, stopping once the action cap is reached.
        'members: for member in &members {
            if summary.executed >= self.config.max_actions_per_tick {
                break;
            }
            let ctx = MemberContext::build(member, now);
            for plan in enabled
                .iter()
                .filter(|p| p.id.firing_mode() == FiringMode::PerMember)
            {
                if summary.executed >= self.config.max_actions_per_tick {
                    break 'members;
                }
                self.consider(plan, Some(member), &ctx, now, today, &mut summary);
            }
        }

        self.store.set_stats(TodayStats::compute(&members, now));
        self.store.set_last_run(now);
        summary
    }

    /// Evaluate one (plan, context) pair and execute on a fresh match.
    fn consider(
        &mut self,
        plan: &AutomationPlan,
        member: Option<&Member>,
        ctx: &MemberContext,
        now: DateTime<Utc>,
        today: chrono::NaiveDate,
        summary: &mut TickSummary,
    ) {
        summary.evaluated += 1;
        match evaluate_guarded(|| trigger::evaluate(plan, ctx, now)) {
            GuardedOutcome::Outcome(TriggerOutcome::Matched) => {
                summary.matched += 1;
                let key = FiredKey {
                    plan_id: plan.id,
                    member_id: member.map(|m| m.id.clone()),
                    day: today,
                };
                if self.store.already_fired(&key) {
                    summary.suppressed += 1;
                    return;
                }
                self.store.mark_fired(key);
                self.execute(plan, member, ctx, now);
                summary.executed += 1;
            }
            GuardedOutcome::Outcome(TriggerOutcome::NotMatched) => {}
            GuardedOutcome::Outcome(TriggerOutcome::NotYetSupported) => {
                summary.unsupported += 1;
            }
            GuardedOutcome::Panicked => {
                eprintln!(
                    "engine: evaluation of {} panicked for member {:?}",
                    plan.id.as_str(),
                    member.map(|m| m.id.as_str())
                );
                summary.failed += 1;
            }
        }
    }

    /// Relay first (best-effort, detached), then local bookkeeping. Every
    /// path ends in exactly one log append.
    fn execute(
        &mut self,
        plan: &AutomationPlan,
        member: Option<&Member>,
        ctx: &MemberContext,
        now: DateTime<Utc>,
    ) {
        if let (Some(relay), Some(workflow_id)) = (&self.relay, &plan.workflow_id) {
            relay.dispatch(workflow_id, RelayPayload::new(plan, member, ctx));
        }

        let executed = action::execute(plan, ctx, now);

        if let Some(sink) = &self.sink {
            if let Err(err) = sink.append_log(&executed.log) {
                eprintln!("engine: durable log write failed: {err}");
            }
            if let Some(task) = &executed.task {
                if let Err(err) = sink.create_task(task) {
                    eprintln!("engine: durable task write failed: {err}");
                }
            }
        }

        if let Some(task) = executed.task.clone() {
            self.store.create_task(task);
        }
        self.store.append_log(executed.log);
    }
}

enum GuardedOutcome {
    Outcome(TriggerOutcome),
    Panicked,
}

/// Confine a panicking evaluation to its (plan, member) pair.
fn evaluate_guarded<F>(f: F) -> GuardedOutcome
where
    F: FnOnce() -> TriggerOutcome,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => GuardedOutcome::Outcome(outcome),
        Err(_) => GuardedOutcome::Panicked,
    }
}
