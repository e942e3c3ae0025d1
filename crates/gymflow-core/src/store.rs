//! In-memory engine state.
//!
//! One explicitly constructed container holds everything the engine
//! reads and writes across ticks: the plan catalog (toggles only), the
//! capped execution log, follow-up tasks, fired markers for
//! de-duplication, and the latest dashboard snapshot. The store is owned
//! by the engine and handed to callers by reference; there is no ambient
//! global state.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};

use crate::action::{AutomationTask, LogEntry, TaskStatus};
use crate::plan::{AutomationPlan, PlanId};
use crate::stats::TodayStats;

/// Execution log retains at most this many entries, oldest evicted first.
pub const LOG_CAP: usize = 200;

/// Marker for one fired (plan, member, day) combination.
///
/// A plan whose condition stays true across ticks fires at most once per
/// member per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FiredKey {
    pub plan_id: PlanId,
    /// `None` for per-tick plans.
    pub member_id: Option<String>,
    pub day: NaiveDate,
}

/// Shared engine state container.
#[derive(Debug)]
pub struct StateStore {
    plans: Vec<AutomationPlan>,
    logs: VecDeque<LogEntry>,
    tasks: Vec<AutomationTask>,
    fired: HashSet<FiredKey>,
    stats: TodayStats,
    last_run: Option<DateTime<Utc>>,
}

impl StateStore {
    /// Create a store around a plan catalog.
    pub fn new(plans: Vec<AutomationPlan>) -> Self {
        Self {
            plans,
            logs: VecDeque::with_capacity(LOG_CAP),
            tasks: Vec::new(),
            fired: HashSet::new(),
            stats: TodayStats::default(),
            last_run: None,
        }
    }

    // ── Plans ────────────────────────────────────────────────────────

    pub fn plans(&self) -> &[AutomationPlan] {
        &self.plans
    }

    pub fn plan(&self, id: PlanId) -> Option<&AutomationPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn enabled_plans(&self) -> impl Iterator<Item = &AutomationPlan> {
        self.plans.iter().filter(|p| p.enabled)
    }

    /// Toggle a plan. Returns false when the id is not in the catalog.
    pub fn set_plan_enabled(&mut self, id: PlanId, enabled: bool) -> bool {
        match self.plans.iter_mut().find(|p| p.id == id) {
            Some(plan) => {
                plan.enabled = enabled;
                true
            }
            None => false,
        }
    }

    // ── Logs ─────────────────────────────────────────────────────────

    /// Append a log entry, evicting the oldest once past [`LOG_CAP`].
    pub fn append_log(&mut self, entry: LogEntry) {
        if self.logs.len() == LOG_CAP {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);
    }

    /// Entries oldest-first.
    pub fn logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter()
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(&mut self, task: AutomationTask) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[AutomationTask] {
        &self.tasks
    }

    /// Operator-side status change. Returns false for an unknown task id.
    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    // ── De-duplication ───────────────────────────────────────────────

    /// Record that a plan fired; returns false when the same
    /// (plan, member, day) combination already fired.
    pub fn mark_fired(&mut self, key: FiredKey) -> bool {
        self.fired.insert(key)
    }

    pub fn already_fired(&self, key: &FiredKey) -> bool {
        self.fired.contains(key)
    }

    /// Drop markers from days before `today`; the set only ever needs to
    /// suppress re-fires within one calendar day.
    pub fn prune_fired(&mut self, today: NaiveDate) {
        self.fired.retain(|k| k.day == today);
    }

    // ── Aggregates ───────────────────────────────────────────────────

    pub fn stats(&self) -> &TodayStats {
        &self.stats
    }

    pub fn set_stats(&mut self, stats: TodayStats) {
        self.stats = stats;
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    pub fn set_last_run(&mut self, at: DateTime<Utc>) {
        self.last_run = Some(at);
    }
}
