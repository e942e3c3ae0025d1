//! Integration tests for the automation engine over SQLite-backed
//! members, exercising the full tick pipeline: context building, trigger
//! evaluation, action execution, de-duplication, and durable sinks.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use gymflow_core::{
    default_catalog, AutomationEngine, CheckIn, CheckInKind, Database, EngineConfig, Member,
    MemberStatus, MembershipType, PlanId, StateStore, TaskStatus,
};

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap()
}

fn member(id: &str, name: &str) -> Member {
    let today = noon().date_naive();
    Member {
        id: id.to_string(),
        name: name.to_string(),
        phone: "010-0000-0000".to_string(),
        email: format!("{id}@example.com"),
        status: MemberStatus::Active,
        membership_type: MembershipType::Quarterly,
        expiry_date: today + Duration::days(90),
        registered_on: today - Duration::days(200),
        date_of_birth: None,
        check_ins: vec![],
        health_metrics: vec![],
    }
}

fn engine_over(members: Vec<Member>) -> AutomationEngine<Vec<Member>> {
    AutomationEngine::new(
        members,
        StateStore::new(default_catalog()),
        EngineConfig::default(),
    )
}

#[test]
fn expiring_member_produces_one_retention_log() {
    let today = noon().date_naive();
    let mut m = member("m-1", "Seo Dami");
    m.expiry_date = today + Duration::days(7);

    let mut engine = engine_over(vec![m]);
    let summary = engine.tick(noon());
    assert!(!summary.skipped);

    let hits: Vec<_> = engine
        .store()
        .logs()
        .filter(|l| l.plan_id == PlanId::ExpiryReminder7d)
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].member_name.as_deref(), Some("Seo Dami"));
}

#[test]
fn member_without_check_ins_never_trips_inactivity_plans() {
    // No history at all: days_since_last_check_in is the 999 sentinel,
    // which must not read as "exactly 7 days absent".
    let mut engine = engine_over(vec![member("m-1", "Seo Dami")]);
    engine.tick(noon());

    assert!(engine
        .store()
        .logs()
        .all(|l| l.plan_id != PlanId::InactivityNudge7d));
    assert!(engine
        .store()
        .logs()
        .all(|l| l.plan_id != PlanId::AtRiskOutreach));
}

#[test]
fn at_risk_member_gets_a_follow_up_task() {
    let today = noon().date_naive();
    let mut m = member("m-1", "Seo Dami");
    m.check_ins = vec![CheckIn {
        date: today - Duration::days(20),
        kind: CheckInKind::Gym,
    }];

    let mut engine = engine_over(vec![m]);
    engine.tick(noon());

    let tasks = engine.store().tasks();
    let outreach: Vec<_> = tasks
        .iter()
        .filter(|t| t.plan_id == PlanId::AtRiskOutreach)
        .collect();
    assert_eq!(outreach.len(), 1);
    assert_eq!(outreach[0].status, TaskStatus::Pending);
    assert!(outreach[0].description.contains("20 day(s)"));
}

#[test]
fn database_backed_engine_persists_logs_and_tasks() {
    let today = noon().date_naive();
    let mut db = Database::open_memory().unwrap();
    let mut m = member("m-1", "Seo Dami");
    // Expired 2 days ago: the follow-up call plan creates a task.
    m.status = MemberStatus::Expired;
    m.expiry_date = today - Duration::days(2);
    db.upsert_member(&m).unwrap();

    let sink = Database::open_memory().unwrap();
    // Same handle serves as member source; a second in-memory db as sink
    // keeps the two roles separate.
    let mut engine = AutomationEngine::new(
        db,
        StateStore::new(default_catalog()),
        EngineConfig::default(),
    )
    .with_sink(Box::new(sink));

    let summary = engine.tick(noon());
    assert!(summary.executed >= 1);

    // In-memory store got the call task.
    assert!(engine
        .store()
        .tasks()
        .iter()
        .any(|t| t.plan_id == PlanId::ExpiredFollowUpCall));
}

#[test]
fn durable_sink_receives_what_the_store_receives() {
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Recorder {
        counts: Arc<Mutex<(usize, usize)>>,
    }
    impl gymflow_core::ActionSink for Recorder {
        fn append_log(&self, _: &gymflow_core::LogEntry) -> gymflow_core::error::Result<()> {
            self.counts.lock().unwrap().0 += 1;
            Ok(())
        }
        fn create_task(&self, _: &gymflow_core::AutomationTask) -> gymflow_core::error::Result<()> {
            self.counts.lock().unwrap().1 += 1;
            Ok(())
        }
    }

    let today = noon().date_naive();
    let mut m = member("m-1", "Seo Dami");
    m.expiry_date = today + Duration::days(7);

    let recorder = Recorder {
        counts: Arc::new(Mutex::new((0, 0))),
    };
    let mut engine = AutomationEngine::new(
        vec![m],
        StateStore::new(default_catalog()),
        EngineConfig::default(),
    )
    .with_sink(Box::new(recorder.clone()));

    engine.tick(noon());

    let (logs, _tasks) = *recorder.counts.lock().unwrap();
    assert_eq!(logs, engine.store().log_count());
}

#[test]
fn toggles_persisted_in_the_database_hold_across_restart() {
    let db = Database::open_memory().unwrap();
    db.set_plan_enabled(PlanId::ExpiryReminder7d, false).unwrap();

    // "Restart": build a fresh catalog and re-apply the overrides.
    let mut catalog = default_catalog();
    db.apply_plan_overrides(&mut catalog).unwrap();
    let store = StateStore::new(catalog);

    let today = noon().date_naive();
    let mut m = member("m-1", "Seo Dami");
    m.expiry_date = today + Duration::days(7);

    let mut engine = AutomationEngine::new(vec![m], store, EngineConfig::default());
    engine.tick(noon());

    assert!(engine
        .store()
        .logs()
        .all(|l| l.plan_id != PlanId::ExpiryReminder7d));
}

#[test]
fn birthday_greeting_fires_once_per_day_across_many_ticks() {
    let today = noon().date_naive();
    let mut m = member("m-1", "Seo Dami");
    m.date_of_birth = NaiveDate::from_ymd_opt(1998, today.month(), today.day());
    // Recent activity so no inactivity plans interfere with the count.
    m.check_ins = vec![CheckIn {
        date: today,
        kind: CheckInKind::Gym,
    }];

    let mut engine = engine_over(vec![m]);
    for minutes in 0..10 {
        engine.tick(noon() + Duration::minutes(minutes));
    }

    let greetings = engine
        .store()
        .logs()
        .filter(|l| l.plan_id == PlanId::BirthdayGreeting)
        .count();
    assert_eq!(greetings, 1);
}

#[test]
fn stats_reflect_the_last_tick_member_set() {
    let today = noon().date_naive();
    let mut expiring = member("m-1", "Seo Dami");
    expiring.expiry_date = today + Duration::days(3);
    let healthy = member("m-2", "Oh Jiho");

    let mut engine = engine_over(vec![expiring, healthy]);
    engine.tick(noon());

    let stats = engine.store().stats();
    assert_eq!(stats.total_members, 2);
    assert_eq!(stats.active_members, 2);
    assert_eq!(stats.expiring_soon, 1);
    assert_eq!(engine.store().last_run(), Some(noon()));
}
