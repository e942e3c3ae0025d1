//! SQLite-backed persistence.
//!
//! Provides durable storage for:
//! - Member records with their embedded check-in and health histories
//! - Automation logs (trimmed to the in-memory cap)
//! - Follow-up tasks
//! - Plan enable/disable overrides
//!
//! The engine consumes this through the `MemberSource` and `ActionSink`
//! traits; the CLI talks to it directly.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::action::{AutomationTask, LogEntry, Severity, TaskStatus};
use crate::engine::{ActionSink, MemberSource};
use crate::error::{CoreError, DatabaseError, Result};
use crate::member::{CheckIn, CheckInKind, HealthMetric, Member, MemberStatus, MembershipType};
use crate::plan::{AutomationPlan, PlanId};
use crate::store::LOG_CAP;

/// SQLite database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/gymflow/gymflow.db`, creating the
    /// schema on first use.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("gymflow.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS members (
                    id              TEXT PRIMARY KEY,
                    name            TEXT NOT NULL,
                    phone           TEXT NOT NULL DEFAULT '',
                    email           TEXT NOT NULL DEFAULT '',
                    status          TEXT NOT NULL,
                    membership_type TEXT NOT NULL,
                    expiry_date     TEXT NOT NULL,
                    registered_on   TEXT NOT NULL,
                    date_of_birth   TEXT
                );

                CREATE TABLE IF NOT EXISTS check_ins (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    member_id TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                    date      TEXT NOT NULL,
                    kind      TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS health_metrics (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    member_id   TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                    recorded_on TEXT NOT NULL,
                    weight_kg   REAL NOT NULL,
                    muscle_kg   REAL NOT NULL
                );

                CREATE TABLE IF NOT EXISTS automation_logs (
                    id          TEXT PRIMARY KEY,
                    plan_id     TEXT NOT NULL,
                    plan_name   TEXT NOT NULL,
                    member_id   TEXT,
                    member_name TEXT,
                    at          TEXT NOT NULL,
                    message     TEXT NOT NULL,
                    severity    TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS automation_tasks (
                    id          TEXT PRIMARY KEY,
                    plan_id     TEXT NOT NULL,
                    title       TEXT NOT NULL,
                    description TEXT NOT NULL,
                    member_id   TEXT,
                    member_name TEXT,
                    status      TEXT NOT NULL,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS plan_toggles (
                    plan_id TEXT PRIMARY KEY,
                    enabled INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_check_ins_member ON check_ins(member_id, date);
                CREATE INDEX IF NOT EXISTS idx_metrics_member ON health_metrics(member_id, recorded_on);
                CREATE INDEX IF NOT EXISTS idx_logs_at ON automation_logs(at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Members ──────────────────────────────────────────────────────

    /// Insert or replace a member and its embedded histories.
    pub fn upsert_member(&mut self, member: &Member) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(DatabaseError::from)?;
        tx.execute(
            "INSERT OR REPLACE INTO members
             (id, name, phone, email, status, membership_type, expiry_date, registered_on, date_of_birth)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                member.id,
                member.name,
                member.phone,
                member.email,
                status_str(member.status),
                tier_str(member.membership_type),
                member.expiry_date.to_string(),
                member.registered_on.to_string(),
                member.date_of_birth.map(|d| d.to_string()),
            ],
        )
        .map_err(DatabaseError::from)?;

        tx.execute("DELETE FROM check_ins WHERE member_id = ?1", params![member.id])
            .map_err(DatabaseError::from)?;
        for check_in in &member.check_ins {
            tx.execute(
                "INSERT INTO check_ins (member_id, date, kind) VALUES (?1, ?2, ?3)",
                params![member.id, check_in.date.to_string(), kind_str(check_in.kind)],
            )
            .map_err(DatabaseError::from)?;
        }

        tx.execute(
            "DELETE FROM health_metrics WHERE member_id = ?1",
            params![member.id],
        )
        .map_err(DatabaseError::from)?;
        for metric in &member.health_metrics {
            tx.execute(
                "INSERT INTO health_metrics (member_id, recorded_on, weight_kg, muscle_kg)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    member.id,
                    metric.recorded_on.to_string(),
                    metric.weight_kg,
                    metric.muscle_kg,
                ],
            )
            .map_err(DatabaseError::from)?;
        }

        tx.commit().map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Append one check-in without rewriting the member row.
    pub fn record_check_in(&self, member_id: &str, check_in: CheckIn) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "INSERT INTO check_ins (member_id, date, kind)
                 SELECT ?1, ?2, ?3 WHERE EXISTS (SELECT 1 FROM members WHERE id = ?1)",
                params![member_id, check_in.date.to_string(), kind_str(check_in.kind)],
            )
            .map_err(DatabaseError::from)?;
        if changed == 0 {
            return Err(CoreError::Custom(format!("unknown member: {member_id}")));
        }
        Ok(())
    }

    /// Append one health-metric sample.
    pub fn record_metric(&self, member_id: &str, metric: HealthMetric) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "INSERT INTO health_metrics (member_id, recorded_on, weight_kg, muscle_kg)
                 SELECT ?1, ?2, ?3, ?4 WHERE EXISTS (SELECT 1 FROM members WHERE id = ?1)",
                params![
                    member_id,
                    metric.recorded_on.to_string(),
                    metric.weight_kg,
                    metric.muscle_kg,
                ],
            )
            .map_err(DatabaseError::from)?;
        if changed == 0 {
            return Err(CoreError::Custom(format!("unknown member: {member_id}")));
        }
        Ok(())
    }

    /// All members with their embedded histories.
    pub fn list_members(&self) -> Result<Vec<Member>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, phone, email, status, membership_type,
                        expiry_date, registered_on, date_of_birth
                 FROM members ORDER BY name",
            )
            .map_err(DatabaseError::from)?;

        let raw: Vec<(
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            Option<String>,
        )> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                ))
            })
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DatabaseError::from)?;

        let mut members = Vec::with_capacity(raw.len());
        for (id, name, phone, email, status, tier, expiry, registered, dob) in raw {
            members.push(Member {
                check_ins: self.check_ins_for(&id)?,
                health_metrics: self.metrics_for(&id)?,
                id,
                name,
                phone,
                email,
                status: parse_status(&status)?,
                membership_type: parse_tier(&tier)?,
                expiry_date: parse_date(&expiry)?,
                registered_on: parse_date(&registered)?,
                date_of_birth: dob.as_deref().map(parse_date).transpose()?,
            });
        }
        Ok(members)
    }

    fn check_ins_for(&self, member_id: &str) -> Result<Vec<CheckIn>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, kind FROM check_ins WHERE member_id = ?1 ORDER BY date DESC")
            .map_err(DatabaseError::from)?;
        let raw: Vec<(String, String)> = stmt
            .query_map(params![member_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DatabaseError::from)?;

        raw.into_iter()
            .map(|(date, kind)| {
                Ok(CheckIn {
                    date: parse_date(&date)?,
                    kind: parse_kind(&kind)?,
                })
            })
            .collect()
    }

    fn metrics_for(&self, member_id: &str) -> Result<Vec<HealthMetric>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT recorded_on, weight_kg, muscle_kg FROM health_metrics
                 WHERE member_id = ?1 ORDER BY recorded_on DESC",
            )
            .map_err(DatabaseError::from)?;
        let raw: Vec<(String, f64, f64)> = stmt
            .query_map(params![member_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DatabaseError::from)?;

        raw.into_iter()
            .map(|(recorded_on, weight_kg, muscle_kg)| {
                Ok(HealthMetric {
                    recorded_on: parse_date(&recorded_on)?,
                    weight_kg,
                    muscle_kg,
                })
            })
            .collect()
    }

    // ── Automation logs ──────────────────────────────────────────────

    /// Append a log entry and trim the table to the cap.
    pub fn append_log_entry(&self, entry: &LogEntry) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO automation_logs
                 (id, plan_id, plan_name, member_id, member_name, at, message, severity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    entry.id,
                    entry.plan_id.as_str(),
                    entry.plan_name,
                    entry.member_id,
                    entry.member_name,
                    entry.at.to_rfc3339(),
                    entry.message,
                    severity_str(entry.severity),
                ],
            )
            .map_err(DatabaseError::from)?;
        self.conn
            .execute(
                "DELETE FROM automation_logs WHERE rowid NOT IN
                 (SELECT rowid FROM automation_logs ORDER BY rowid DESC LIMIT ?1)",
                params![LOG_CAP as i64],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Most recent entries first.
    pub fn list_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, plan_id, plan_name, member_id, member_name, at, message, severity
                 FROM automation_logs ORDER BY rowid DESC LIMIT ?1",
            )
            .map_err(DatabaseError::from)?;
        let raw: Vec<(
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            String,
            String,
            String,
        )> = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ))
            })
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DatabaseError::from)?;

        raw.into_iter()
            .map(|(id, plan_id, plan_name, member_id, member_name, at, message, severity)| {
                Ok(LogEntry {
                    id,
                    plan_id: parse_plan_id(&plan_id)?,
                    plan_name,
                    member_id,
                    member_name,
                    at: parse_datetime(&at)?,
                    message,
                    severity: parse_severity(&severity)?,
                })
            })
            .collect()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn insert_task(&self, task: &AutomationTask) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO automation_tasks
                 (id, plan_id, title, description, member_id, member_name, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    task.id,
                    task.plan_id.as_str(),
                    task.title,
                    task.description,
                    task.member_id,
                    task.member_name,
                    task_status_str(task.status),
                    task.created_at.to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    pub fn list_tasks(&self) -> Result<Vec<AutomationTask>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, plan_id, title, description, member_id, member_name, status, created_at
                 FROM automation_tasks ORDER BY created_at DESC",
            )
            .map_err(DatabaseError::from)?;
        let raw: Vec<(
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            String,
            String,
        )> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ))
            })
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DatabaseError::from)?;

        raw.into_iter()
            .map(|(id, plan_id, title, description, member_id, member_name, status, created)| {
                Ok(AutomationTask {
                    id,
                    plan_id: parse_plan_id(&plan_id)?,
                    title,
                    description,
                    member_id,
                    member_name,
                    status: parse_task_status(&status)?,
                    created_at: parse_datetime(&created)?,
                })
            })
            .collect()
    }

    /// Operator-side status change. Errors on an unknown task id.
    pub fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE automation_tasks SET status = ?1 WHERE id = ?2",
                params![task_status_str(status), task_id],
            )
            .map_err(DatabaseError::from)?;
        if changed == 0 {
            return Err(CoreError::Custom(format!("unknown task: {task_id}")));
        }
        Ok(())
    }

    // ── Plan toggles ─────────────────────────────────────────────────

    /// Persist a toggle so it survives restarts.
    pub fn set_plan_enabled(&self, id: PlanId, enabled: bool) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO plan_toggles (plan_id, enabled) VALUES (?1, ?2)",
                params![id.as_str(), enabled as i64],
            )
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    /// Apply persisted toggles onto a catalog. Unknown ids (from an older
    /// build) are ignored.
    pub fn apply_plan_overrides(&self, plans: &mut [AutomationPlan]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT plan_id, enabled FROM plan_toggles")
            .map_err(DatabaseError::from)?;
        let raw: Vec<(String, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(DatabaseError::from)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DatabaseError::from)?;

        for (id, enabled) in raw {
            if let Some(plan_id) = PlanId::parse(&id) {
                if let Some(plan) = plans.iter_mut().find(|p| p.id == plan_id) {
                    plan.enabled = enabled != 0;
                }
            }
        }
        Ok(())
    }
}

impl MemberSource for Database {
    fn members(&self) -> Result<Vec<Member>> {
        self.list_members()
    }
}

impl ActionSink for Database {
    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.append_log_entry(entry)
    }

    fn create_task(&self, task: &AutomationTask) -> Result<()> {
        self.insert_task(task)
    }
}

// ── Column encoding ──────────────────────────────────────────────────

fn status_str(status: MemberStatus) -> &'static str {
    match status {
        MemberStatus::Active => "active",
        MemberStatus::Expired => "expired",
        MemberStatus::Paused => "paused",
    }
}

fn parse_status(s: &str) -> Result<MemberStatus> {
    match s {
        "active" => Ok(MemberStatus::Active),
        "expired" => Ok(MemberStatus::Expired),
        "paused" => Ok(MemberStatus::Paused),
        other => Err(bad_column("status", other)),
    }
}

fn tier_str(tier: MembershipType) -> &'static str {
    match tier {
        MembershipType::Monthly => "monthly",
        MembershipType::Quarterly => "quarterly",
        MembershipType::Yearly => "yearly",
    }
}

fn parse_tier(s: &str) -> Result<MembershipType> {
    match s {
        "monthly" => Ok(MembershipType::Monthly),
        "quarterly" => Ok(MembershipType::Quarterly),
        "yearly" => Ok(MembershipType::Yearly),
        other => Err(bad_column("membership_type", other)),
    }
}

fn kind_str(kind: CheckInKind) -> &'static str {
    match kind {
        CheckInKind::Gym => "gym",
        CheckInKind::Class => "class",
    }
}

fn parse_kind(s: &str) -> Result<CheckInKind> {
    match s {
        "gym" => Ok(CheckInKind::Gym),
        "class" => Ok(CheckInKind::Class),
        other => Err(bad_column("kind", other)),
    }
}

fn severity_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "success",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
        Severity::Info => "info",
    }
}

fn parse_severity(s: &str) -> Result<Severity> {
    match s {
        "success" => Ok(Severity::Success),
        "warning" => Ok(Severity::Warning),
        "critical" => Ok(Severity::Critical),
        "info" => Ok(Severity::Info),
        other => Err(bad_column("severity", other)),
    }
}

fn task_status_str(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
        TaskStatus::Cancelled => "cancelled",
    }
}

fn parse_task_status(s: &str) -> Result<TaskStatus> {
    match s {
        "pending" => Ok(TaskStatus::Pending),
        "in_progress" => Ok(TaskStatus::InProgress),
        "completed" => Ok(TaskStatus::Completed),
        "cancelled" => Ok(TaskStatus::Cancelled),
        other => Err(bad_column("task status", other)),
    }
}

fn parse_plan_id(s: &str) -> Result<PlanId> {
    PlanId::parse(s).ok_or_else(|| bad_column("plan_id", s))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| bad_column("date", s))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| bad_column("timestamp", s))
}

fn bad_column(column: &str, value: &str) -> CoreError {
    DatabaseError::QueryFailed(format!("unexpected {column} value: {value}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_member() -> Member {
        Member {
            id: "m-1".to_string(),
            name: "Jang Wonyoung".to_string(),
            phone: "010-1111-2222".to_string(),
            email: "wy@example.com".to_string(),
            status: MemberStatus::Active,
            membership_type: MembershipType::Monthly,
            expiry_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            registered_on: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            date_of_birth: NaiveDate::from_ymd_opt(2004, 8, 31),
            check_ins: vec![
                CheckIn {
                    date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
                    kind: CheckInKind::Gym,
                },
                CheckIn {
                    date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
                    kind: CheckInKind::Class,
                },
            ],
            health_metrics: vec![HealthMetric {
                recorded_on: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                weight_kg: 52.0,
                muscle_kg: 22.5,
            }],
        }
    }

    fn log_entry(n: usize) -> LogEntry {
        LogEntry {
            id: format!("log-{n}"),
            plan_id: PlanId::ExpiryReminder7d,
            plan_name: "Expiry reminder (7 days)".to_string(),
            member_id: Some("m-1".to_string()),
            member_name: Some("Jang Wonyoung".to_string()),
            at: Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap(),
            message: format!("entry {n}"),
            severity: Severity::Warning,
        }
    }

    #[test]
    fn member_roundtrip_with_histories() {
        let mut db = Database::open_memory().unwrap();
        db.upsert_member(&sample_member()).unwrap();

        let members = db.list_members().unwrap();
        assert_eq!(members.len(), 1);
        let m = &members[0];
        assert_eq!(m.id, "m-1");
        assert_eq!(m.check_ins.len(), 2);
        assert_eq!(m.health_metrics.len(), 1);
        assert_eq!(m.status, MemberStatus::Active);
        assert_eq!(m.date_of_birth, NaiveDate::from_ymd_opt(2004, 8, 31));
    }

    #[test]
    fn record_check_in_requires_known_member() {
        let mut db = Database::open_memory().unwrap();
        db.upsert_member(&sample_member()).unwrap();

        let check_in = CheckIn {
            date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            kind: CheckInKind::Gym,
        };
        db.record_check_in("m-1", check_in).unwrap();
        assert!(db.record_check_in("ghost", check_in).is_err());

        let members = db.list_members().unwrap();
        assert_eq!(members[0].check_ins.len(), 3);
    }

    #[test]
    fn log_table_trims_to_cap() {
        let db = Database::open_memory().unwrap();
        for n in 0..LOG_CAP + 30 {
            db.append_log_entry(&log_entry(n)).unwrap();
        }

        let logs = db.list_logs(LOG_CAP * 2).unwrap();
        assert_eq!(logs.len(), LOG_CAP);
        // Newest first; the newest survives, the oldest 30 are gone.
        assert_eq!(logs[0].id, format!("log-{}", LOG_CAP + 29));
        assert_eq!(logs.last().unwrap().id, "log-30");
    }

    #[test]
    fn task_lifecycle_roundtrip() {
        let db = Database::open_memory().unwrap();
        let task = AutomationTask {
            id: "t-1".to_string(),
            plan_id: PlanId::AtRiskOutreach,
            title: "Reach out to Jang Wonyoung".to_string(),
            description: "14 days absent".to_string(),
            member_id: Some("m-1".to_string()),
            member_name: Some("Jang Wonyoung".to_string()),
            status: TaskStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap(),
        };
        db.insert_task(&task).unwrap();

        db.set_task_status("t-1", TaskStatus::Completed).unwrap();
        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Completed);

        assert!(db.set_task_status("nope", TaskStatus::Cancelled).is_err());
    }

    #[test]
    fn plan_overrides_survive_reload() {
        let db = Database::open_memory().unwrap();
        db.set_plan_enabled(PlanId::ExpiryReminder7d, false).unwrap();

        let mut plans = crate::plan::default_catalog();
        db.apply_plan_overrides(&mut plans).unwrap();
        let plan = plans
            .iter()
            .find(|p| p.id == PlanId::ExpiryReminder7d)
            .unwrap();
        assert!(!plan.enabled);
    }
}
