use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use gymflow_core::{
    CheckIn, CheckInKind, Database, HealthMetric, Member, MemberContext, MemberStatus,
    MembershipType,
};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum MemberAction {
    /// Register a member
    Add {
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        /// monthly | quarterly | yearly
        #[arg(long, default_value = "monthly")]
        tier: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: NaiveDate,
        /// Registration date; defaults to today
        #[arg(long)]
        registered: Option<NaiveDate>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
    },
    /// List members as JSON
    List,
    /// Record a check-in for a member
    CheckIn {
        id: String,
        /// Record as a class check-in instead of a gym visit
        #[arg(long)]
        class: bool,
        /// Check-in date; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record a body-composition sample
    Measure {
        id: String,
        weight_kg: f64,
        muscle_kg: f64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the derived context for a member as of now
    Context { id: String },
    /// Load the demo roster (idempotent; stable demo-NNN ids)
    Seed,
}

pub fn run(action: MemberAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        MemberAction::Add {
            name,
            phone,
            email,
            tier,
            expires,
            registered,
            dob,
        } => {
            let membership_type = match tier.as_str() {
                "monthly" => MembershipType::Monthly,
                "quarterly" => MembershipType::Quarterly,
                "yearly" => MembershipType::Yearly,
                other => return Err(format!("unknown tier: {other}").into()),
            };
            let member = Member {
                id: Uuid::new_v4().to_string(),
                name,
                phone,
                email,
                status: MemberStatus::Active,
                membership_type,
                expiry_date: expires,
                registered_on: registered.unwrap_or_else(|| Utc::now().date_naive()),
                date_of_birth: dob,
                check_ins: vec![],
                health_metrics: vec![],
            };
            db.upsert_member(&member)?;
            println!("{}", member.id);
        }
        MemberAction::List => {
            let members = db.list_members()?;
            println!("{}", serde_json::to_string_pretty(&members)?);
        }
        MemberAction::CheckIn { id, class, date } => {
            let check_in = CheckIn {
                date: date.unwrap_or_else(|| Utc::now().date_naive()),
                kind: if class {
                    CheckInKind::Class
                } else {
                    CheckInKind::Gym
                },
            };
            db.record_check_in(&id, check_in)?;
            println!("checked in {id}");
        }
        MemberAction::Measure {
            id,
            weight_kg,
            muscle_kg,
            date,
        } => {
            db.record_metric(
                &id,
                HealthMetric {
                    recorded_on: date.unwrap_or_else(|| Utc::now().date_naive()),
                    weight_kg,
                    muscle_kg,
                },
            )?;
            println!("recorded measurement for {id}");
        }
        MemberAction::Context { id } => {
            let members = db.list_members()?;
            let member = members
                .iter()
                .find(|m| m.id == id)
                .ok_or_else(|| format!("unknown member: {id}"))?;
            let ctx = MemberContext::build(member, Utc::now());
            println!("{}", serde_json::to_string_pretty(&ctx)?);
        }
        MemberAction::Seed => {
            let roster = gymflow_core::demo_members(Utc::now().date_naive());
            let count = roster.len();
            for member in roster {
                db.upsert_member(&member)?;
            }
            println!("seeded {count} demo members");
        }
    }
    Ok(())
}
