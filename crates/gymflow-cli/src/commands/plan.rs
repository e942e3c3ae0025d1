use clap::Subcommand;
use gymflow_core::{default_catalog, Database, PlanId};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List the catalog with persisted toggles applied
    List,
    /// Enable a plan by its id (e.g. retention_001)
    Enable { id: String },
    /// Disable a plan by its id
    Disable { id: String },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PlanAction::List => {
            let mut catalog = default_catalog();
            db.apply_plan_overrides(&mut catalog)?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        PlanAction::Enable { id } => {
            let plan_id = parse_id(&id)?;
            db.set_plan_enabled(plan_id, true)?;
            println!("enabled {id}");
        }
        PlanAction::Disable { id } => {
            let plan_id = parse_id(&id)?;
            db.set_plan_enabled(plan_id, false)?;
            println!("disabled {id}");
        }
    }
    Ok(())
}

fn parse_id(id: &str) -> Result<PlanId, Box<dyn std::error::Error>> {
    PlanId::parse(id).ok_or_else(|| format!("unknown plan id: {id}").into())
}
