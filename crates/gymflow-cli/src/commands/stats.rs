use chrono::Utc;
use clap::Subcommand;
use gymflow_core::{Database, TodayStats};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's dashboard snapshot, computed over the current member set
    Today,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today => {
            let members = db.list_members()?;
            let stats = TodayStats::compute(&members, Utc::now());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
