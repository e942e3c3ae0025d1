use clap::Subcommand;
use gymflow_core::Database;

#[derive(Subcommand)]
pub enum LogAction {
    /// Most recent automation log entries
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        LogAction::List { limit } => {
            let logs = db.list_logs(limit)?;
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
    }
    Ok(())
}
