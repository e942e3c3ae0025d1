use clap::Subcommand;
use gymflow_core::{Database, TaskStatus};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List follow-up tasks as JSON
    List,
    /// Move a task to a new status
    Status {
        id: String,
        /// pending | in_progress | completed | cancelled
        status: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::List => {
            let tasks = db.list_tasks()?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Status { id, status } => {
            let status = match status.as_str() {
                "pending" => TaskStatus::Pending,
                "in_progress" => TaskStatus::InProgress,
                "completed" => TaskStatus::Completed,
                "cancelled" => TaskStatus::Cancelled,
                other => return Err(format!("unknown status: {other}").into()),
            };
            db.set_task_status(&id, status)?;
            println!("updated {id}");
        }
    }
    Ok(())
}
