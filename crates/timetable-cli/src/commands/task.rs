use clap::Subcommand;
use timetable_core::storage::settings::{load_task, save_task};
use timetable_core::{Database, TaskId};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Associate a backend task with the timer ("none" clears it)
    Select {
        /// Task ID
        id: String,
    },
    /// Forget the associated task
    Clear,
    /// Print the associated task ID, if any
    Show,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Select { id } => {
            let task_id = TaskId::parse(&id);
            save_task(&db, task_id.as_ref())?;
            println!("{}", serde_json::json!({ "taskId": task_id }));
        }
        TaskAction::Clear => {
            save_task(&db, None)?;
            println!("{}", serde_json::json!({ "taskId": null }));
        }
        TaskAction::Show => {
            let task_id = load_task(&db)?;
            println!("{}", serde_json::json!({ "taskId": task_id }));
        }
    }
    Ok(())
}
