use anyhow::Result;
use tareas_core::models::UserId;
use tareas_core::repository::Repository;

use crate::parser::today;
use crate::views::table::display_tasks;

pub async fn list_tasks(repo: &impl Repository, owner: UserId) -> Result<()> {
    let today = today();
    let tasks = repo.list_task_summaries(owner, today).await?;
    display_tasks(&tasks, today);
    Ok(())
}
