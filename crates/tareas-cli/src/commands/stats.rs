use anyhow::Result;
use tareas_core::models::UserId;
use tareas_core::repository::Repository;

use crate::parser::today;
use crate::views::table::display_statistics;

pub async fn show_statistics(repo: &impl Repository, owner: UserId) -> Result<()> {
    let stats = repo.statistics(owner, today()).await?;
    display_statistics(&stats);
    Ok(())
}
