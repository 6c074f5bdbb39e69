use anyhow::{Context, Result};
use dialoguer::Confirm;
use owo_colors::{OwoColorize, Style};
use tareas_core::error::CoreError;
use tareas_core::models::UserId;
use tareas_core::repository::Repository;

use crate::cli::DeleteCommand;

pub async fn delete_task(repo: &impl Repository, owner: UserId, command: DeleteCommand) -> Result<()> {
    let task = repo
        .find_task_owned_by(owner, command.id)
        .await?
        .ok_or_else(|| CoreError::NotFound(command.id.to_string()))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", task.title))
            .default(false)
            .interact()
            .context("Could not read confirmation, pass --force to delete without prompting")?;

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.deactivate_task(owner, task.id).await?;

    let success_style = Style::new().green().bold();
    println!("{} Deleted task: {}", "✓".style(success_style), task.title);
    Ok(())
}
