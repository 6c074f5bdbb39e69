use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use tareas_core::models::{OccurrenceUpdate, TaskStatus, UserId};
use tareas_core::repository::Repository;

use crate::cli::SetCommand;
use crate::parser::parse_day;

pub async fn set_occurrence(repo: &impl Repository, owner: UserId, command: SetCommand) -> Result<()> {
    let update = OccurrenceUpdate {
        task_id: command.id,
        date: parse_day(&command.date)?,
        state: command.state,
        notes: command.notes.filter(|n| !n.is_empty()),
    };

    let occurrence = repo.update_occurrence(owner, update).await?;

    let marker = match occurrence.state {
        TaskStatus::Completed => "✓".style(Style::new().green().bold()).to_string(),
        TaskStatus::InProgress => "…".style(Style::new().yellow().bold()).to_string(),
        TaskStatus::Pending => "○".style(Style::new().bold()).to_string(),
    };
    println!(
        "{} {} on {} is now {}",
        marker,
        occurrence.title.bright_white().bold(),
        occurrence.date,
        occurrence.state
    );
    if let Some(notes) = &occurrence.notes {
        println!("  {} {}", "→".blue(), notes);
    }
    Ok(())
}
