use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use tareas_core::models::{NewTaskData, UserId};
use tareas_core::repository::Repository;

use crate::cli::AddCommand;
use crate::parser::parse_day;

pub async fn add_task(repo: &impl Repository, owner: UserId, command: AddCommand) -> Result<()> {
    let due_date = command.due.as_deref().map(parse_day).transpose()?;
    let recurrence_end_date = command.until.as_deref().map(parse_day).transpose()?;

    let data = NewTaskData {
        title: command.title,
        description: command.description,
        category: command.category,
        due_date,
        recurrence: command.every.unwrap_or_default(),
        recurrence_interval: command.interval,
        recurrence_end_date,
    };

    let task = repo.add_task(owner, data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!("{} Created task: {}", "✓".style(success_style), task.title.bright_white().bold());
    println!("  {} Task ID: {}", "→".style(info_style), task.id.to_string().yellow());

    if task.is_recurring() {
        // A recurring task always has a due date once validated.
        let start = task.due_date.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "  {} Repeats {} every {} starting {}",
            "→".style(info_style),
            task.recurrence,
            task.interval(),
            start
        );
        if let Some(until) = task.recurrence_end_date {
            println!("  {} Ends on {}", "→".style(info_style), until);
        }
    } else if let Some(due) = task.due_date {
        println!("  {} Due {}", "→".style(info_style), due);
    }

    Ok(())
}
