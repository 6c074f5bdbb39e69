use anyhow::Result;
use tareas_core::models::UserId;
use tareas_core::repository::Repository;

use crate::cli::{DayCommand, RangeCommand};
use crate::parser::{parse_day, today};
use crate::views::table::{display_calendar, display_occurrences};

pub async fn show_day(repo: &impl Repository, owner: UserId, command: DayCommand) -> Result<()> {
    let date = match command.date.as_deref() {
        Some(date) => parse_day(date)?,
        None => today(),
    };

    let occurrences = repo.occurrences_on(owner, date).await?;
    display_occurrences(&occurrences);
    Ok(())
}

pub async fn show_range(repo: &impl Repository, owner: UserId, command: RangeCommand) -> Result<()> {
    let start = parse_day(&command.from)?;
    let end = parse_day(&command.to)?;

    let occurrences = repo.occurrences_between(owner, start, end).await?;
    display_occurrences(&occurrences);
    Ok(())
}

pub async fn show_today(repo: &impl Repository, owner: UserId) -> Result<()> {
    let occurrences = repo.occurrences_to_do(owner, today()).await?;
    if occurrences.is_empty() {
        println!("Nothing left to do today.");
        return Ok(());
    }
    display_occurrences(&occurrences);
    Ok(())
}

pub async fn show_calendar(repo: &impl Repository, owner: UserId, command: RangeCommand) -> Result<()> {
    let start = parse_day(&command.from)?;
    let end = parse_day(&command.to)?;

    let view = repo.calendar(owner, start, end).await?;
    display_calendar(&view);
    Ok(())
}
