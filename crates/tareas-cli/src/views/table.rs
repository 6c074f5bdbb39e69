use chrono::{Duration, NaiveDate};
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use tareas_core::models::{Category, Recurrence, Task, TaskStatus, TaskSummary};
use tareas_core::occurrences::{CalendarView, Occurrence, TaskStatistics};

fn status_cell(status: TaskStatus) -> Cell {
    match status {
        TaskStatus::Pending => Cell::new("Pending"),
        TaskStatus::InProgress => Cell::new("In progress").fg(Color::Yellow),
        TaskStatus::Completed => Cell::new("Completed").fg(Color::Green),
    }
}

fn category_cell(category: Category) -> Cell {
    let cell = Cell::new(category.as_str());
    match category {
        Category::Work => cell.fg(Color::Blue),
        Category::Study => cell.fg(Color::Magenta),
        Category::Personal => cell,
    }
}

fn title_cell(title: &str, recurring: bool, status: TaskStatus) -> Cell {
    let display_name = if recurring {
        format!("↻ {title}")
    } else {
        title.to_string()
    };

    let cell = Cell::new(display_name);
    if status == TaskStatus::Completed {
        cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey)
    } else {
        cell
    }
}

/// "today", "in 3 days", "2 weeks ago"
fn relative_day(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    if days == 0 {
        "today".to_string()
    } else {
        HumanTime::from(Duration::days(days)).to_string()
    }
}

pub fn display_tasks(tasks: &[TaskSummary], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Status", "Repeats", "Next"]);

    for TaskSummary { task, next_occurrence } in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(task.id));
        row.add_cell(title_cell(&task.title, task.is_recurring(), task.status));
        row.add_cell(category_cell(task.category));

        // A recurring task's own status carries no meaning.
        row.add_cell(if task.is_recurring() {
            Cell::new("-")
        } else {
            status_cell(task.status)
        });

        row.add_cell(Cell::new(repeats(task)));

        let next_cell = match next_occurrence {
            Some(date) if *date == today => Cell::new(format!("{date} (today)")).fg(Color::Yellow),
            Some(date) => Cell::new(format!("{date} ({})", relative_day(*date, today))),
            None => Cell::new("None").fg(Color::DarkGrey),
        };
        row.add_cell(next_cell);

        table.add_row(row);
    }

    println!("{table}");
}

fn repeats(task: &Task) -> String {
    if !task.is_recurring() {
        return "No".to_string();
    }

    let mut text = if task.interval() == 1 {
        task.recurrence.to_string()
    } else {
        format!("{} x{}", task.recurrence, task.interval())
    };
    if let Some(until) = task.recurrence_end_date {
        text.push_str(&format!(" until {until}"));
    }
    text
}

pub fn display_occurrences(occurrences: &[Occurrence]) {
    if occurrences.is_empty() {
        println!("No occurrences found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Task", "Title", "Category", "Status", "Notes"]);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(occurrence.date));
        row.add_cell(Cell::new(occurrence.task_id));
        row.add_cell(title_cell(
            &occurrence.title,
            occurrence.recurrence != Recurrence::None,
            occurrence.state,
        ));
        row.add_cell(category_cell(occurrence.category));
        row.add_cell(status_cell(occurrence.state));
        row.add_cell(Cell::new(occurrence.notes.as_deref().unwrap_or("")));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_calendar(view: &CalendarView) {
    println!("Recurring occurrences");
    display_occurrences(&view.recurring_occurrences);

    println!();
    println!("Tasks due");
    if view.plain_tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Status", "Due"]);
    for task in &view.plain_tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(task.id));
        row.add_cell(title_cell(&task.title, false, task.status));
        row.add_cell(category_cell(task.category));
        row.add_cell(status_cell(task.status));
        row.add_cell(Cell::new(
            task.due_date.map(|d| d.to_string()).unwrap_or_default(),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_statistics(stats: &TaskStatistics) {
    let mut table = Table::new();
    table.set_header(vec!["Pending", "In progress", "Completed", "Total"]);
    table.add_row(vec![
        Cell::new(stats.pending),
        Cell::new(stats.in_progress).fg(Color::Yellow),
        Cell::new(stats.completed).fg(Color::Green),
        Cell::new(stats.total).add_attribute(Attribute::Bold),
    ]);

    println!("{table}");
}
