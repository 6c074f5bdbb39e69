//! Occurrence state resolution.
//!
//! Merges the dates produced by [`RecurrenceManager`] with the stored
//! per-date status records into [`Occurrence`] projections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Category, Recurrence, StatusKind, StatusRecord, Task, TaskId, TaskStatus};
use crate::recurrence::RecurrenceManager;

/// Status records of a set of tasks inside a date window, keyed by
/// `(task id, date)`.
#[derive(Debug, Clone, Default)]
pub struct StatusIndex {
    completed: HashMap<(TaskId, NaiveDate), StatusRecord>,
    in_progress: HashMap<(TaskId, NaiveDate), StatusRecord>,
}

impl StatusIndex {
    pub fn new(completed: Vec<StatusRecord>, in_progress: Vec<StatusRecord>) -> Self {
        fn keyed(records: Vec<StatusRecord>) -> HashMap<(TaskId, NaiveDate), StatusRecord> {
            records
                .into_iter()
                .map(|record| ((record.task_id, record.occurrence_date), record))
                .collect()
        }

        Self {
            completed: keyed(completed),
            in_progress: keyed(in_progress),
        }
    }

    pub fn get(&self, kind: StatusKind, task_id: TaskId, date: NaiveDate) -> Option<&StatusRecord> {
        match kind {
            StatusKind::Completed => self.completed.get(&(task_id, date)),
            StatusKind::InProgress => self.in_progress.get(&(task_id, date)),
        }
    }

    /// Resolves the recorded state of one occurrence. A completed record wins
    /// over an in-progress one.
    pub fn resolve(&self, task_id: TaskId, date: NaiveDate) -> RecordedState<'_> {
        if let Some(record) = self.get(StatusKind::Completed, task_id, date) {
            RecordedState::Completed(record)
        } else if let Some(record) = self.get(StatusKind::InProgress, task_id, date) {
            RecordedState::InProgress(record)
        } else {
            RecordedState::Unrecorded
        }
    }
}

/// What the status records say about one occurrence.
///
/// `Unrecorded` is a state in its own right: pending for recurring tasks,
/// the task's own status for non-recurring ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordedState<'a> {
    Completed(&'a StatusRecord),
    InProgress(&'a StatusRecord),
    Unrecorded,
}

/// One calendar-date instance of a task with its resolved state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    #[serde(rename = "id_instancia")]
    pub instance_id: String,
    #[serde(rename = "tarea_id")]
    pub task_id: TaskId,
    #[serde(rename = "tarea_titulo")]
    pub title: String,
    #[serde(rename = "tarea_descripcion")]
    pub description: Option<String>,
    #[serde(rename = "tarea_categoria")]
    pub category: Category,
    #[serde(rename = "tarea_repeticion")]
    pub recurrence: Recurrence,
    #[serde(rename = "fecha_instancia")]
    pub date: NaiveDate,
    #[serde(rename = "estado")]
    pub state: TaskStatus,
    #[serde(rename = "completada_en")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
}

impl Occurrence {
    /// Builds the projection of `task` on `date` from the status records.
    pub fn resolve(task: &Task, date: NaiveDate, index: &StatusIndex) -> Self {
        let (state, recorded_at, notes) = match index.resolve(task.id, date) {
            RecordedState::Completed(record) => (TaskStatus::Completed, Some(record.recorded_at), record.notes.clone()),
            RecordedState::InProgress(record) => (TaskStatus::InProgress, Some(record.recorded_at), record.notes.clone()),
            RecordedState::Unrecorded if task.is_recurring() => (TaskStatus::Pending, None, None),
            RecordedState::Unrecorded => (task.status, None, None),
        };

        Self {
            instance_id: format!("{}-{}", task.id, date),
            task_id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category,
            recurrence: task.recurrence,
            date,
            state,
            recorded_at,
            notes,
        }
    }
}

/// Expands every task into its occurrences inside `[start, end]` and resolves
/// each one against `index`. Output follows task order, then date order.
pub fn resolve_occurrences(
    manager: &RecurrenceManager,
    tasks: &[Task],
    start: NaiveDate,
    end: NaiveDate,
    index: &StatusIndex,
) -> Vec<Occurrence> {
    tasks
        .iter()
        .flat_map(|task| {
            manager
                .occurrences_between(task, start, end)
                .into_iter()
                .map(move |date| Occurrence::resolve(task, date, index))
        })
        .collect()
}

/// Orders occurrences by (date, task id).
pub fn sort_by_date(occurrences: &mut [Occurrence]) {
    occurrences.sort_by_key(|occurrence| (occurrence.date, occurrence.task_id));
}

/// Keeps the occurrences still to be done and orders them by (state, date),
/// pending before in-progress.
pub fn still_to_do(mut occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    occurrences.retain(|occurrence| matches!(occurrence.state, TaskStatus::Pending | TaskStatus::InProgress));
    occurrences.sort_by_key(|occurrence| (occurrence.state, occurrence.date));
    occurrences
}

/// Per-state counts over a user's active tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    #[serde(rename = "pendientes")]
    pub pending: usize,
    #[serde(rename = "en_proceso")]
    pub in_progress: usize,
    #[serde(rename = "completadas")]
    pub completed: usize,
    pub total: usize,
}

impl TaskStatistics {
    /// Counts non-recurring tasks by their own status and recurring tasks by
    /// the state of their occurrence on `today`, as recorded in `index`.
    /// Every recurring task counts once, whether or not today is one of its
    /// occurrence dates.
    pub fn tally(tasks: &[Task], today: NaiveDate, index: &StatusIndex) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            let state = if task.is_recurring() {
                match index.resolve(task.id, today) {
                    RecordedState::Completed(_) => TaskStatus::Completed,
                    RecordedState::InProgress(_) => TaskStatus::InProgress,
                    RecordedState::Unrecorded => TaskStatus::Pending,
                }
            } else {
                task.status
            };

            match state {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }

        stats
    }
}

/// Calendar payload: every occurrence in the window plus the non-recurring
/// tasks due in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    #[serde(rename = "instancias_recurrentes")]
    pub recurring_occurrences: Vec<Occurrence>,
    #[serde(rename = "tareas_normales")]
    pub plain_tasks: Vec<Task>,
}
