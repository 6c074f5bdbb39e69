use crate::error::CoreError;
use crate::models::{OccurrenceUpdate, StatusKind, Task, TaskId, UserId};
use crate::occurrences::{
    resolve_occurrences, sort_by_date, still_to_do, CalendarView, Occurrence, StatusIndex,
    TaskStatistics,
};
use crate::repository::{SqliteRepository, StatusRecordRepository, TaskRepository};
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn occurrences_on(&self, owner: UserId, date: NaiveDate) -> Result<Vec<Occurrence>, CoreError> {
        let tasks = self.find_active_tasks_owned_by(owner).await?;
        let index = self.status_index(&tasks, date, date).await?;

        let mut occurrences = resolve_occurrences(self.recurrence_manager(), &tasks, date, date, &index);
        sort_by_date(&mut occurrences);
        Ok(occurrences)
    }

    async fn occurrences_between(&self, owner: UserId, start: NaiveDate, end: NaiveDate) -> Result<Vec<Occurrence>, CoreError> {
        ensure_ordered(start, end)?;

        let tasks = self.find_active_tasks_owned_by(owner).await?;
        let index = self.status_index(&tasks, start, end).await?;

        let mut occurrences = resolve_occurrences(self.recurrence_manager(), &tasks, start, end, &index);
        sort_by_date(&mut occurrences);
        tracing::debug!(owner, %start, %end, count = occurrences.len(), "expanded occurrences");
        Ok(occurrences)
    }

    async fn occurrences_to_do(&self, owner: UserId, today: NaiveDate) -> Result<Vec<Occurrence>, CoreError> {
        let tasks = self.find_active_tasks_owned_by(owner).await?;
        let index = self.status_index(&tasks, today, today).await?;

        let occurrences = resolve_occurrences(self.recurrence_manager(), &tasks, today, today, &index);
        Ok(still_to_do(occurrences))
    }

    async fn calendar(&self, owner: UserId, start: NaiveDate, end: NaiveDate) -> Result<CalendarView, CoreError> {
        ensure_ordered(start, end)?;

        let tasks = self.find_active_tasks_owned_by(owner).await?;

        let index = self.status_index(&tasks, start, end).await?;
        let mut recurring_occurrences = resolve_occurrences(self.recurrence_manager(), &tasks, start, end, &index);
        sort_by_date(&mut recurring_occurrences);

        // One-off tasks show up both as instances and in their own list.
        let plain_tasks = tasks
            .into_iter()
            .filter(|task| !task.is_recurring())
            .filter(|task| task.due_date.is_some_and(|due| (start..=end).contains(&due)))
            .collect();

        Ok(CalendarView {
            recurring_occurrences,
            plain_tasks,
        })
    }

    async fn statistics(&self, owner: UserId, today: NaiveDate) -> Result<TaskStatistics, CoreError> {
        let tasks = self.find_active_tasks_owned_by(owner).await?;
        let recurring: Vec<Task> = tasks.iter().filter(|task| task.is_recurring()).cloned().collect();
        let index = self.status_index(&recurring, today, today).await?;

        Ok(TaskStatistics::tally(&tasks, today, &index))
    }

    async fn update_occurrence(&self, owner: UserId, update: OccurrenceUpdate) -> Result<Occurrence, CoreError> {
        let OccurrenceUpdate { task_id, date, state, notes } = update;

        let mut task = self
            .find_task_owned_by(owner, task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(task_id.to_string()))?;

        if !self.recurrence_manager().is_occurrence(&task, date) {
            return Err(CoreError::InvalidInput(format!(
                "Date {date} is not an occurrence of task {task_id}"
            )));
        }

        let mut tx = self.pool().begin().await?;
        Self::replace_occurrence_status_in_transaction(&mut tx, &task, date, state, notes.as_deref()).await?;
        tx.commit().await?;

        tracing::info!(task_id, owner, %date, %state, "occurrence status replaced");

        if !task.is_recurring() {
            task.status = state;
        }
        let index = self.status_index(std::slice::from_ref(&task), date, date).await?;
        Ok(Occurrence::resolve(&task, date, &index))
    }
}

impl SqliteRepository {
    /// Loads both kinds of status records for `tasks` inside `[start, end]`.
    pub(crate) async fn status_index(&self, tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Result<StatusIndex, CoreError> {
        let ids: Vec<TaskId> = tasks.iter().map(|task| task.id).collect();

        let completed = self.find_status_records(StatusKind::Completed, &ids, start, end).await?;
        let in_progress = self.find_status_records(StatusKind::InProgress, &ids, start, end).await?;

        Ok(StatusIndex::new(completed, in_progress))
    }
}

fn ensure_ordered(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::InvalidInput(format!(
            "End date {end} must be on or after start date {start}"
        )));
    }
    Ok(())
}
