use crate::error::CoreError;
use crate::models::{NewTaskData, Task, TaskId, TaskStatus, TaskSummary, UpdateTaskData, UserId};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, owner: UserId, data: NewTaskData) -> Result<Task, CoreError> {
        let mut candidate = Task {
            title: data.title,
            description: data.description,
            category: data.category,
            // New tasks always start pending, whatever the caller asked for.
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            due_date: data.due_date,
            recurrence: data.recurrence,
            recurrence_interval: data.recurrence_interval,
            recurrence_end_date: data.recurrence_end_date,
            active: true,
            owner_id: owner,
            ..Default::default()
        };
        if !candidate.is_recurring() {
            candidate.recurrence_end_date = None;
        }
        validate_task(&candidate)?;

        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as(
            r#"INSERT INTO tasks (title, description, category, status, created_at, due_date, recurrence, recurrence_interval, recurrence_end_date, active, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *"#,
        )
        .bind(&candidate.title)
        .bind(&candidate.description)
        .bind(candidate.category)
        .bind(candidate.status)
        .bind(candidate.created_at)
        .bind(candidate.due_date)
        .bind(candidate.recurrence)
        .bind(candidate.recurrence_interval)
        .bind(candidate.recurrence_end_date)
        .bind(candidate.active)
        .bind(candidate.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(task_id = task.id, owner, recurrence = %task.recurrence, "task created");
        Ok(task)
    }

    async fn find_task_owned_by(&self, owner: UserId, id: TaskId) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND owner_id = $2 AND active = 1")
            .bind(id)
            .bind(owner)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_active_tasks_owned_by(&self, owner: UserId) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            "SELECT * FROM tasks WHERE owner_id = $1 AND active = 1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn list_task_summaries(&self, owner: UserId, reference: NaiveDate) -> Result<Vec<TaskSummary>, CoreError> {
        let tasks = self.find_active_tasks_owned_by(owner).await?;
        let summaries = tasks
            .into_iter()
            .map(|task| TaskSummary {
                next_occurrence: self.recurrence_manager().next_occurrence(&task, reference),
                task,
            })
            .collect();
        Ok(summaries)
    }

    async fn update_task(&self, owner: UserId, id: TaskId, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND owner_id = $2 AND active = 1")
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let merged = apply_update(current, data);
        validate_task(&merged)?;

        let updated: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET title = $1, description = $2, category = $3, status = $4, due_date = $5,
                recurrence = $6, recurrence_interval = $7, recurrence_end_date = $8
            WHERE id = $9
            RETURNING *"#,
        )
        .bind(&merged.title)
        .bind(&merged.description)
        .bind(merged.category)
        .bind(merged.status)
        .bind(merged.due_date)
        .bind(merged.recurrence)
        .bind(merged.recurrence_interval)
        .bind(merged.recurrence_end_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(task_id = id, owner, "task updated");
        Ok(updated)
    }

    async fn deactivate_task(&self, owner: UserId, id: TaskId) -> Result<(), CoreError> {
        let result = sqlx::query("UPDATE tasks SET active = 0 WHERE id = $1 AND owner_id = $2 AND active = 1")
            .bind(id)
            .bind(owner)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }

        tracing::info!(task_id = id, owner, "task deactivated");
        Ok(())
    }
}

impl SqliteRepository {
    /// Overwrites a task's own status within an existing transaction
    pub(crate) async fn update_task_status_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<(), CoreError> {
        sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(task_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

/// Merges a partial update into the current task.
///
/// A status change is dropped for recurring tasks: their per-date state lives
/// in status records only. Turning a task non-recurring clears its end date.
fn apply_update(mut task: Task, data: UpdateTaskData) -> Task {
    let was_recurring = task.is_recurring();

    if let Some(title) = data.title {
        task.title = title;
    }
    if let Some(description) = data.description {
        task.description = description;
    }
    if let Some(category) = data.category {
        task.category = category;
    }
    if let Some(status) = data.status {
        if !was_recurring {
            task.status = status;
        }
    }
    if let Some(due_date) = data.due_date {
        task.due_date = due_date;
    }
    if let Some(recurrence) = data.recurrence {
        task.recurrence = recurrence;
    }
    if let Some(interval) = data.recurrence_interval {
        task.recurrence_interval = interval;
    }
    if let Some(end_date) = data.recurrence_end_date {
        task.recurrence_end_date = end_date;
    }
    if !task.is_recurring() {
        task.recurrence_end_date = None;
    }

    task
}

fn validate_task(task: &Task) -> Result<(), CoreError> {
    if task.title.trim().is_empty() {
        return Err(CoreError::InvalidInput("Title must not be empty".to_string()));
    }

    if task.is_recurring() {
        let Some(start) = task.due_date else {
            return Err(CoreError::InvalidInput(
                "Recurring tasks require a start date (fecha_entrega)".to_string(),
            ));
        };
        if task.recurrence_interval < 1 {
            return Err(CoreError::InvalidInput(
                "Recurrence interval must be at least 1".to_string(),
            ));
        }
        if task.recurrence_end_date.is_some_and(|until| until < start) {
            return Err(CoreError::InvalidInput(
                "Recurrence end date must not be before the start date".to_string(),
            ));
        }
    }

    Ok(())
}
