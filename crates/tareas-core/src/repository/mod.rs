use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    NewTaskData, OccurrenceUpdate, StatusKind, StatusRecord, Task, TaskId, TaskSummary,
    UpdateTaskData, UserId,
};
use crate::occurrences::{CalendarView, Occurrence, TaskStatistics};
use crate::recurrence::RecurrenceManager;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod occurrences;
pub mod status;
pub mod tasks;

/// Owner-scoped persistence of task definitions.
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, owner: UserId, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_owned_by(&self, owner: UserId, id: TaskId) -> Result<Option<Task>, CoreError>;
    /// Active tasks of `owner`, most recently created first.
    async fn find_active_tasks_owned_by(&self, owner: UserId) -> Result<Vec<Task>, CoreError>;
    /// Active tasks of `owner` with their next occurrence on or after `reference`.
    async fn list_task_summaries(&self, owner: UserId, reference: NaiveDate) -> Result<Vec<TaskSummary>, CoreError>;
    async fn update_task(&self, owner: UserId, id: TaskId, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn deactivate_task(&self, owner: UserId, id: TaskId) -> Result<(), CoreError>;
}

/// Persistence of per-date status records.
#[async_trait]
pub trait StatusRecordRepository {
    /// Records of `kind` for the given tasks whose date lies in `[start, end]`.
    async fn find_status_records(
        &self,
        kind: StatusKind,
        task_ids: &[TaskId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StatusRecord>, CoreError>;
}

/// Occurrence queries and the occurrence mutation, scoped to one owner.
#[async_trait]
pub trait OccurrenceRepository {
    async fn occurrences_on(&self, owner: UserId, date: NaiveDate) -> Result<Vec<Occurrence>, CoreError>;
    /// Sorted by (date, task id). Fails if `end < start`.
    async fn occurrences_between(&self, owner: UserId, start: NaiveDate, end: NaiveDate) -> Result<Vec<Occurrence>, CoreError>;
    /// Pending and in-progress occurrences on `today`, sorted by (state, date).
    async fn occurrences_to_do(&self, owner: UserId, today: NaiveDate) -> Result<Vec<Occurrence>, CoreError>;
    async fn calendar(&self, owner: UserId, start: NaiveDate, end: NaiveDate) -> Result<CalendarView, CoreError>;
    async fn statistics(&self, owner: UserId, today: NaiveDate) -> Result<TaskStatistics, CoreError>;
    /// Replaces the recorded state of one occurrence and returns its
    /// resolved projection.
    async fn update_occurrence(&self, owner: UserId, update: OccurrenceUpdate) -> Result<Occurrence, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository: TaskRepository + StatusRecordRepository + OccurrenceRepository {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
    recurrence_manager: RecurrenceManager,
}

impl SqliteRepository {
    pub fn new(pool: DbPool, recurrence_manager: RecurrenceManager) -> Self {
        Self { pool, recurrence_manager }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn recurrence_manager(&self) -> &RecurrenceManager {
        &self.recurrence_manager
    }
}

impl Repository for SqliteRepository {}
