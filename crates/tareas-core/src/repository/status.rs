use crate::error::CoreError;
use crate::models::{StatusKind, StatusRecord, Task, TaskId, TaskStatus};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, Transaction};

#[async_trait]
impl super::StatusRecordRepository for SqliteRepository {
    async fn find_status_records(
        &self,
        kind: StatusKind,
        task_ids: &[TaskId],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StatusRecord>, CoreError> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT task_id, occurrence_date, recorded_at, notes FROM {} WHERE occurrence_date >= ",
            kind.table()
        ));
        query_builder.push_bind(start);
        query_builder.push(" AND occurrence_date <= ");
        query_builder.push_bind(end);
        query_builder.push(" AND task_id IN (");
        let mut separated = query_builder.separated(", ");
        for id in task_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let records = query_builder.build_query_as().fetch_all(self.pool()).await?;
        Ok(records)
    }
}

impl SqliteRepository {
    /// Deletes the record of `kind` for one occurrence within an existing transaction
    pub(crate) async fn delete_status_record_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        kind: StatusKind,
        task_id: TaskId,
        date: NaiveDate,
    ) -> Result<u64, CoreError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE task_id = $1 AND occurrence_date = $2",
            kind.table()
        ))
        .bind(task_id)
        .bind(date)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Inserts a record of `kind` for one occurrence within an existing transaction
    pub(crate) async fn insert_status_record_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        kind: StatusKind,
        task_id: TaskId,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<(), CoreError> {
        sqlx::query(&format!(
            "INSERT INTO {} (task_id, occurrence_date, recorded_at, notes) VALUES ($1, $2, $3, $4)",
            kind.table()
        ))
        .bind(task_id)
        .bind(date)
        .bind(Utc::now())
        .bind(notes)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Replaces the recorded state of one occurrence.
    ///
    /// Both records for the date are removed before the new one, if any, is
    /// written, so at most one of them exists afterwards. A non-recurring
    /// task's own status is kept in step with its single occurrence. This is
    /// the only place where that mirror is written.
    pub(crate) async fn replace_occurrence_status_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        task: &Task,
        date: NaiveDate,
        state: TaskStatus,
        notes: Option<&str>,
    ) -> Result<(), CoreError> {
        let mut removed = 0;
        for kind in StatusKind::ALL {
            removed += Self::delete_status_record_in_transaction(tx, kind, task.id, date).await?;
        }
        tracing::debug!(task_id = task.id, %date, removed, "cleared occurrence status records");

        if let Some(kind) = state.record_kind() {
            Self::insert_status_record_in_transaction(tx, kind, task.id, date, notes).await?;
        }

        if !task.is_recurring() {
            Self::update_task_status_in_transaction(tx, task.id, state).await?;
        }

        Ok(())
    }
}
