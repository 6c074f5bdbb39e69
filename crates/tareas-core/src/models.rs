use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;

pub type TaskId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum Category {
    #[serde(rename = "trabajo", alias = "work")]
    Work,
    #[serde(rename = "estudio", alias = "study")]
    Study,
    #[default]
    #[serde(rename = "personal")]
    Personal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Personal => "personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task category: {0}")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" | "trabajo" => Ok(Category::Work),
            "study" | "estudio" => Ok(Category::Study),
            "personal" => Ok(Category::Personal),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// State of a task or of one of its occurrences.
///
/// Variant order matters: the "today" view sorts pending before in-progress.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
    sqlx::Type,
)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pendiente", alias = "pending")]
    Pending,
    #[serde(rename = "en_proceso", alias = "in_progress")]
    InProgress,
    #[serde(rename = "completada", alias = "completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// The status record kind that represents this state, if any.
    /// Pending is the absence of both records.
    pub fn record_kind(&self) -> Option<StatusKind> {
        match self {
            TaskStatus::Pending => None,
            TaskStatus::InProgress => Some(StatusKind::InProgress),
            TaskStatus::Completed => Some(StatusKind::Completed),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(TaskStatus::Pending),
            "in_progress" | "en_proceso" => Ok(TaskStatus::InProgress),
            "completed" | "completada" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    #[serde(rename = "ninguna", alias = "none")]
    None,
    #[serde(rename = "diaria", alias = "daily")]
    Daily,
    #[serde(rename = "semanal", alias = "weekly")]
    Weekly,
    #[serde(rename = "mensual", alias = "monthly")]
    Monthly,
    #[serde(rename = "personalizada", alias = "custom")]
    Custom,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Custom => "custom",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence: {0}")]
pub struct ParseRecurrenceError(String);

impl FromStr for Recurrence {
    type Err = ParseRecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "ninguna" => Ok(Recurrence::None),
            "daily" | "diaria" => Ok(Recurrence::Daily),
            "weekly" | "semanal" => Ok(Recurrence::Weekly),
            "monthly" | "mensual" => Ok(Recurrence::Monthly),
            "custom" | "personalizada" => Ok(Recurrence::Custom),
            _ => Err(ParseRecurrenceError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    #[serde(rename = "id_tarea")]
    pub id: TaskId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Only meaningful for non-recurring tasks; recurring tasks keep their
    /// per-date state in status records.
    #[serde(rename = "estado")]
    pub status: TaskStatus,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    /// Due date, or the anchor date of the recurrence.
    #[serde(rename = "fecha_entrega")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "repeticion")]
    pub recurrence: Recurrence,
    #[serde(rename = "intervalo_repeticion")]
    pub recurrence_interval: i64,
    #[serde(rename = "fecha_fin_repeticion")]
    pub recurrence_end_date: Option<NaiveDate>,
    #[serde(rename = "activa")]
    pub active: bool,
    #[serde(rename = "creado_por")]
    pub owner_id: UserId,
}

impl Task {
    #[inline]
    pub fn is_recurring(&self) -> bool {
        self.recurrence != Recurrence::None
    }

    /// Recurrence step, with non-positive values normalized to 1.
    #[inline]
    pub fn interval(&self) -> u32 {
        u32::try_from(self.recurrence_interval.max(1)).unwrap_or(u32::MAX)
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            description: None,
            category: Category::default(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            due_date: None,
            recurrence: Recurrence::None,
            recurrence_interval: 1,
            recurrence_end_date: None,
            active: true,
            owner_id: 0,
        }
    }
}

/// A task as listed to its owner, with its next upcoming occurrence.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskSummary {
    #[serde(flatten)]
    pub task: Task,
    #[serde(rename = "proxima_ocurrencia")]
    pub next_occurrence: Option<NaiveDate>,
}

fn default_interval() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTaskData {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Category,
    #[serde(rename = "fecha_entrega", default)]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "repeticion", default)]
    pub recurrence: Recurrence,
    #[serde(rename = "intervalo_repeticion", default = "default_interval")]
    pub recurrence_interval: i64,
    #[serde(rename = "fecha_fin_repeticion", default)]
    pub recurrence_end_date: Option<NaiveDate>,
}

impl Default for NewTaskData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            category: Category::default(),
            due_date: None,
            recurrence: Recurrence::None,
            recurrence_interval: 1,
            recurrence_end_date: None,
        }
    }
}

/// Partial update of a task. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskData {
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "descripcion", default, with = "serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(rename = "categoria", default)]
    pub category: Option<Category>,
    #[serde(rename = "estado", default)]
    pub status: Option<TaskStatus>,
    #[serde(rename = "fecha_entrega", default, with = "serde_with::rust::double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(rename = "repeticion", default)]
    pub recurrence: Option<Recurrence>,
    #[serde(rename = "intervalo_repeticion", default)]
    pub recurrence_interval: Option<i64>,
    #[serde(rename = "fecha_fin_repeticion", default, with = "serde_with::rust::double_option")]
    pub recurrence_end_date: Option<Option<NaiveDate>>,
}

/// The two persisted per-date states. Pending has no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Completed,
    InProgress,
}

impl StatusKind {
    pub const ALL: [StatusKind; 2] = [StatusKind::Completed, StatusKind::InProgress];

    pub(crate) fn table(&self) -> &'static str {
        match self {
            StatusKind::Completed => "completed_occurrences",
            StatusKind::InProgress => "in_progress_occurrences",
        }
    }
}

impl From<StatusKind> for TaskStatus {
    fn from(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Completed => TaskStatus::Completed,
            StatusKind::InProgress => TaskStatus::InProgress,
        }
    }
}

/// A persisted fact that a task reached a state on a given date.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StatusRecord {
    pub task_id: TaskId,
    pub occurrence_date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Raw body of an occurrence update, before validation.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OccurrenceUpdateRequest {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub tarea_id: Option<TaskId>,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
}

/// A validated occurrence update.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceUpdate {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub state: TaskStatus,
    pub notes: Option<String>,
}

impl OccurrenceUpdateRequest {
    /// Checks presence and format of every field. Ownership and membership of
    /// the date in the task's occurrence set are checked against the store.
    pub fn validate(self) -> Result<OccurrenceUpdate, CoreError> {
        let (Some(task_id), Some(date), Some(state)) = (
            self.tarea_id.filter(|id| *id != 0),
            self.fecha.filter(|s| !s.trim().is_empty()),
            self.estado.filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(CoreError::InvalidInput(
                "tarea_id, fecha and estado are required".to_string(),
            ));
        };

        let state = state
            .parse::<TaskStatus>()
            .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
        let date = parse_date(&date)?;

        Ok(OccurrenceUpdate {
            task_id,
            date,
            state,
            notes: self.notas.filter(|n| !n.is_empty()),
        })
    }
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidInput(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}
