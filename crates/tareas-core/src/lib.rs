//! # Tareas Core Library
//!
//! Task management with recurring tasks whose dated occurrences carry their
//! own completion state.
//!
//! ## Features
//!
//! - **Interval Recurrence**: daily, weekly, monthly and custom-day rules
//!   with an optional end date, expanded on demand into calendar dates
//! - **Per-Date State**: each occurrence is pending, in progress or completed,
//!   independently of the others
//! - **Bounded Walks**: every recurrence walk is capped by a configurable
//!   safety limit
//! - **Atomic Updates**: occurrence state changes run in one transaction
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`recurrence`]: Recurrence stepping and range expansion
//! - [`occurrences`]: Occurrence state resolution, views and statistics
//! - [`repository`]: Data access layer with Repository pattern
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use tareas_core::{
//!     db, models::{NewTaskData, Recurrence},
//!     recurrence::RecurrenceManager,
//!     repository::{OccurrenceRepository, SqliteRepository, TaskRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("tareas.db").await?;
//!     let repo = SqliteRepository::new(pool, RecurrenceManager::with_defaults());
//!
//!     let owner = 1;
//!     repo.add_task(owner, NewTaskData {
//!         title: "Weekly review".to_string(),
//!         due_date: NaiveDate::from_ymd_opt(2024, 1, 1),
//!         recurrence: Recurrence::Weekly,
//!         ..Default::default()
//!     }).await?;
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//!     for occurrence in repo.occurrences_between(owner, start, end).await? {
//!         println!("{} {} {}", occurrence.date, occurrence.title, occurrence.state);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod occurrences;
pub mod recurrence;
pub mod repository;
