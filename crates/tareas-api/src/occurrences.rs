//! Handlers for occurrence views and the occurrence update.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tareas/ocurrencias_por_fecha` | `?fecha`, default today |
//! | `GET`  | `/tareas/ocurrencias_rango` | `?fecha_inicio&fecha_fin`, both default today |
//! | `GET`  | `/tareas/ocurrencias_hoy` | Pending and in-progress occurrences of today |
//! | `GET`  | `/tareas/estadisticas` | Per-state counts |
//! | `GET`  | `/tareas/calendario` | `?fecha_inicio&fecha_fin`, both required |
//! | `POST` | `/tareas/actualizar_ocurrencia` | Body: [`OccurrenceUpdateRequest`] |

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tareas_core::models::{parse_date, OccurrenceUpdateRequest};
use tareas_core::occurrences::{CalendarView, Occurrence, TaskStatistics};
use tareas_core::repository::Repository;

use crate::{
    error::{ApiError, ApiJson},
    today, AppState, CurrentUser,
};

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub fecha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
}

/// Parses an optional query date, falling back to `default` when absent or blank.
fn date_or(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(parse_date(v)?),
        None => Ok(default),
    }
}

fn required_date(value: Option<&str>, name: &str) -> Result<NaiveDate, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))?;
    Ok(parse_date(value)?)
}

/// `GET /tareas/ocurrencias_por_fecha[?fecha=YYYY-MM-DD]`
pub async fn by_date<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    Query(params): Query<DateParams>,
) -> Result<Json<Vec<Occurrence>>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let date = date_or(params.fecha.as_deref(), today())?;
    let occurrences = state.repo.occurrences_on(owner, date).await?;
    Ok(Json(occurrences))
}

/// `GET /tareas/ocurrencias_rango[?fecha_inicio=...][&fecha_fin=...]`
pub async fn range<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Occurrence>>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let now = today();
    let start = date_or(params.fecha_inicio.as_deref(), now)?;
    let end = date_or(params.fecha_fin.as_deref(), now)?;

    let occurrences = state.repo.occurrences_between(owner, start, end).await?;
    Ok(Json(occurrences))
}

/// `GET /tareas/ocurrencias_hoy`
pub async fn to_do<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
) -> Result<Json<Vec<Occurrence>>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let occurrences = state.repo.occurrences_to_do(owner, today()).await?;
    Ok(Json(occurrences))
}

/// `GET /tareas/estadisticas`
pub async fn statistics<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
) -> Result<Json<TaskStatistics>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let stats = state.repo.statistics(owner, today()).await?;
    Ok(Json(stats))
}

/// `GET /tareas/calendario?fecha_inicio=...&fecha_fin=...`
pub async fn calendar<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<CalendarView>, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let start = required_date(params.fecha_inicio.as_deref(), "fecha_inicio")?;
    let end = required_date(params.fecha_fin.as_deref(), "fecha_fin")?;

    let view = state.repo.calendar(owner, start, end).await?;
    Ok(Json(view))
}

/// `POST /tareas/actualizar_ocurrencia`: returns `{mensaje, ocurrencia}`.
pub async fn update<R>(
    State(state): State<AppState<R>>,
    CurrentUser(owner): CurrentUser,
    ApiJson(body): ApiJson<OccurrenceUpdateRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: Repository + Send + Sync + 'static,
{
    let update = body.validate()?;
    let occurrence = state.repo.update_occurrence(owner, update).await?;

    Ok(Json(json!({
        "mensaje": "Ocurrencia actualizada",
        "ocurrencia": occurrence,
    })))
}
