use crate::dashboard::{deactivate_trainers, load_overview};
use crate::errors::{AppError, ReportError};
use crate::format::{export_csv, export_filename, period_text};
use crate::models::{
    DashboardOverview, DeactivateRequest, DeactivateResponse, QuickPeriodResponse, ReportPayload,
};
use crate::period::{DateRange, Granularity, QuickPeriod, current_year, quick_period};
use crate::series::DisplayMode;
use crate::source::CSRF_HEADER;
use crate::state::AppState;
use crate::ui::{ChartTheme, render_index};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_VIEW: &str = "default";
const MAX_VIEW_ID_LEN: usize = 64;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub period: Option<String>,
    pub mode: Option<DisplayMode>,
    pub view: Option<String>,
}

impl ReportQuery {
    /// Dashboard view the request belongs to; each view keeps its own
    /// comparison baseline.
    pub fn view_id(&self) -> Result<&str, AppError> {
        let view = self
            .view
            .as_deref()
            .map(str::trim)
            .filter(|view| !view.is_empty())
            .unwrap_or(DEFAULT_VIEW);
        if view.len() > MAX_VIEW_ID_LEN {
            return Err(AppError::bad_request("view id is too long"));
        }
        Ok(view)
    }

    pub fn range(&self) -> Result<DateRange, ReportError> {
        if let Some(period) = self.period.as_deref() {
            return Ok(quick_period(period.parse::<QuickPeriod>()?));
        }
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => DateRange::parse(start, end),
            (None, None) => Ok(current_year()),
            _ => Err(ReportError::InvalidRange(
                "both start and end dates are required".to_string(),
            )),
        }
    }
}

pub async fn index() -> Html<String> {
    Html(render_index(&current_year(), &ChartTheme::default()))
}

pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportPayload>, AppError> {
    let range = query.range()?;
    let mode = query.mode.unwrap_or_default();
    let reports = state.reports.view(query.view_id()?);
    let payload = reports.load_report(range, mode).await?;
    Ok(Json(payload))
}

pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.range()?;
    let summary = state.reports.summary_for(&range).await?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&range));
    let disposition = HeaderValue::from_str(&disposition).map_err(AppError::internal)?;
    let body = export_csv(&range, &summary).map_err(AppError::internal)?;

    info!("exporting report {range}");
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn get_quick_period(Path(kind): Path<String>) -> Result<Json<QuickPeriodResponse>, AppError> {
    let range = quick_period(kind.parse::<QuickPeriod>()?);
    Ok(Json(QuickPeriodResponse {
        start: range.start_key(),
        end: range.end_key(),
        text: period_text(&range),
        granularity: Granularity::for_range(&range),
    }))
}

pub async fn get_overview(State(state): State<AppState>) -> Result<Json<DashboardOverview>, AppError> {
    let overview = load_overview(&state.client).await.inspect_err(|err| {
        error!("dashboard overview failed: {err}");
    })?;
    Ok(Json(overview))
}

pub async fn deactivate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DeactivateRequest>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let token = headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok());
    let response = deactivate_trainers(&state.client, &payload.trainer_ids, token).await?;
    Ok(Json(response))
}
