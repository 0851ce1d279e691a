use axum::{
    Extension, Json,
    extract::{Query, State},
    response::Html,
};
use chrono::{Datelike, NaiveDate};

use crate::{
    dto::report::{AnnualReportQuery, MonthlyReportQuery, ReportsPageQuery},
    error::{ApiResult, AppError, PageResult},
    state::AppState,
    usecases::{
        report::{self, AnnualReport, MonthlyReport},
        session::Session,
    },
    utils::{local_today, month_start, parse_reference_month},
    views,
};

fn resolve_month(state: &AppState, month: Option<&str>) -> Result<NaiveDate, AppError> {
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => parse_reference_month(month)
            .ok_or_else(|| AppError::validation("Mês inválido (use AAAA-MM)")),
        None => Ok(month_start(local_today(state.config.utc_offset_hours))),
    }
}

fn check_year(year: i32) -> Result<i32, AppError> {
    report::year_range(year)
        .map(|_| year)
        .ok_or_else(|| AppError::validation("Ano inválido"))
}

async fn annual(state: &AppState, year: Option<i32>) -> Result<AnnualReport, AppError> {
    let year = check_year(year.unwrap_or_else(|| local_today(state.config.utc_offset_hours).year()))?;

    report::annual(&state.db, year)
        .await?
        .ok_or_else(|| AppError::validation("Ano inválido"))
}

pub async fn get_monthly_json(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
) -> ApiResult<Json<MonthlyReport>> {
    let month = resolve_month(&state, query.month.as_deref())?;

    Ok(Json(report::monthly(&state.db, month).await?))
}

pub async fn get_annual_json(
    State(state): State<AppState>,
    Query(query): Query<AnnualReportQuery>,
) -> ApiResult<Json<AnnualReport>> {
    Ok(Json(annual(&state, query.year).await?))
}

pub async fn get_reports(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ReportsPageQuery>,
) -> PageResult<Html<String>> {
    let month = resolve_month(&state, query.month.as_deref())?;
    let year = check_year(query.year.unwrap_or_else(|| month.year()))?;

    let (monthly, yearly) = tokio::try_join!(
        report::monthly(&state.db, month),
        report::annual(&state.db, year),
    )?;
    let yearly = yearly.ok_or_else(|| AppError::validation("Ano inválido"))?;

    Ok(Html(views::reports::render(&session, &monthly, &yearly)))
}
