use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::{
    AppState,
    error::ApiError,
    models::{
        Branch, BranchInfo, Day, LeadForm, ScheduleView, SelectionState, SubmissionReceipt,
        TrainingTypeInfo, TypeFilter,
    },
    schedule::{build_schedule, filter_classes, sort_by_start},
    validation::validate_lead,
};

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub day: Option<Day>,
    pub branch: Option<Branch>,
    #[serde(rename = "type")]
    pub filter: Option<TypeFilter>,
}

impl ScheduleQuery {
    /// Starts from the default selection and applies each given axis.
    pub fn selection(&self) -> SelectionState {
        let mut selection = SelectionState::default();
        if let Some(day) = self.day {
            selection.select_day(day);
        }
        if let Some(branch) = self.branch {
            selection.select_branch(branch);
        }
        if let Some(filter) = self.filter {
            selection.select_filter(filter);
        }
        selection
    }
}

/// The calendar covers the whole week, so there is no `day` parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeekQuery {
    pub branch: Option<Branch>,
    #[serde(rename = "type")]
    pub filter: Option<TypeFilter>,
}

impl WeekQuery {
    pub fn selection(&self) -> SelectionState {
        ScheduleQuery {
            day: None,
            branch: self.branch,
            filter: self.filter,
        }
        .selection()
    }
}

#[utoipa::path(get, path = "/", tag = "studio")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "MA TEAM Studio Timetable API",
        "endpoints": {
            "/branches": "Studio branches with address and opening hours",
            "/training-types": "Training disciplines offered",
            "/schedule": "Classes for a day, branch and training type",
            "/schedule.ical": "Download the branch week as iCal file",
            "/leads": "Register for a trial class"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "studio")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "studio")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/branches",
    responses((status = 200, description = "All branches", body = [BranchInfo])),
    tag = "studio"
)]
pub async fn list_branches(State(state): State<AppState>) -> Json<Vec<BranchInfo>> {
    Json(state.catalog.branches.clone())
}

#[utoipa::path(
    get,
    path = "/branches/{branch}",
    params(("branch" = Branch, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch details", body = BranchInfo),
        (status = 400, description = "Unknown branch id"),
        (status = 404, description = "Branch has no published details")
    ),
    tag = "studio"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    Path(branch): Path<Branch>,
) -> Result<Json<BranchInfo>, ApiError> {
    state
        .catalog
        .branch(branch)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No details for branch {branch}")))
}

#[utoipa::path(
    get,
    path = "/training-types",
    responses((status = 200, description = "Training disciplines", body = [TrainingTypeInfo])),
    tag = "studio"
)]
pub async fn list_training_types(State(state): State<AppState>) -> Json<Vec<TrainingTypeInfo>> {
    Json(state.catalog.training_types.clone())
}

#[utoipa::path(
    get,
    path = "/schedule",
    params(
        ("day" = Option<Day>, Query, description = "Day of week, defaults to sunday"),
        ("branch" = Option<Branch>, Query, description = "Branch, defaults to tel-aviv"),
        ("type" = Option<String>, Query, description = "all | pilates | yoga | functional, defaults to all")
    ),
    responses(
        (status = 200, description = "Classes sorted by start time, possibly empty", body = ScheduleView),
        (status = 400, description = "Unknown day, branch or type")
    ),
    tag = "schedule"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduleView>, ApiError> {
    let selection = query.selection();
    let view = build_schedule(
        &state.catalog.classes,
        &selection,
        &state.settings.booking_url,
    )?;
    debug!(
        day = %selection.day,
        branch = %selection.branch,
        filter = %selection.filter,
        classes = view.classes.len(),
        "schedule built"
    );
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/schedule.ical",
    params(
        ("branch" = Option<Branch>, Query, description = "Branch, defaults to tel-aviv"),
        ("type" = Option<String>, Query, description = "all | pilates | yoga | functional, defaults to all")
    ),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 400, description = "Unknown branch, type or parameter"),
        (status = 404, description = "No classes found")
    ),
    tag = "schedule"
)]
pub async fn get_schedule_ical(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut selection = query.selection();
    let branch = state.catalog.branch(selection.branch).ok_or_else(|| {
        ApiError::NotFound(format!("No details for branch {}", selection.branch))
    })?;

    let mut classes = Vec::new();
    for day in Day::ALL {
        selection.select_day(day);
        let mut day_classes = filter_classes(&state.catalog.classes, &selection);
        sort_by_start(&mut day_classes);
        classes.extend(day_classes);
    }

    if classes.is_empty() {
        return Err(ApiError::NotFound("No classes found".into()));
    }

    let week_start = state.exporter.week_start(Utc::now());
    let body = state.exporter.generate(
        &classes,
        branch,
        week_start,
        state.settings.booking_url.as_str(),
    );
    let disposition = format!(
        "attachment; filename=studio_timetable_{}.ics",
        selection.branch
    );
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar".to_string()),
            ("content-disposition", disposition),
        ],
        body,
    ))
}

#[utoipa::path(
    post,
    path = "/leads",
    request_body = LeadForm,
    responses(
        (status = 202, description = "Registration received", body = SubmissionReceipt),
        (status = 400, description = "Invalid form field")
    ),
    tag = "leads"
)]
pub async fn submit_lead(
    State(state): State<AppState>,
    Json(form): Json<LeadForm>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = validate_lead(form)?;
    let receipt = state.leads.submit(&lead).await?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

#[cfg(test)]
mod tests {
    use crate::models::TrainingType;

    use super::*;

    #[test]
    fn test_empty_query_gives_default_selection() {
        assert_eq!(ScheduleQuery::default().selection(), SelectionState::default());
    }

    #[test]
    fn test_query_overrides_only_given_axes() {
        let query = ScheduleQuery {
            branch: Some(Branch::Ashdod),
            filter: Some(TypeFilter::Only(TrainingType::Yoga)),
            ..ScheduleQuery::default()
        };
        let selection = query.selection();
        assert_eq!(selection.day, Day::Sunday);
        assert_eq!(selection.branch, Branch::Ashdod);
        assert_eq!(selection.filter, TypeFilter::Only(TrainingType::Yoga));
    }
}
