use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::AppError,
    notices::{dto::NoticeForm, repo_types::NoticeInput},
    state::AppState,
    views::{self, Audience},
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_list))
        .route("/users", get(users_list))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/new", get(new_form).post(create_notice))
        .route("/edit/:id", get(edit_form).patch(update_notice))
        .route("/delete/:id", get(delete_form).delete(delete_notice))
        .route("/interested/:id", post(mark_interested))
}

/// Ids come straight from the URL; anything non-numeric names no notice.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

#[instrument(skip(state))]
pub async fn admin_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let notices = state.store.list_notices().await?;
    Ok(views::notice_list(&notices, Audience::Admin))
}

#[instrument(skip(state))]
pub async fn users_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let notices = state.store.list_notices().await?;
    Ok(views::notice_list(&notices, Audience::Users))
}

pub async fn new_form() -> Html<String> {
    views::new_notice_page()
}

#[instrument(skip(state, form))]
pub async fn create_notice(
    State(state): State<AppState>,
    Form(form): Form<NoticeForm>,
) -> Result<Response, AppError> {
    let input = match NoticeInput::try_from(form) {
        Ok(input) => input,
        Err(bad) => {
            warn!(event_date = %bad.0, "unparseable event date");
            return Ok(Redirect::to("/new").into_response());
        }
    };
    let id = state.store.create_notice(&input).await?;
    info!(notice_id = id, "notice created");
    Ok(Redirect::to("/admin").into_response())
}

#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Redirect::to("/admin").into_response());
    };
    match state.store.get_notice(id).await? {
        Some(notice) => Ok(views::edit_notice_page(&notice).into_response()),
        None => Ok(Redirect::to("/admin").into_response()),
    }
}

#[instrument(skip(state, form))]
pub async fn update_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<NoticeForm>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Redirect::to("/admin").into_response());
    };
    let input = match NoticeInput::try_from(form) {
        Ok(input) => input,
        Err(bad) => {
            warn!(notice_id = id, event_date = %bad.0, "unparseable event date");
            return Ok(Redirect::to(&format!("/edit/{id}")).into_response());
        }
    };
    if state.store.update_notice(id, &input).await? {
        info!(notice_id = id, "notice updated");
    } else {
        warn!(notice_id = id, "update matched no notice");
    }
    Ok(Redirect::to("/admin").into_response())
}

#[instrument(skip(state))]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Redirect::to("/admin").into_response());
    };
    match state.store.get_notice(id).await? {
        Some(notice) => Ok(views::delete_notice_page(&notice).into_response()),
        None => Ok(Redirect::to("/admin").into_response()),
    }
}

#[instrument(skip(state))]
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Redirect::to("/admin"));
    };
    if state.store.delete_notice(id).await? {
        info!(notice_id = id, "notice deleted");
    }
    Ok(Redirect::to("/admin"))
}

/// Always lands on the users list, even when the store fails.
#[instrument(skip(state))]
pub async fn mark_interested(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    if let Some(id) = parse_id(&id) {
        match state.store.increment_interest(id).await {
            Ok(true) => info!(notice_id = id, "interest registered"),
            Ok(false) => warn!(notice_id = id, "interest for missing notice"),
            Err(e) => error!(error = %e, notice_id = id, "increment interest failed"),
        }
    }
    Redirect::to("/users")
}
