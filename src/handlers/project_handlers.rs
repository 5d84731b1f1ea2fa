// src/handlers/project_handlers.rs
use super::Outcome;
use crate::{
    error::AppResult,
    models::project::ProjectForm,
    services::project_service,
    state::AppState,
    views,
};

// Depois de gravar, a grelha volta sem filtros
fn projects_view(state: &AppState) -> Outcome {
    Outcome::Projects(views::project_cards(state, "", None))
}

pub fn handle_create_project(state: &mut AppState, form: ProjectForm) -> AppResult<Outcome> {
    let fields = project_service::parse_project_form(&form)?;
    project_service::create_project(state, None, fields)?;
    Ok(projects_view(state))
}

pub fn handle_update_project(state: &mut AppState, project_id: i64, form: ProjectForm) -> AppResult<Outcome> {
    let fields = project_service::parse_project_form(&form)?;
    project_service::update_project(state, project_id, fields)?;
    Ok(projects_view(state))
}

pub fn handle_delete_project(state: &mut AppState, project_id: i64) -> AppResult<Outcome> {
    project_service::delete_project(state, project_id)?;
    Ok(projects_view(state))
}
