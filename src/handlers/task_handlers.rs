// src/handlers/task_handlers.rs
use super::Outcome;
use crate::{
    error::AppResult,
    models::task::{TaskForm, TaskStatus},
    services::task_service,
    state::AppState,
    views,
};

pub fn handle_create_task(state: &mut AppState, form: TaskForm) -> AppResult<Outcome> {
    let new_task = task_service::parse_task_form(&form)?;
    task_service::create_task(
        state,
        &new_task.title,
        new_task.project_id,
        new_task.description.as_deref(),
        Some(new_task.status),
    )?;
    Ok(Outcome::Tasks(views::task_board(state)))
}

pub fn handle_move_task(state: &mut AppState, task_id: &str, status: &str) -> AppResult<Outcome> {
    let status: TaskStatus = status.parse()?;
    task_service::move_task(state, task_id, status)?;
    Ok(Outcome::Tasks(views::task_board(state)))
}

pub fn handle_delete_task(state: &mut AppState, task_id: &str) -> AppResult<Outcome> {
    task_service::delete_task(state, task_id)?;
    Ok(Outcome::Tasks(views::task_board(state)))
}
