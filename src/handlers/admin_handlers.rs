// src/handlers/admin_handlers.rs
// Modal "Novo/Editar Usuário" do painel de administração.
use super::Outcome;
use crate::{
    error::AppResult,
    models::user::{Role, UserForm},
    services::user_service,
    state::AppState,
    views,
};

pub fn handle_create_user(state: &mut AppState, form: UserForm) -> AppResult<Outcome> {
    let role: Role = form.role.parse()?;
    let created = user_service::create_user(state, &form.name, &form.email, role, Some(form.password.as_str()))?;
    Ok(Outcome::UserCreated {
        dashboard: views::dashboard_view(state),
        temporary_password: created.temporary_password,
    })
}

pub fn handle_edit_user(state: &mut AppState, user_id: &str, form: UserForm) -> AppResult<Outcome> {
    let role: Role = form.role.parse()?;
    // Campo de senha vazio = manter a atual
    user_service::update_user(state, user_id, &form.name, &form.email, role, Some(form.password.as_str()))?;
    Ok(Outcome::Dashboard(views::dashboard_view(state)))
}

pub fn handle_delete_user(state: &mut AppState, user_id: &str) -> AppResult<Outcome> {
    user_service::delete_user(state, user_id)?;
    Ok(Outcome::Dashboard(views::dashboard_view(state)))
}
