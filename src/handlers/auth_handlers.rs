// src/handlers/auth_handlers.rs
use super::Outcome;
use crate::{
    error::AppResult,
    models::user::{LoginForm, RegisterForm},
    services::auth_service,
    state::AppState,
    views,
};

// Login bem-sucedido leva ao dashboard
pub fn handle_login(state: &mut AppState, form: LoginForm) -> AppResult<Outcome> {
    auth_service::login(state, &form.email, &form.password)?;
    Ok(Outcome::Dashboard(views::dashboard_view(state)))
}

pub fn handle_register(state: &mut AppState, form: RegisterForm) -> AppResult<Outcome> {
    auth_service::register(state, &form.name, &form.email, &form.password)?;
    Ok(Outcome::Dashboard(views::dashboard_view(state)))
}

pub fn handle_logout(state: &mut AppState) -> AppResult<Outcome> {
    auth_service::logout(state)?;
    Ok(Outcome::Login)
}
