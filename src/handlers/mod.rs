// src/handlers/mod.rs
//! Fronteira com a camada de apresentação: comandos com valores crus de
//! formulário entram, vistas atualizadas (ou uma mensagem de erro) saem.
pub mod admin_handlers;
pub mod auth_handlers;
pub mod project_handlers;
pub mod task_handlers;

use crate::{
    error::{AppError, AppResult},
    models::{
        project::ProjectForm,
        task::TaskForm,
        user::{LoginForm, RegisterForm, UserForm},
    },
    services::{auth_service, project_service},
    state::AppState,
    views::{self, DashboardView, ProjectList, TaskBoard},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Dashboard,
    Projects,
    Tasks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Login(LoginForm),
    Register(RegisterForm),
    Logout,
    Navigate {
        view: ViewId,
        // Filtros da lista de projetos (ignorados nas outras vistas)
        #[serde(default)]
        search: String,
        #[serde(default)]
        status: String,
    },
    CreateUser(UserForm),
    UpdateUser { id: String, form: UserForm },
    DeleteUser { id: String },
    CreateProject(ProjectForm),
    UpdateProject { id: i64, form: ProjectForm },
    DeleteProject { id: i64 },
    CreateTask(TaskForm),
    MoveTask { id: String, status: String },
    DeleteTask { id: String },
}

/// Nível de acesso exigido por cada comando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Command {
    pub fn access(&self) -> Access {
        match self {
            Command::Login(_) | Command::Register(_) | Command::Logout => Access::Public,
            Command::CreateUser(_) | Command::UpdateUser { .. } | Command::DeleteUser { .. } => {
                Access::Admin
            }
            _ => Access::Authenticated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Outcome {
    Login,
    Dashboard(DashboardView),
    Projects(ProjectList),
    Tasks(TaskBoard),
    // Criação pelo admin sem senha: mostrar a senha gerada uma única vez
    UserCreated {
        dashboard: DashboardView,
        temporary_password: Option<String>,
    },
}

/// Resposta final para o front end: a vista ou a mensagem inline do erro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { outcome: Outcome },
    Error { message: String },
}

/// Aplica os guards e encaminha o comando para o handler.
pub fn dispatch(state: &mut AppState, command: Command) -> AppResult<Outcome> {
    match command.access() {
        Access::Public => {}
        Access::Authenticated => {
            auth_service::require_auth(state)?;
        }
        Access::Admin => {
            auth_service::require_admin(state)?;
        }
    }

    match command {
        Command::Login(form) => auth_handlers::handle_login(state, form),
        Command::Register(form) => auth_handlers::handle_register(state, form),
        Command::Logout => auth_handlers::handle_logout(state),
        Command::Navigate { view, search, status } => navigate(state, view, &search, &status),
        Command::CreateUser(form) => admin_handlers::handle_create_user(state, form),
        Command::UpdateUser { id, form } => admin_handlers::handle_edit_user(state, &id, form),
        Command::DeleteUser { id } => admin_handlers::handle_delete_user(state, &id),
        Command::CreateProject(form) => project_handlers::handle_create_project(state, form),
        Command::UpdateProject { id, form } => project_handlers::handle_update_project(state, id, form),
        Command::DeleteProject { id } => project_handlers::handle_delete_project(state, id),
        Command::CreateTask(form) => task_handlers::handle_create_task(state, form),
        Command::MoveTask { id, status } => task_handlers::handle_move_task(state, &id, &status),
        Command::DeleteTask { id } => task_handlers::handle_delete_task(state, &id),
    }
}

/// Como `dispatch`, mas converte o erro na mensagem mostrada junto ao formulário.
pub fn respond(state: &mut AppState, command: Command) -> Response {
    match dispatch(state, command) {
        Ok(outcome) => Response::Ok { outcome },
        Err(e) => {
            if e.is_internal() {
                tracing::error!("Erro processado: {:?}", e);
            } else {
                tracing::warn!("Comando recusado: {}", e);
            }
            Response::Error { message: e.user_message() }
        }
    }
}

/// Troca de ecrã: devolve a vista pedida já calculada.
pub fn navigate(state: &AppState, view: ViewId, search: &str, status: &str) -> AppResult<Outcome> {
    tracing::debug!("Navegando para {:?}", view);
    Ok(match view {
        ViewId::Dashboard => Outcome::Dashboard(views::dashboard_view(state)),
        ViewId::Projects => {
            let filter = project_service::parse_status_filter(status)?;
            Outcome::Projects(views::project_cards(state, search, filter))
        }
        ViewId::Tasks => Outcome::Tasks(views::task_board(state)),
    })
}

/// Ecrã inicial: dashboard se houver sessão, senão login.
pub fn landing(state: &AppState) -> Outcome {
    match auth_service::current_user(state) {
        Some(_) => Outcome::Dashboard(views::dashboard_view(state)),
        None => Outcome::Login,
    }
}

// Erro de parse de comando vindo em JSON (ex.: front end web)
pub fn parse_command(json: &str) -> AppResult<Command> {
    serde_json::from_str(json).map_err(AppError::from)
}
