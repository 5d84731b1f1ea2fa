// src/views.rs
//! Modelos de vista: funções puras do estado para aquilo que o front end desenha.
//! Nada aqui escreve no armazenamento.
use crate::{
    models::{project::ProjectStatus, task::TaskStatus, user::User},
    services::{
        auth_service::{self, Visibility},
        dashboard_service::{self, ProjectStats},
        project_service, task_service,
    },
    state::AppState,
};
use serde::Serialize;

/// Rótulo usado quando o projeto da tarefa já não existe.
pub const NO_PROJECT_LABEL: &str = "Sem Projeto";

/// Texto da opção única do select quando ainda não há projetos.
pub const NO_PROJECTS_OPTION: &str = "Crie um projeto primeiro";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub name: String,
    pub role_label: &'static str,
    pub avatar: String,
}

pub fn header(user: &User) -> HeaderView {
    HeaderView {
        name: user.name.clone(),
        role_label: user.role.label(),
        avatar: user.initial(),
    }
}

// --- Dashboard ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    // A linha do próprio admin não tem ações (mostra "Você")
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum DashboardPanel {
    AdminUsers { rows: Vec<UserRow> },
    Welcome { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub header: Option<HeaderView>,
    pub visibility: Visibility,
    pub user_count: usize,
    pub stats: ProjectStats,
    pub chart: Vec<ChartBar>,
    pub panel: Option<DashboardPanel>,
}

pub fn dashboard_view(state: &AppState) -> DashboardView {
    let current = auth_service::current_user(state);
    let visibility = auth_service::visibility(current);
    let stats = dashboard_service::project_stats(state);

    let chart = ProjectStatus::ALL
        .iter()
        .map(|s| ChartBar { label: s.label(), value: stats.count(*s) })
        .collect();

    let panel = current.map(|me| {
        if visibility.show_admin_panel {
            let rows = state
                .users()
                .iter()
                .map(|u| UserRow {
                    id: u.id.clone(),
                    name: u.name.clone(),
                    email: u.email.clone(),
                    role: u.role.to_string(),
                    is_self: u.id == me.id,
                })
                .collect();
            DashboardPanel::AdminUsers { rows }
        } else {
            DashboardPanel::Welcome { name: me.name.clone() }
        }
    });

    DashboardView {
        header: current.map(header),
        visibility,
        user_count: dashboard_service::user_count(state),
        stats,
        chart,
        panel,
    }
}

// --- Projetos ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Blue,
    Yellow,
    Green,
}

impl From<ProjectStatus> for BadgeTone {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Ativo => BadgeTone::Blue,
            ProjectStatus::Pendente => BadgeTone::Yellow,
            ProjectStatus::Concluido => BadgeTone::Green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    pub id: i64,
    pub title: String,
    pub institution: String,
    pub objective: String,
    pub status: &'static str,
    pub badge: BadgeTone,
    // dd/mm/aaaa, vazio se não houver data de início
    pub start_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectList {
    pub cards: Vec<ProjectCard>,
    pub is_empty: bool,
}

pub fn project_cards(state: &AppState, search: &str, status: Option<ProjectStatus>) -> ProjectList {
    let cards: Vec<ProjectCard> = project_service::list_projects(state, search, status)
        .map(|p| ProjectCard {
            id: p.id,
            title: p.title.clone(),
            institution: p.institution.clone(),
            objective: p.objective.clone(),
            status: p.status.label(),
            badge: p.status.into(),
            start_date: p
                .start_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
        })
        .collect();
    let is_empty = cards.is_empty();
    ProjectList { cards, is_empty }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOption {
    pub id: i64,
    pub title: String,
}

/// Select de projeto do formulário de tarefa. Sem projetos, `placeholder`
/// traz o texto da única opção (desativada) a mostrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOptions {
    pub options: Vec<ProjectOption>,
    pub placeholder: Option<&'static str>,
}

pub fn project_options(state: &AppState) -> ProjectOptions {
    let options: Vec<ProjectOption> = state
        .projects()
        .iter()
        .map(|p| ProjectOption { id: p.id, title: p.title.clone() })
        .collect();
    let placeholder = options.is_empty().then_some(NO_PROJECTS_OPTION);
    ProjectOptions { options, placeholder }
}

// --- Quadro de tarefas ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Back,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskMove {
    pub target: TaskStatus,
    pub direction: MoveDirection,
    pub title: &'static str,
}

/// Botões de mover que o cartão oferece. O `move_task` em si aceita qualquer transição.
pub fn available_moves(status: TaskStatus) -> Vec<TaskMove> {
    let mut moves = Vec::new();
    if status != TaskStatus::Todo {
        moves.push(TaskMove {
            target: TaskStatus::Todo,
            direction: MoveDirection::Back,
            title: "Mover para Fazer",
        });
    }
    match status {
        TaskStatus::Todo => moves.push(TaskMove {
            target: TaskStatus::InProgress,
            direction: MoveDirection::Forward,
            title: "Mover para Progresso",
        }),
        TaskStatus::InProgress => moves.push(TaskMove {
            target: TaskStatus::Done,
            direction: MoveDirection::Forward,
            title: "Mover para Concluído",
        }),
        TaskStatus::Done => moves.push(TaskMove {
            target: TaskStatus::InProgress,
            direction: MoveDirection::Back,
            title: "Voltar para Progresso",
        }),
    }
    moves
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    pub id: String,
    pub title: String,
    pub project_label: String,
    pub description: String,
    pub moves: Vec<TaskMove>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskColumn {
    pub status: TaskStatus,
    pub label: &'static str,
    pub count: usize,
    pub cards: Vec<TaskCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBoard {
    pub columns: Vec<TaskColumn>,
}

impl TaskBoard {
    pub fn column(&self, status: TaskStatus) -> Option<&TaskColumn> {
        self.columns.iter().find(|c| c.status == status)
    }
}

pub fn task_board(state: &AppState) -> TaskBoard {
    let groups = task_service::list_tasks(state);

    let columns = groups
        .groups
        .iter()
        .map(|group| TaskColumn {
            status: group.status,
            label: group.status.label(),
            count: group.count(),
            cards: group
                .tasks
                .iter()
                .map(|t| TaskCard {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    project_label: t
                        .project_id
                        .and_then(|pid| project_service::find_project(state, pid))
                        .map(|p| p.title.clone())
                        .unwrap_or_else(|| NO_PROJECT_LABEL.to_string()),
                    description: t.description.clone().unwrap_or_default(),
                    moves: available_moves(t.status),
                })
                .collect(),
        })
        .collect();

    TaskBoard { columns }
}
