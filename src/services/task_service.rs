// src/services/task_service.rs
use crate::{
    db::Collection,
    error::{AppError, AppResult},
    models::task::{Task, TaskForm, TaskStatus},
    services::{optional, required},
    state::AppState,
};
use chrono::Utc;
use uuid::Uuid;

/// Campos validados para uma nova tarefa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub project_id: Option<i64>,
    pub description: Option<String>,
    pub status: TaskStatus,
}

pub fn parse_task_form(form: &TaskForm) -> AppResult<NewTask> {
    let project_id = match form.project_id.trim() {
        "" => None,
        raw => Some(raw.parse::<i64>().map_err(|_| AppError::InvalidField {
            field: "projectId",
            value: raw.to_string(),
        })?),
    };
    let status = match form.status.trim() {
        "" => TaskStatus::default(),
        raw => raw.parse()?,
    };

    Ok(NewTask {
        title: required("title", &form.title)?,
        project_id,
        description: optional(Some(form.description.as_str())),
        status,
    })
}

pub fn find_task<'a>(state: &'a AppState, task_id: &str) -> Option<&'a Task> {
    state.tasks().iter().find(|t| t.id == task_id)
}

pub fn create_task(
    state: &mut AppState,
    title: &str,
    project_id: Option<i64>,
    description: Option<&str>,
    status: Option<TaskStatus>,
) -> AppResult<Task> {
    let title = required("title", title)?;

    if let Some(pid) = project_id {
        if !state.projects().iter().any(|p| p.id == pid) {
            // Referência fraca: aceitamos, mas fica registado
            tracing::warn!("Tarefa '{}' aponta para projeto inexistente {}.", title, pid);
        }
    }

    let task = Task {
        id: format!("task-{}", Uuid::new_v4()),
        title,
        project_id,
        description: optional(description),
        status: status.unwrap_or_default(),
        created_at: Some(Utc::now()),
    };

    let mut tasks = state.tasks().to_vec();
    tasks.push(task.clone());
    state.save(Collection::Tasks, &tasks)?;

    tracing::info!("✅ Tarefa '{}' criada em {}.", task.id, task.status);
    Ok(task)
}

/// Muda a tarefa de coluna. Não há grafo de transições: qualquer estado vai para qualquer outro.
pub fn move_task(state: &mut AppState, task_id: &str, new_status: TaskStatus) -> AppResult<Task> {
    let mut tasks = state.tasks().to_vec();
    let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
        tracing::warn!("Falha ao mover: tarefa '{}' não encontrada.", task_id);
        return Err(AppError::not_found("Tarefa", task_id));
    };

    if task.status == new_status {
        return Ok(task.clone());
    }

    let from = task.status;
    task.status = new_status;
    let moved = task.clone();
    state.save(Collection::Tasks, &tasks)?;

    tracing::info!("Tarefa '{}' movida: {} -> {}", task_id, from, new_status);
    Ok(moved)
}

pub fn delete_task(state: &mut AppState, task_id: &str) -> AppResult<()> {
    if find_task(state, task_id).is_none() {
        tracing::warn!("Falha ao apagar: tarefa '{}' não encontrada.", task_id);
        return Err(AppError::not_found("Tarefa", task_id));
    }

    let tasks: Vec<Task> = state.tasks().iter().filter(|t| t.id != task_id).cloned().collect();
    state.save(Collection::Tasks, &tasks)?;
    tracing::info!("🗑️ Tarefa '{}' apagada.", task_id);
    Ok(())
}

#[derive(Debug, Clone)]
pub struct TaskGroup<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl TaskGroup<'_> {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// Tarefas agrupadas por coluna, na ordem Todo, InProgress, Done.
#[derive(Debug, Clone)]
pub struct TaskGroups<'a> {
    pub groups: [TaskGroup<'a>; 3],
}

impl<'a> TaskGroups<'a> {
    pub fn group(&self, status: TaskStatus) -> &TaskGroup<'a> {
        // ALL e groups partilham a mesma ordem
        let idx = TaskStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
        &self.groups[idx]
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.group(status).count()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(TaskGroup::count).sum()
    }
}

pub fn list_tasks(state: &AppState) -> TaskGroups<'_> {
    let groups = TaskStatus::ALL.map(|status| TaskGroup {
        status,
        tasks: state.tasks().iter().filter(|t| t.status == status).collect(),
    });
    TaskGroups { groups }
}
