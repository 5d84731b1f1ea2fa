// src/services/project_service.rs
use crate::{
    config::ProjectDeletePolicy,
    db::Collection,
    error::{AppError, AppResult},
    models::{
        parse_form_date,
        project::{Project, ProjectFields, ProjectForm, ProjectStatus},
    },
    services::required,
    state::AppState,
};

/// Converte o formulário cru em campos validados.
pub fn parse_project_form(form: &ProjectForm) -> AppResult<ProjectFields> {
    let fields = ProjectFields {
        title: required("title", &form.title)?,
        institution: required("institution", &form.institution)?,
        objective: form.objective.trim().to_string(),
        start_date: parse_form_date("startDate", &form.start_date)?,
        end_date: parse_form_date("endDate", &form.end_date)?,
        status: required("status", &form.status)?.parse()?,
        results: form.results.trim().to_string(),
    };
    validate_fields(&fields)?;
    Ok(fields)
}

fn validate_fields(fields: &ProjectFields) -> AppResult<()> {
    if fields.title.trim().is_empty() {
        return Err(AppError::EmptyRequiredField("title"));
    }
    if fields.institution.trim().is_empty() {
        return Err(AppError::EmptyRequiredField("institution"));
    }
    if let (Some(start), Some(end)) = (fields.start_date, fields.end_date) {
        if end < start {
            return Err(AppError::InvalidDateRange);
        }
    }
    Ok(())
}

pub fn find_project(state: &AppState, project_id: i64) -> Option<&Project> {
    state.projects().iter().find(|p| p.id == project_id)
}

/// Cria um projeto. Sem id indicado, gera-se um novo (timestamp monotónico).
pub fn create_project(state: &mut AppState, id: Option<i64>, fields: ProjectFields) -> AppResult<Project> {
    validate_fields(&fields)?;

    let id = match id {
        Some(id) if find_project(state, id).is_some() => {
            tracing::warn!("Falha ao criar projeto: id {} já existe.", id);
            return Err(AppError::InvalidField { field: "id", value: id.to_string() });
        }
        Some(id) => id,
        None => state.next_project_id()?,
    };

    let project = fields.into_project(id);
    let mut projects = state.projects().to_vec();
    projects.push(project.clone());
    state.save(Collection::Projects, &projects)?;

    tracing::info!("✅ Projeto {} ('{}') criado.", project.id, project.title);
    Ok(project)
}

pub fn update_project(state: &mut AppState, project_id: i64, fields: ProjectFields) -> AppResult<Project> {
    validate_fields(&fields)?;

    let mut projects = state.projects().to_vec();
    let Some(idx) = projects.iter().position(|p| p.id == project_id) else {
        tracing::warn!("Falha ao atualizar: projeto {} não encontrado.", project_id);
        return Err(AppError::not_found("Projeto", project_id));
    };

    let project = fields.into_project(project_id);
    projects[idx] = project.clone();
    state.save(Collection::Projects, &projects)?;

    tracing::info!("✅ Projeto {} atualizado.", project_id);
    Ok(project)
}

/// Apaga o projeto. As tarefas que o referem não são tocadas: com a política
/// `Keep` ficam órfãs ("Sem Projeto"); com `Block` a remoção é recusada.
pub fn delete_project(state: &mut AppState, project_id: i64) -> AppResult<()> {
    if find_project(state, project_id).is_none() {
        tracing::warn!("Falha ao apagar: projeto {} não encontrado.", project_id);
        return Err(AppError::not_found("Projeto", project_id));
    }

    let dependents = state.tasks().iter().filter(|t| t.project_id == Some(project_id)).count();
    if dependents > 0 {
        match state.config().project_delete_policy {
            ProjectDeletePolicy::Block => {
                tracing::warn!("Projeto {} tem {} tarefas; remoção bloqueada.", project_id, dependents);
                return Err(AppError::ProjectHasTasks(project_id));
            }
            ProjectDeletePolicy::Keep => {
                tracing::debug!("Projeto {} apagado deixa {} tarefas órfãs.", project_id, dependents);
            }
        }
    }

    let projects: Vec<Project> = state.projects().iter().filter(|p| p.id != project_id).cloned().collect();
    state.save(Collection::Projects, &projects)?;
    tracing::info!("🗑️ Projeto {} apagado.", project_id);
    Ok(())
}

/// Filtra por texto (título OU instituição, sem distinção de maiúsculas) E por status.
/// Iterador preguiçoso; cada chamada recomeça do zero.
pub fn list_projects<'a>(
    state: &'a AppState,
    search: &str,
    status: Option<ProjectStatus>,
) -> impl Iterator<Item = &'a Project> + 'a {
    let needle = search.to_lowercase();
    state.projects().iter().filter(move |p| {
        let matches_search = needle.is_empty()
            || p.title.to_lowercase().contains(&needle)
            || p.institution.to_lowercase().contains(&needle);
        let matches_status = status.map_or(true, |s| p.status == s);
        matches_search && matches_status
    })
}

/// Filtro de status vindo do select: "" = todos.
pub fn parse_status_filter(raw: &str) -> AppResult<Option<ProjectStatus>> {
    match raw.trim() {
        "" => Ok(None),
        s => s.parse().map(Some),
    }
}
