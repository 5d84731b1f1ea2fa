use nexus::{
    db::Collection,
    models::project::{Project, ProjectFields, ProjectStatus},
    services::{dashboard_service, project_service, task_service},
    views::{self, ProjectOption, NO_PROJECTS_OPTION},
    AppConfig, AppError, AppState, ProjectDeletePolicy,
};

mod common;
use common::{setup_as_admin, test_config};

fn fields(title: &str, institution: &str, status: ProjectStatus) -> ProjectFields {
    ProjectFields {
        title: title.to_string(),
        institution: institution.to_string(),
        objective: String::new(),
        start_date: None,
        end_date: None,
        status,
        results: String::new(),
    }
}

fn titles<'a>(it: impl Iterator<Item = &'a Project>) -> Vec<&'a str> {
    it.map(|p| p.title.as_str()).collect()
}

#[test]
fn filter_matches_title_or_institution_case_insensitively() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    project_service::create_project(&mut state, None, fields("Solar Grid", "MIT", ProjectStatus::Ativo))?;
    project_service::create_project(&mut state, None, fields("Water Reuse", "Solar Labs", ProjectStatus::Concluido))?;

    assert_eq!(
        titles(project_service::list_projects(&state, "solar", None)),
        vec!["Solar Grid", "Water Reuse"]
    );
    assert_eq!(
        titles(project_service::list_projects(&state, "", Some(ProjectStatus::Ativo))),
        vec!["Solar Grid"]
    );
    // Os dois filtros combinam-se com E
    assert_eq!(
        titles(project_service::list_projects(&state, "water", Some(ProjectStatus::Ativo))),
        Vec::<&str>::new()
    );
    assert_eq!(titles(project_service::list_projects(&state, "LABS", None)), vec!["Water Reuse"]);
    Ok(())
}

#[test]
fn listing_can_be_restarted() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    project_service::create_project(&mut state, None, fields("Solar Grid", "MIT", ProjectStatus::Ativo))?;

    let first: Vec<i64> = project_service::list_projects(&state, "grid", None).map(|p| p.id).collect();
    let second: Vec<i64> = project_service::list_projects(&state, "grid", None).map(|p| p.id).collect();
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn created_ids_are_unique_and_increasing() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let mut ids = Vec::new();
    for i in 0..20 {
        let p = project_service::create_project(&mut state, None, fields(&format!("P{i}"), "X", ProjectStatus::Pendente))?;
        ids.push(p.id);
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[test]
fn explicit_id_must_be_free() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let p = project_service::create_project(&mut state, Some(42), fields("A", "X", ProjectStatus::Ativo))?;
    assert_eq!(p.id, 42);
    assert!(matches!(
        project_service::create_project(&mut state, Some(42), fields("B", "X", ProjectStatus::Ativo)),
        Err(AppError::InvalidField { field: "id", .. })
    ));
    Ok(())
}

#[test]
fn update_replaces_fields_and_unknown_id_is_not_found() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let p = project_service::create_project(&mut state, None, fields("A", "X", ProjectStatus::Ativo))?;

    let updated = project_service::update_project(&mut state, p.id, fields("A2", "Y", ProjectStatus::Concluido))?;
    assert_eq!(updated.id, p.id);
    assert_eq!(project_service::find_project(&state, p.id), Some(&updated));

    let before: Vec<Project> = state.projects().to_vec();
    let err = project_service::update_project(&mut state, p.id + 1, fields("Z", "Z", ProjectStatus::Ativo)).unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "Projeto", .. }));
    assert_eq!(state.projects(), before.as_slice());
    Ok(())
}

#[test]
fn delete_of_unknown_project_leaves_collection_identical() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    project_service::create_project(&mut state, None, fields("A", "X", ProjectStatus::Ativo))?;
    let before: Vec<Project> = state.projects().to_vec();

    let err = project_service::delete_project(&mut state, -1).unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    assert_eq!(state.projects(), before.as_slice());
    Ok(())
}

#[test]
fn deleting_a_project_leaves_its_tasks_orphaned() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let p = project_service::create_project(&mut state, None, fields("A", "X", ProjectStatus::Ativo))?;
    let t = task_service::create_task(&mut state, "Tarefa", Some(p.id), None, None)?;

    project_service::delete_project(&mut state, p.id)?;
    assert!(state.projects().is_empty());
    let kept = task_service::find_task(&state, &t.id).expect("tarefa continua");
    assert_eq!(kept.project_id, Some(p.id));
    Ok(())
}

#[test]
fn block_policy_refuses_delete_while_tasks_exist() -> anyhow::Result<()> {
    let mut config: AppConfig = test_config();
    config.project_delete_policy = ProjectDeletePolicy::Block;
    let mut state = AppState::in_memory(config)?;

    let p = project_service::create_project(&mut state, None, fields("A", "X", ProjectStatus::Ativo))?;
    let t = task_service::create_task(&mut state, "Tarefa", Some(p.id), None, None)?;

    assert!(matches!(
        project_service::delete_project(&mut state, p.id),
        Err(AppError::ProjectHasTasks(id)) if id == p.id
    ));
    assert_eq!(state.projects().len(), 1);

    task_service::delete_task(&mut state, &t.id)?;
    project_service::delete_project(&mut state, p.id)?;
    assert!(state.projects().is_empty());
    Ok(())
}

#[test]
fn dashboard_counts_projects_by_status() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    for (title, status) in [
        ("A", ProjectStatus::Ativo),
        ("B", ProjectStatus::Ativo),
        ("C", ProjectStatus::Pendente),
        ("D", ProjectStatus::Concluido),
    ] {
        project_service::create_project(&mut state, None, fields(title, "X", status))?;
    }

    let stats = dashboard_service::project_stats(&state);
    assert_eq!((stats.total, stats.active, stats.pending, stats.completed), (4, 2, 1, 1));

    let last = state.projects()[3].id;
    project_service::delete_project(&mut state, last)?;
    let stats = dashboard_service::project_stats(&state);
    assert_eq!((stats.total, stats.completed), (3, 0));
    Ok(())
}

#[test]
fn mutations_are_visible_in_the_store() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let p = project_service::create_project(&mut state, None, fields("A", "X", ProjectStatus::Ativo))?;
    let stored: Vec<Project> = state.store().get(Collection::Projects)?;
    assert_eq!(stored, vec![p]);
    Ok(())
}

#[test]
fn generated_id_fails_cleanly_when_range_is_exhausted() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    project_service::create_project(&mut state, Some(i64::MAX), fields("Topo", "X", ProjectStatus::Ativo))?;
    let before: Vec<Project> = state.projects().to_vec();

    assert!(matches!(
        project_service::create_project(&mut state, None, fields("Outro", "X", ProjectStatus::Ativo)),
        Err(AppError::InvalidField { field: "id", .. })
    ));
    assert_eq!(state.projects(), before.as_slice());

    // Ids explícitos abaixo do topo continuam a funcionar
    project_service::create_project(&mut state, Some(1), fields("Baixo", "X", ProjectStatus::Ativo))?;
    assert_eq!(state.projects().len(), 2);
    Ok(())
}

#[test]
fn search_text_is_matched_as_typed() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    project_service::create_project(&mut state, None, fields("Solar Grid", "MIT", ProjectStatus::Ativo))?;
    project_service::create_project(&mut state, None, fields("Agua", "UFRJ", ProjectStatus::Ativo))?;

    assert_eq!(titles(project_service::list_projects(&state, " ", None)), vec!["Solar Grid"]);
    assert_eq!(titles(project_service::list_projects(&state, "r g", None)), vec!["Solar Grid"]);
    assert!(project_service::list_projects(&state, " agua", None).next().is_none());
    Ok(())
}

#[test]
fn task_form_options_show_placeholder_until_a_project_exists() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let empty = views::project_options(&state);
    assert!(empty.options.is_empty());
    assert_eq!(empty.placeholder, Some(NO_PROJECTS_OPTION));

    let a = project_service::create_project(&mut state, None, fields("Solar Grid", "MIT", ProjectStatus::Ativo))?;
    let b = project_service::create_project(&mut state, None, fields("Agua", "UFRJ", ProjectStatus::Pendente))?;
    let filled = views::project_options(&state);
    assert_eq!(filled.placeholder, None);
    assert_eq!(
        filled.options,
        vec![
            ProjectOption { id: a.id, title: "Solar Grid".into() },
            ProjectOption { id: b.id, title: "Agua".into() },
        ]
    );
    Ok(())
}

#[test]
fn dashboard_chart_keeps_status_order() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    project_service::create_project(&mut state, None, fields("C", "X", ProjectStatus::Concluido))?;
    project_service::create_project(&mut state, None, fields("P", "X", ProjectStatus::Pendente))?;
    project_service::create_project(&mut state, None, fields("P2", "X", ProjectStatus::Pendente))?;

    let chart: Vec<(&str, usize)> = views::dashboard_view(&state)
        .chart
        .iter()
        .map(|bar| (bar.label, bar.value))
        .collect();
    assert_eq!(chart, vec![("Ativo", 0), ("Pendente", 2), ("Concluído", 1)]);
    Ok(())
}
