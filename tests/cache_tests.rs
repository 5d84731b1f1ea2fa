use nexus::{
    db::{Collection, MemoryBackend, Store, SEED_ADMIN_ID},
    models::{
        project::{Project, ProjectFields, ProjectStatus},
        task::{Task, TaskStatus},
        user::{Role, User},
    },
    services::{auth_service, project_service, task_service, user_service},
    AppState, StateEvent,
};

mod common;
use common::{setup_as_admin, test_config, ADMIN_EMAIL, ADMIN_PASSWORD};

// A cache tem de coincidir com o armazenamento depois de cada escrita
fn assert_cache_matches_store(state: &AppState) -> anyhow::Result<()> {
    assert_eq!(state.users(), state.store().get::<User>(Collection::Users)?.as_slice());
    assert_eq!(state.projects(), state.store().get::<Project>(Collection::Projects)?.as_slice());
    assert_eq!(state.tasks(), state.store().get::<Task>(Collection::Tasks)?.as_slice());
    assert_eq!(state.session().cloned(), state.store().get_session()?);
    Ok(())
}

fn fields(title: &str) -> ProjectFields {
    ProjectFields {
        title: title.to_string(),
        institution: "UFRJ".to_string(),
        objective: String::new(),
        start_date: None,
        end_date: None,
        status: ProjectStatus::Pendente,
        results: String::new(),
    }
}

#[test]
fn cache_follows_every_mutation() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    assert_cache_matches_store(&state)?;

    let created = user_service::create_user(&mut state, "Caio", "caio@nexus.io", Role::User, Some("pw"))?;
    assert_cache_matches_store(&state)?;
    user_service::update_user(&mut state, &created.user.id, "Caio S", "caio@nexus.io", Role::Admin, None)?;
    assert_cache_matches_store(&state)?;

    let p = project_service::create_project(&mut state, None, fields("A"))?;
    assert_cache_matches_store(&state)?;
    project_service::update_project(&mut state, p.id, fields("B"))?;
    assert_cache_matches_store(&state)?;

    let t = task_service::create_task(&mut state, "T", Some(p.id), Some("desc"), None)?;
    assert_cache_matches_store(&state)?;
    task_service::move_task(&mut state, &t.id, TaskStatus::InProgress)?;
    assert_cache_matches_store(&state)?;
    task_service::delete_task(&mut state, &t.id)?;
    assert_cache_matches_store(&state)?;

    project_service::delete_project(&mut state, p.id)?;
    assert_cache_matches_store(&state)?;
    user_service::delete_user(&mut state, &created.user.id)?;
    assert_cache_matches_store(&state)?;

    auth_service::logout(&mut state)?;
    assert_cache_matches_store(&state)?;
    Ok(())
}

#[test]
fn each_write_notifies_its_collection() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let events = state.subscribe();

    let p = project_service::create_project(&mut state, None, fields("A"))?;
    task_service::create_task(&mut state, "T", Some(p.id), None, None)?;
    user_service::create_user(&mut state, "Caio", "caio@nexus.io", Role::User, Some("pw"))?;
    auth_service::logout(&mut state)?;

    let received: Vec<StateEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            StateEvent::ProjectsChanged,
            StateEvent::TasksChanged,
            StateEvent::UsersChanged,
            StateEvent::SessionChanged,
        ]
    );
    Ok(())
}

#[test]
fn dropped_subscribers_are_pruned() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let kept = state.subscribe();
    drop(state.subscribe());
    assert_eq!(state.events().subscriber_count(), 2);

    project_service::create_project(&mut state, None, fields("A"))?;
    assert_eq!(state.events().subscriber_count(), 1);
    assert_eq!(kept.try_recv()?, StateEvent::ProjectsChanged);
    Ok(())
}

#[test]
fn failed_writes_send_no_events() -> anyhow::Result<()> {
    let mut state = setup_as_admin()?;
    let events = state.subscribe();

    assert!(project_service::delete_project(&mut state, 1).is_err());
    assert!(task_service::delete_task(&mut state, "task-x").is_err());
    assert!(user_service::delete_user(&mut state, SEED_ADMIN_ID).is_err());
    assert!(events.try_recv().is_err());
    Ok(())
}

#[test]
fn file_store_survives_restart() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = test_config();
    config.data_dir = dir.path().to_path_buf();

    let (project_id, task_id) = {
        let mut state = AppState::open(config.clone())?;
        auth_service::login(&mut state, ADMIN_EMAIL, ADMIN_PASSWORD)?;
        let p = project_service::create_project(&mut state, None, fields("Persistente"))?;
        let t = task_service::create_task(&mut state, "Guardar", Some(p.id), None, None)?;
        task_service::move_task(&mut state, &t.id, TaskStatus::Done)?;
        (p.id, t.id)
    };

    let state = AppState::open(config)?;
    assert_eq!(state.users().len(), 1);
    assert_eq!(project_service::find_project(&state, project_id).map(|p| p.title.as_str()), Some("Persistente"));
    assert_eq!(task_service::find_task(&state, &task_id).map(|t| t.status), Some(TaskStatus::Done));
    // A sessão também persiste entre execuções
    assert_eq!(state.current_user().map(|u| u.email.as_str()), Some(ADMIN_EMAIL));
    Ok(())
}

#[test]
fn legacy_documents_load_into_the_cache() -> anyhow::Result<()> {
    let backend = MemoryBackend::new()
        .with_raw(
            "nexus_users",
            r#"[{"id":"admin-1","name":"Administrador","email":"admin@sys.com","password":"123","role":"admin"}]"#,
        )
        .with_raw(
            "nexus_tasks",
            r#"[{"id":"t1","title":"Antiga","projectId":"abc","status":"Todo"},
                {"id":"t2","title":"Com projeto","projectId":"17","status":"Done"}]"#,
        );
    let mut state = AppState::new(Store::new(backend), test_config())?;

    assert_eq!(state.tasks().len(), 2);
    assert_eq!(state.tasks()[0].project_id, None);
    assert_eq!(state.tasks()[1].project_id, Some(17));
    assert!(state.projects().is_empty());

    auth_service::login(&mut state, "admin@sys.com", "123")?;
    assert_cache_matches_store(&state)?;
    Ok(())
}

#[test]
fn writes_touching_two_collections_emit_one_event_each() -> anyhow::Result<()> {
    let mut state = common::setup()?;
    let events = state.subscribe();

    auth_service::register(&mut state, "Ana", "ana@nexus.io", "pw")?;
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![StateEvent::UsersChanged, StateEvent::SessionChanged]
    );

    auth_service::login(&mut state, ADMIN_EMAIL, ADMIN_PASSWORD)?;
    assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![StateEvent::SessionChanged]);

    // Editar o próprio utilizador também atualiza a cópia da sessão
    user_service::update_user(&mut state, SEED_ADMIN_ID, "Chefe", ADMIN_EMAIL, Role::Admin, None)?;
    assert_eq!(
        events.try_iter().collect::<Vec<_>>(),
        vec![StateEvent::UsersChanged, StateEvent::SessionChanged]
    );

    // Editar outro utilizador só toca na coleção de utilizadores
    let ana = state.users().iter().find(|u| u.email == "ana@nexus.io").map(|u| u.id.clone());
    let ana = ana.ok_or_else(|| anyhow::anyhow!("Ana em falta"))?;
    user_service::update_user(&mut state, &ana, "Ana Lima", "ana@nexus.io", Role::User, None)?;
    assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![StateEvent::UsersChanged]);

    // Mover para o mesmo status não grava nada
    let t = task_service::create_task(&mut state, "T", None, None, None)?;
    events.try_iter().for_each(drop);
    task_service::move_task(&mut state, &t.id, TaskStatus::Todo)?;
    assert!(events.try_recv().is_err());
    Ok(())
}
