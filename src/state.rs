// src/state.rs
use crate::{
    config::AppConfig,
    db::{self, Collection, MemoryBackend, Store},
    error::{AppError, AppResult},
    models::{project::Project, session::Session, task::Task, user::User},
};
use chrono::Utc;
use serde::Serialize;
use std::sync::mpsc;

/// Notificação enviada depois de cada gravação bem-sucedida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    UsersChanged,
    ProjectsChanged,
    TasksChanged,
    SessionChanged,
}

impl StateEvent {
    pub fn for_collection(collection: Collection) -> Self {
        match collection {
            Collection::Users => StateEvent::UsersChanged,
            Collection::Projects => StateEvent::ProjectsChanged,
            Collection::Tasks => StateEvent::TasksChanged,
            Collection::Session => StateEvent::SessionChanged,
        }
    }
}

// Lista de subscritores (ex.: o front end, ou um teste headless)
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: Vec<mpsc::Sender<StateEvent>>,
}

impl EventHub {
    pub fn subscribe(&mut self) -> mpsc::Receiver<StateEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Envia o evento a todos; subscritores cujo receiver já caiu são removidos.
    pub fn broadcast(&mut self, event: StateEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        tracing::debug!("Evento {:?} enviado a {} subscritores.", event, self.subscribers.len());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Espelho em memória das quatro coleções + o handle do armazenamento.
/// É passado explicitamente (`&mut AppState`) a cada serviço.
pub struct AppState {
    store: Store,
    config: AppConfig,
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    session: Option<Session>,
    events: EventHub,
    last_project_id: i64,
}

impl AppState {
    /// Prepara o armazenamento (seed/migração) e carrega a cache.
    pub fn new(mut store: Store, config: AppConfig) -> AppResult<Self> {
        store.init(&config)?;
        let mut state = Self {
            store,
            config,
            users: Vec::new(),
            projects: Vec::new(),
            tasks: Vec::new(),
            session: None,
            events: EventHub::default(),
            last_project_id: 0,
        };
        state.reload()?;
        Ok(state)
    }

    /// Estado sobre o diretório de dados da configuração.
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let store = db::open_store(&config)?;
        Self::new(store, config)
    }

    pub fn in_memory(config: AppConfig) -> AppResult<Self> {
        Self::new(Store::new(MemoryBackend::new()), config)
    }

    /// Relê as quatro coleções do armazenamento. Sem atualização parcial.
    pub fn reload(&mut self) -> AppResult<()> {
        self.users = self.store.get(Collection::Users)?;
        self.projects = self.store.get(Collection::Projects)?;
        self.tasks = self.store.get(Collection::Tasks)?;
        self.session = self.store.get_session()?;
        tracing::debug!(
            "Cache recarregada: {} utilizadores, {} projetos, {} tarefas, sessão={}",
            self.users.len(),
            self.projects.len(),
            self.tasks.len(),
            self.session.is_some()
        );
        Ok(())
    }

    // --- Escrita: grava a coleção inteira, recarrega e notifica ---

    pub(crate) fn save<T: Serialize>(&mut self, collection: Collection, records: &[T]) -> AppResult<()> {
        self.store.put(collection, records)?;
        self.reload()?;
        self.events.broadcast(StateEvent::for_collection(collection));
        Ok(())
    }

    pub(crate) fn save_session(&mut self, session: Option<&Session>) -> AppResult<()> {
        match session {
            Some(s) => self.store.put_session(s)?,
            None => self.store.remove(Collection::Session)?,
        }
        self.reload()?;
        self.events.broadcast(StateEvent::SessionChanged);
        Ok(())
    }

    /// Novo id numérico de projeto: timestamp em ms, sempre acima de qualquer id já visto.
    /// Falha se um id explícito já ocupou o topo do intervalo de `i64`.
    pub(crate) fn next_project_id(&mut self) -> AppResult<i64> {
        let highest = self
            .projects
            .iter()
            .map(|p| p.id)
            .chain([self.last_project_id, 0])
            .max()
            .unwrap_or(0);
        let Some(floor) = highest.checked_add(1) else {
            tracing::warn!("Sem ids de projeto livres acima de {}.", highest);
            return Err(AppError::InvalidField { field: "id", value: highest.to_string() });
        };
        let id = Utc::now().timestamp_millis().max(floor);
        self.last_project_id = id;
        Ok(id)
    }

    // --- Leitura ---

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<StateEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }
}
