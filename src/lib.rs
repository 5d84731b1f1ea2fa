// src/lib.rs
//! Núcleo do painel Nexus: autenticação, dashboard e CRUD de utilizadores,
//! projetos e tarefas sobre um armazenamento chave-valor local.
//!
//! Fluxo: comando -> serviço valida/altera -> `db` grava -> `state` recarrega
//! e notifica -> `views` recalcula o ecrã afetado.

// --- Declaração dos Módulos ---
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod views;

pub use config::{AppConfig, ProjectDeletePolicy};
pub use error::{AppError, AppResult};
pub use state::{AppState, StateEvent};
