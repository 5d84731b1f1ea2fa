// src/services/dashboard_service.rs
use crate::{models::project::ProjectStatus, state::AppState};
use serde::Serialize;

/// Contagens de projetos por status; recalculadas a cada render do dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub completed: usize,
}

impl ProjectStats {
    pub fn count(&self, status: ProjectStatus) -> usize {
        match status {
            ProjectStatus::Ativo => self.active,
            ProjectStatus::Pendente => self.pending,
            ProjectStatus::Concluido => self.completed,
        }
    }
}

pub fn project_stats(state: &AppState) -> ProjectStats {
    state.projects().iter().fold(ProjectStats::default(), |mut stats, p| {
        stats.total += 1;
        match p.status {
            ProjectStatus::Ativo => stats.active += 1,
            ProjectStatus::Pendente => stats.pending += 1,
            ProjectStatus::Concluido => stats.completed += 1,
        }
        stats
    })
}

pub fn user_count(state: &AppState) -> usize {
    state.users().len()
}
