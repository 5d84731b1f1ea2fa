// src/models/project.rs
use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Ativo,
    Pendente,
    #[serde(rename = "Concluído")]
    Concluido,
}

impl ProjectStatus {
    // Ordem usada no gráfico do dashboard
    pub const ALL: [ProjectStatus; 3] =
        [ProjectStatus::Ativo, ProjectStatus::Pendente, ProjectStatus::Concluido];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Ativo => "Ativo",
            ProjectStatus::Pendente => "Pendente",
            ProjectStatus::Concluido => "Concluído",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Ativo" => Ok(ProjectStatus::Ativo),
            "Pendente" => Ok(ProjectStatus::Pendente),
            "Concluído" | "Concluido" => Ok(ProjectStatus::Concluido),
            other => Err(AppError::InvalidField { field: "status", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub institution: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::lenient_date")]
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub results: String,
}

/// Campos validados de um projeto (sem id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    pub title: String,
    pub institution: String,
    pub objective: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub results: String,
}

impl ProjectFields {
    pub fn into_project(self, id: i64) -> Project {
        Project {
            id,
            title: self.title,
            institution: self.institution,
            objective: self.objective,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            results: self.results,
        }
    }
}

// Formulário do modal de projeto, com os valores tal como vêm dos inputs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    pub institution: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    pub status: String,
    #[serde(default)]
    pub results: String,
}
