// src/services/mod.rs
pub mod auth_service;
pub mod dashboard_service;
pub mod project_service;
pub mod task_service;
pub mod user_service;

use crate::error::{AppError, AppResult};

/// Valida um campo obrigatório vindo de formulário e devolve-o sem espaços nas pontas.
pub(crate) fn required(field: &'static str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::EmptyRequiredField(field));
    }
    Ok(value.to_string())
}

/// Campo opcional: vazio/só espaços -> None.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
