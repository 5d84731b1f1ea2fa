// src/models/user.rs
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Rótulo mostrado no cabeçalho da aplicação.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::User => "Usuário",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            r if r.eq_ignore_ascii_case("admin") => Ok(Role::Admin),
            r if r.eq_ignore_ascii_case("user") => Ok(Role::User),
            other => Err(AppError::InvalidField { field: "role", value: other.to_string() }),
        }
    }
}

// Representa um utilizador guardado na coleção 'nexus_users'
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Inicial maiúscula do nome (avatar).
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Formato antigo: senha em texto simples no campo `password`.
/// Só é lido durante a migração (ver `db::migrate_legacy_users`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

// --- Formulários (valores crus vindos da camada de apresentação) ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Formulário do modal de utilizador (admin). `password` vazio = não alterar / gerar.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub password: String,
}
