// src/models/session.rs
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sessão ativa: cópia completa do utilizador que fez login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(user: User) -> Self {
        Self { user, started_at: Utc::now() }
    }
}
