// src/services/user_service.rs
// Gestão de utilizadores: todas as operações exigem sessão de administrador.
use crate::{
    db::Collection,
    error::{AppError, AppResult},
    models::{
        session::Session,
        user::{Role, User},
    },
    services::{auth_service, required},
    state::AppState,
};
use chrono::Utc;
use uuid::Uuid;

/// Resultado da criação. `temporary_password` só vem preenchido quando o admin
/// não indicou senha: é gerada uma aleatória para lhe ser mostrada uma única vez.
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: User,
    pub temporary_password: Option<String>,
}

pub fn find_user_by_id<'a>(state: &'a AppState, user_id: &str) -> Option<&'a User> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    state.users().iter().find(|u| u.id == user_id)
}

pub fn find_all_users(state: &AppState) -> &[User] {
    state.users()
}

pub fn create_user(
    state: &mut AppState,
    name: &str,
    email: &str,
    role: Role,
    password: Option<&str>,
) -> AppResult<CreatedUser> {
    auth_service::require_admin(state)?;
    let name = required("name", name)?;
    let email = required("email", email)?;
    tracing::info!("Tentando criar utilizador: {}", email);

    if state.users().iter().any(|u| u.email == email) {
        tracing::warn!("Falha ao criar user: email '{}' já existe.", email);
        return Err(AppError::DuplicateEmail(email));
    }

    // A senha é opaca: não se apara, só o vazio conta como ausente
    let (raw_password, temporary_password) = match password.filter(|p| !p.is_empty()) {
        Some(p) => (p.to_string(), None),
        None => {
            let generated = auth_service::generate_password();
            (generated.clone(), Some(generated))
        }
    };

    let user = User {
        id: format!("user-{}", Uuid::new_v4()),
        name,
        email,
        password_hash: auth_service::hash_password(&raw_password, state.config().bcrypt_cost)?,
        role,
        joined_at: Utc::now(),
    };

    let mut users = state.users().to_vec();
    users.push(user.clone());
    state.save(Collection::Users, &users)?;

    tracing::info!("✅ Utilizador '{}' criado com sucesso.", user.id);
    Ok(CreatedUser { user, temporary_password })
}

/// Atualiza nome, email e role. A senha só muda se vier uma nova.
pub fn update_user(
    state: &mut AppState,
    user_id: &str,
    name: &str,
    email: &str,
    role: Role,
    password: Option<&str>,
) -> AppResult<User> {
    auth_service::require_admin(state)?;
    let name = required("name", name)?;
    let email = required("email", email)?;
    tracing::info!("Atualizando dados para user: {}", user_id);

    let mut users = state.users().to_vec();
    let Some(idx) = users.iter().position(|u| u.id == user_id) else {
        tracing::warn!("Falha ao atualizar dados: Utilizador '{}' não encontrado.", user_id);
        return Err(AppError::not_found("Utilizador", user_id));
    };

    if users.iter().any(|u| u.id != user_id && u.email == email) {
        tracing::warn!("Falha ao atualizar '{}': email '{}' pertence a outro utilizador.", user_id, email);
        return Err(AppError::DuplicateEmail(email));
    }

    let password_hash = match password.filter(|p| !p.is_empty()) {
        Some(p) => auth_service::hash_password(p, state.config().bcrypt_cost)?,
        None => users[idx].password_hash.clone(),
    };

    let updated = User { name, email, role, password_hash, ..users[idx].clone() };
    users[idx] = updated.clone();
    state.save(Collection::Users, &users)?;

    // A sessão guarda uma cópia do utilizador: mantém-na em sincronia
    let session_started = state
        .session()
        .filter(|s| s.user.id == user_id)
        .map(|s| s.started_at);
    if let Some(started_at) = session_started {
        let refreshed = Session { user: updated.clone(), started_at };
        state.save_session(Some(&refreshed))?;
    }

    tracing::info!("✅ Dados atualizados com sucesso para user: {}", user_id);
    Ok(updated)
}

pub fn delete_user(state: &mut AppState, user_id: &str) -> AppResult<()> {
    let actor_id = auth_service::require_admin(state)?.id.clone();
    tracing::info!("Tentando apagar utilizador: {}", user_id);

    if actor_id == user_id {
        tracing::warn!("Admin '{}' tentou apagar a própria conta.", actor_id);
        return Err(AppError::SelfDeleteForbidden);
    }

    if find_user_by_id(state, user_id).is_none() {
        tracing::warn!("Falha ao apagar: Utilizador '{}' não encontrado.", user_id);
        return Err(AppError::not_found("Utilizador", user_id));
    }

    let users: Vec<User> = state.users().iter().filter(|u| u.id != user_id).cloned().collect();
    state.save(Collection::Users, &users)?;
    tracing::info!("🗑️ Utilizador '{}' apagado.", user_id);
    Ok(())
}
