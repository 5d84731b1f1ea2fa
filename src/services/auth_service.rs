// src/services/auth_service.rs
use crate::{
    db::Collection,
    error::{AppError, AppResult},
    models::{
        session::Session,
        user::{Role, User},
    },
    services::required,
    state::AppState,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// O bcrypt só considera os primeiros 72 bytes; acima disso a senha é recusada.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Gera um hash bcrypt (salt aleatório incluído no próprio hash).
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    if password.len() > MAX_PASSWORD_BYTES {
        tracing::warn!("Senha recusada: {} bytes (máximo {}).", password.len(), MAX_PASSWORD_BYTES);
        return Err(AppError::InvalidField {
            field: "password",
            value: format!("{} bytes", password.len()),
        });
    }
    tracing::debug!("Gerando hash bcrypt...");
    bcrypt::hash(password, cost).map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashing(e)
    })
}

/// Verifica se a senha fornecida corresponde ao hash guardado.
/// A comparação final do bcrypt é feita em tempo constante.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    // Nenhum hash guardado veio de uma senha tão longa
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    tracing::debug!("Verificando hash bcrypt...");
    bcrypt::verify(password, stored_hash).map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashing(e)
    })
}

/// Senha aleatória de uso único (seed do admin, criação sem senha).
pub fn generate_password() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Procura um utilizador com este email e senha; cria a sessão se encontrar.
pub fn login(state: &mut AppState, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim();
    tracing::info!("Tentativa de login para: {}", email);

    // Emails são únicos, mas dados antigos podem trazer duplicados: testamos todos.
    let mut matched = None;
    for user in state.users().iter().filter(|u| u.email == email) {
        if verify_password(password, &user.password_hash)? {
            matched = Some(user.clone());
            break;
        }
    }

    let Some(user) = matched else {
        tracing::warn!("Credenciais inválidas para: {}", email);
        return Err(AppError::InvalidCredentials);
    };

    state.save_session(Some(&Session::start(user.clone())))?;
    tracing::info!("✅ Login bem-sucedido para: {}", user.id);
    Ok(user)
}

/// Registo público: cria um utilizador com role "user" e entra logo na sessão.
pub fn register(state: &mut AppState, name: &str, email: &str, password: &str) -> AppResult<User> {
    let name = required("name", name)?;
    let email = required("email", email)?;
    if password.is_empty() {
        return Err(AppError::EmptyRequiredField("password"));
    }

    if state.users().iter().any(|u| u.email == email) {
        tracing::warn!("Registo recusado: email '{}' já está em uso.", email);
        return Err(AppError::EmailTaken);
    }

    let user = User {
        id: format!("user-{}", Uuid::new_v4()),
        name,
        email,
        password_hash: hash_password(password, state.config().bcrypt_cost)?,
        role: Role::User,
        joined_at: Utc::now(),
    };

    let mut users = state.users().to_vec();
    users.push(user.clone());
    state.save(Collection::Users, &users)?;
    tracing::info!("✅ Utilizador '{}' registado.", user.id);

    state.save_session(Some(&Session::start(user.clone())))?;
    Ok(user)
}

/// Termina a sessão atual (sem efeito se ninguém estiver logado).
pub fn logout(state: &mut AppState) -> AppResult<()> {
    let Some(user_id) = state.current_user().map(|u| u.id.clone()) else {
        tracing::info!("🚪 Logout sem sessão ativa.");
        return Ok(());
    };
    state.save_session(None)?;
    tracing::info!("🚪 Utilizador '{}' desligado.", user_id);
    Ok(())
}

pub fn current_user(state: &AppState) -> Option<&User> {
    state.current_user()
}

pub fn require_auth(state: &AppState) -> AppResult<&User> {
    state.current_user().ok_or_else(|| {
        tracing::debug!("Acesso negado: sem sessão.");
        AppError::Unauthorized
    })
}

pub fn require_admin(state: &AppState) -> AppResult<&User> {
    let user = require_auth(state)?;
    if user.is_admin() {
        Ok(user)
    } else {
        tracing::warn!("Acesso negado para {} (sem role admin).", user.id);
        Err(AppError::Forbidden)
    }
}

/// O que a interface pode mostrar, derivado apenas da role do utilizador atual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Visibility {
    pub is_authenticated: bool,
    pub is_admin: bool,
    // Cabeçalho de ações + botão "Novo Usuário"
    pub show_user_management: bool,
    pub show_admin_panel: bool,
    pub show_welcome_panel: bool,
}

pub fn visibility(user: Option<&User>) -> Visibility {
    match user {
        None => Visibility::default(),
        Some(u) => {
            let is_admin = u.is_admin();
            Visibility {
                is_authenticated: true,
                is_admin,
                show_user_management: is_admin,
                show_admin_panel: is_admin,
                show_welcome_panel: !is_admin,
            }
        }
    }
}
