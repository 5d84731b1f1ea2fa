#![allow(dead_code)]

use nexus::{
    models::user::{Role, User},
    services::{auth_service, user_service},
    config::MIN_BCRYPT_COST,
    telemetry, AppConfig, AppState,
};

pub const ADMIN_EMAIL: &str = "admin@sys.com";
pub const ADMIN_PASSWORD: &str = "123";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    // Custo mínimo para os testes não ficarem lentos
    config.bcrypt_cost = MIN_BCRYPT_COST;
    config.admin_seed.password = Some(ADMIN_PASSWORD.to_string());
    config
}

/// Estado em memória já com o admin padrão.
pub fn setup() -> anyhow::Result<AppState> {
    // Pode ser chamado por vários testes
    telemetry::init_tracing("nexus=debug");
    Ok(AppState::in_memory(test_config())?)
}

/// Estado em memória com o admin padrão já logado.
pub fn setup_as_admin() -> anyhow::Result<AppState> {
    let mut state = setup()?;
    auth_service::login(&mut state, ADMIN_EMAIL, ADMIN_PASSWORD)?;
    Ok(state)
}

pub fn create_plain_user(state: &mut AppState, name: &str, email: &str, password: &str) -> anyhow::Result<User> {
    let created = user_service::create_user(state, name, email, Role::User, Some(password))?;
    Ok(created.user)
}
