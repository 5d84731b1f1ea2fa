// src/config.rs
use crate::error::{AppError, AppResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Intervalo de custo aceite pelo bcrypt.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// O que fazer com as tarefas quando o projeto a que apontam é apagado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectDeletePolicy {
    /// As tarefas ficam órfãs e aparecem como "Sem Projeto".
    #[default]
    Keep,
    /// O projeto só pode ser apagado depois de não ter tarefas.
    Block,
}

impl FromStr for ProjectDeletePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(ProjectDeletePolicy::Keep),
            "block" => Ok(ProjectDeletePolicy::Block),
            other => Err(AppError::Config(format!(
                "NEXUS_PROJECT_DELETE_POLICY inválida: '{}' (use keep ou block)",
                other
            ))),
        }
    }
}

/// Dados do administrador criado na primeira execução.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    // None -> gera-se uma senha aleatória no momento do seed
    pub password: Option<String>,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            name: "Administrador".to_string(),
            email: "admin@sys.com".to_string(),
            password: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub admin_seed: AdminSeed,
    pub project_delete_policy: ProjectDeletePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin_seed: AdminSeed::default(),
            project_delete_policy: ProjectDeletePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Lê a configuração do ambiente (carregando `.env` se existir).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Constrói a configuração a partir de uma função de lookup (variáveis ausentes -> padrão).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(dir) = lookup("NEXUS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(cost) = lookup("NEXUS_BCRYPT_COST") {
            let cost: u32 = cost
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("NEXUS_BCRYPT_COST inválido: '{}'", cost)))?;
            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                return Err(AppError::Config(format!(
                    "NEXUS_BCRYPT_COST fora do intervalo {}..={}: {}",
                    MIN_BCRYPT_COST, MAX_BCRYPT_COST, cost
                )));
            }
            config.bcrypt_cost = cost;
        }

        if let Some(name) = lookup("NEXUS_ADMIN_NAME") {
            config.admin_seed.name = name;
        }
        if let Some(email) = lookup("NEXUS_ADMIN_EMAIL") {
            config.admin_seed.email = email;
        }
        config.admin_seed.password = lookup("NEXUS_ADMIN_PASSWORD").filter(|p| !p.is_empty());

        if let Some(policy) = lookup("NEXUS_PROJECT_DELETE_POLICY") {
            config.project_delete_policy = policy.parse()?;
        }

        if config.admin_seed.email.trim().is_empty() {
            return Err(AppError::Config("NEXUS_ADMIN_EMAIL não pode ser vazio".into()));
        }

        tracing::debug!(
            "Configuração carregada: data_dir={}, bcrypt_cost={}, policy={:?}",
            config.data_dir.display(),
            config.bcrypt_cost,
            config.project_delete_policy
        );
        Ok(config)
    }
}
