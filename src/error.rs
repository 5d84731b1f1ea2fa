// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro de leitura/escrita no armazenamento: {0}")]
    Io(#[from] std::io::Error),

    #[error("Documento JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de configuração: {0}")]
    Config(String),

    // Falhas no hash/verificação bcrypt
    #[error("Erro ao processar password: {0}")]
    PasswordHashing(#[from] bcrypt::BcryptError),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    // Registo público: o email já pertence a outra conta
    #[error("Email já está em uso")]
    EmailTaken,

    // Gestão de utilizadores pelo admin (criar/editar)
    #[error("Email já existe: {0}")]
    DuplicateEmail(String),

    #[error("{entity} '{id}' não encontrado")]
    NotFound { entity: &'static str, id: String },

    #[error("Não é permitido apagar o próprio utilizador")]
    SelfDeleteForbidden,

    #[error("Campo obrigatório vazio: {0}")]
    EmptyRequiredField(&'static str),

    #[error("Valor inválido para '{field}': {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Data fim deve ser depois do início")]
    InvalidDateRange,

    #[error("Projeto {0} ainda tem tarefas associadas")]
    ProjectHasTasks(i64),

    #[error("Não autenticado")]
    Unauthorized,

    #[error("Acesso reservado a administradores")]
    Forbidden,
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound { entity, id: id.to_string() }
    }

    /// Mensagem curta mostrada junto ao formulário que originou o erro.
    /// Erros de infraestrutura ficam genéricos; o detalhe vai para o log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Io(_) | AppError::Json(_) => "Erro ao aceder aos dados.".to_string(),
            AppError::Config(_) => "Erro de configuração.".to_string(),
            AppError::PasswordHashing(_) => "Erro ao processar credenciais.".to_string(),
            AppError::InvalidCredentials => "Credenciais inválidas.".to_string(),
            AppError::EmailTaken => "Email já está em uso.".to_string(),
            AppError::DuplicateEmail(_) => "Email já existe!".to_string(),
            AppError::NotFound { .. } => "Registo não encontrado.".to_string(),
            AppError::SelfDeleteForbidden => "Não pode excluir o seu próprio utilizador.".to_string(),
            AppError::EmptyRequiredField(field) => format!("Preencha o campo '{}'.", field),
            AppError::InvalidField { field, .. } => format!("Valor inválido no campo '{}'.", field),
            AppError::InvalidDateRange => "A data de fim deve ser posterior à data de início.".to_string(),
            AppError::ProjectHasTasks(_) => "Remova as tarefas do projeto antes de o excluir.".to_string(),
            AppError::Unauthorized => "Faça login para continuar.".to_string(),
            AppError::Forbidden => "Ação reservada a administradores.".to_string(),
        }
    }

    /// Erros de infraestrutura (armazenamento, hash, config) vs. erros de negócio.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Io(_) | AppError::Json(_) | AppError::Config(_) | AppError::PasswordHashing(_)
        )
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
