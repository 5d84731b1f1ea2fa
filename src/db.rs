// src/db.rs
//! Armazenamento persistente: quatro documentos JSON independentes
//! (`nexus_users`, `nexus_projects`, `nexus_tasks`, `nexus_session`).
//!
//! Cada documento é gravado como `{"version": 1, "records": [...]}`. Na leitura
//! aceitamos também o formato antigo (array "nu" sem versão) para migração.
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        project::Project,
        session::Session,
        task::Task,
        user::{LegacyUser, Role, User},
    },
    services::auth_service,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

pub const SCHEMA_VERSION: u32 = 1;

/// Id fixo do administrador criado na primeira execução.
pub const SEED_ADMIN_ID: &str = "admin-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Projects,
    Tasks,
    Session,
}

impl Collection {
    pub const ALL: [Collection; 4] =
        [Collection::Users, Collection::Projects, Collection::Tasks, Collection::Session];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Users => "nexus_users",
            Collection::Projects => "nexus_projects",
            Collection::Tasks => "nexus_tasks",
            Collection::Session => "nexus_session",
        }
    }
}

/// Armazenamento chave -> texto. Síncrono e local.
pub trait StorageBackend {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

// --- Backend em disco: um ficheiro <chave>.json por coleção ---

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> AppResult<()> {
        // Escreve num ficheiro temporário e renomeia: ou fica o documento antigo ou o novo
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// --- Backend em memória (testes e front ends sem disco) ---

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pré-carrega um documento cru (útil para simular dados antigos).
    pub fn with_raw(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Serialize)]
struct Document<'a, T> {
    version: u32,
    records: &'a [T],
}

/// Forma em que um documento foi encontrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    Missing,
    Legacy,
    Versioned(u32),
}

pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self { backend: Box::new(backend) }
    }

    fn read_value(&self, collection: Collection) -> AppResult<Option<Value>> {
        match self.backend.read(collection.key())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn shape(&self, collection: Collection) -> AppResult<DocumentShape> {
        Ok(match self.read_value(collection)? {
            None => DocumentShape::Missing,
            Some(Value::Object(map)) if map.contains_key("version") => {
                DocumentShape::Versioned(map.get("version").and_then(Value::as_u64).unwrap_or(0) as u32)
            }
            Some(_) => DocumentShape::Legacy,
        })
    }

    /// Lê todos os registos de uma coleção (vazia se a chave não existir).
    pub fn get<T: DeserializeOwned>(&self, collection: Collection) -> AppResult<Vec<T>> {
        let Some(value) = self.read_value(collection)? else {
            return Ok(Vec::new());
        };

        match value {
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            Value::Object(mut map) if map.contains_key("version") => {
                let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
                if version > u64::from(SCHEMA_VERSION) {
                    return Err(AppError::Config(format!(
                        "Documento '{}' na versão {} (suportada: {})",
                        collection.key(),
                        version,
                        SCHEMA_VERSION
                    )));
                }
                let records = map.remove("records").unwrap_or(Value::Array(Vec::new()));
                Ok(serde_json::from_value(records)?)
            }
            _ => Err(AppError::Config(format!(
                "Documento '{}' com formato desconhecido",
                collection.key()
            ))),
        }
    }

    /// Substitui a coleção inteira.
    pub fn put<T: Serialize>(&mut self, collection: Collection, records: &[T]) -> AppResult<()> {
        let doc = Document { version: SCHEMA_VERSION, records };
        let json = serde_json::to_string(&doc)?;
        self.backend.write(collection.key(), &json)?;
        tracing::debug!("Coleção '{}' gravada ({} registos).", collection.key(), records.len());
        Ok(())
    }

    pub fn remove(&mut self, collection: Collection) -> AppResult<()> {
        self.backend.remove(collection.key())
    }

    // --- Sessão: no máximo um registo ---

    pub fn get_session(&self) -> AppResult<Option<Session>> {
        Ok(self.get::<Session>(Collection::Session)?.into_iter().next())
    }

    pub fn put_session(&mut self, session: &Session) -> AppResult<()> {
        self.put(Collection::Session, std::slice::from_ref(session))
    }

    /// Cria as coleções em falta e migra documentos no formato antigo.
    pub fn init(&mut self, config: &AppConfig) -> AppResult<()> {
        match self.shape(Collection::Users)? {
            DocumentShape::Missing => self.seed_admin(config)?,
            DocumentShape::Legacy => self.migrate_legacy_users(config.bcrypt_cost)?,
            DocumentShape::Versioned(_) => {}
        }

        for collection in [Collection::Projects, Collection::Tasks] {
            match self.shape(collection)? {
                DocumentShape::Missing => {
                    tracing::info!("Criando coleção vazia '{}'.", collection.key());
                    match collection {
                        Collection::Projects => self.put::<Project>(collection, &[])?,
                        _ => self.put::<Task>(collection, &[])?,
                    }
                }
                DocumentShape::Legacy => {
                    tracing::info!("Migrando '{}' para o formato versionado...", collection.key());
                    match collection {
                        Collection::Projects => {
                            let records: Vec<Project> = self.get(collection)?;
                            self.put(collection, &records)?;
                        }
                        _ => {
                            let records: Vec<Task> = self.get(collection)?;
                            self.put(collection, &records)?;
                        }
                    }
                }
                DocumentShape::Versioned(_) => {}
            }
        }

        // A sessão antiga era uma cópia do utilizador com senha em claro: descartamos.
        if self.shape(Collection::Session)? == DocumentShape::Legacy {
            tracing::warn!("Sessão no formato antigo descartada; será necessário novo login.");
            self.remove(Collection::Session)?;
        }

        Ok(())
    }

    fn seed_admin(&mut self, config: &AppConfig) -> AppResult<()> {
        let seed = &config.admin_seed;
        let password = match &seed.password {
            Some(p) => p.clone(),
            None => {
                let generated = auth_service::generate_password();
                tracing::warn!(
                    "⚠️ NEXUS_ADMIN_PASSWORD não definida. Senha gerada para {}: {}",
                    seed.email,
                    generated
                );
                generated
            }
        };

        let admin = User {
            id: SEED_ADMIN_ID.to_string(),
            name: seed.name.clone(),
            email: seed.email.trim().to_string(),
            password_hash: auth_service::hash_password(&password, config.bcrypt_cost)?,
            role: Role::Admin,
            joined_at: Utc::now(),
        };
        self.put(Collection::Users, &[admin])?;
        tracing::info!("👤 Administrador padrão criado ({}).", seed.email);
        Ok(())
    }

    fn migrate_legacy_users(&mut self, cost: u32) -> AppResult<()> {
        tracing::info!("Migrando utilizadores do formato antigo (senhas em claro)...");
        let raw: Vec<Value> = self.get(Collection::Users)?;
        let mut users = Vec::with_capacity(raw.len());

        for value in raw {
            // Registos já com hash passam tal como estão
            if value.get("passwordHash").is_some() {
                users.push(serde_json::from_value::<User>(value)?);
                continue;
            }
            let legacy: LegacyUser = serde_json::from_value(value)?;
            users.push(User {
                password_hash: auth_service::hash_password(&legacy.password, cost)?,
                id: legacy.id,
                name: legacy.name,
                email: legacy.email,
                role: legacy.role,
                joined_at: legacy.joined_at.unwrap_or_else(Utc::now),
            });
        }

        self.put(Collection::Users, &users)?;
        tracing::info!("✅ {} utilizadores migrados.", users.len());
        Ok(())
    }
}

/// Abre o armazenamento em disco indicado na configuração. `init` fica a cargo de quem o usa.
pub fn open_store(config: &AppConfig) -> AppResult<Store> {
    tracing::info!("Abrindo armazenamento em {}", config.data_dir.display());
    let backend = FileBackend::open(&config.data_dir)?;
    Ok(Store::new(backend))
}
