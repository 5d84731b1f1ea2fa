// src/models/mod.rs
pub mod project;
pub mod session;
pub mod task;
pub mod user;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

// --- Desserialização tolerante para dados antigos ---
// Os documentos gravados pela versão anterior guardavam valores de formulário
// tal como vinham do HTML: datas vazias como "" e o projectId como string.

/// Aceita `null`, `""` ou `"YYYY-MM-DD"`.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

/// Aceita `null`, um número ou uma string numérica; qualquer outra string vira `None`
/// (ex.: "Crie um projeto primeiro", o texto da opção vazia do antigo formulário).
pub(crate) fn lenient_project_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
    })
}

/// Converte um campo de formulário em `Option<NaiveDate>` (vazio -> `None`).
pub fn parse_form_date(field: &'static str, raw: &str) -> crate::error::AppResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| crate::error::AppError::InvalidField { field, value: raw.to_string() })
}
