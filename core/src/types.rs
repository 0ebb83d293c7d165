//! Domain DTOs for the Abitus API.
//!
//! # Design
//! Records are declared leniently: every known field is optional, a known
//! field holding a value of another type reads as absent, and unknown fields
//! are kept in `extra`. The client only rejects a response when its envelope
//! is wrong, never because a record gained, lost or retyped a field.
//! Envelopes (`PeoplePage`, `Statistics`) are the only shapes checked.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A person record as returned by `pessoas/{id}` and the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub idade: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub sexo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vivo: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub url_foto: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ultima_ocorrencia: Option<Occurrence>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The most recent disappearance occurrence attached to a person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    #[serde(default, deserialize_with = "lenient")]
    pub oco_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub dt_desaparecimento: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub data_localizacao: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub encontrado_vivo: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub local_desaparecimento_concat: Option<String>,
    #[serde(default, rename = "ocorrenciaEntrevDesapDTO", deserialize_with = "lenient")]
    pub entrevista: Option<OccurrenceInterview>,
    #[serde(default, deserialize_with = "lenient")]
    pub lista_cartaz: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceInterview {
    #[serde(default, deserialize_with = "lenient")]
    pub informacao_desaparecimento: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vestimentas_desaparecido: Option<String>,
}

/// Paginated listing envelope. `content` is mandatory (entries that are not
/// records are skipped); the counters default to zero when the remote omits
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeoplePage {
    #[serde(deserialize_with = "lenient_list")]
    pub content: Vec<Person>,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub total_elements: u64,
    #[serde(default, deserialize_with = "zero_if_invalid")]
    pub total_pages: u32,
}

/// Counters from `pessoas/aberto/estatistico`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "quantPessoasDesaparecidas", default, deserialize_with = "zero_if_invalid")]
    pub missing: u64,
    #[serde(rename = "quantPessoasEncontradas", default, deserialize_with = "zero_if_invalid")]
    pub found: u64,
}

/// Counters that are missing, `null` or not a non-negative integer read as 0.
fn zero_if_invalid<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// A known record field holding a value of another type reads as absent,
/// so one odd record never fails the whole response.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like `lenient`, for lists: a non-list reads as empty and entries of the
/// wrong type are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A piece of information a citizen reported about an occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub oco_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub informacao: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub anexos: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Masculino,
    Feminino,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Masculino => "MASCULINO",
            Sex::Feminino => "FEMININO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PersonStatus {
    Desaparecido,
    Localizado,
}

impl PersonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonStatus::Desaparecido => "DESAPARECIDO",
            PersonStatus::Localizado => "LOCALIZADO",
        }
    }
}

/// An in-memory file to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}
