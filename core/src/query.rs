//! Query-string construction for list endpoints.

use crate::types::{PersonStatus, Sex};

/// Build a `?k=v&...` query string from key/value pairs.
///
/// Pairs whose value is `None`, or renders to an empty string, are dropped.
/// Keys and values are percent-encoded independently and keep their input
/// order. Returns an empty string when no pair survives.
pub fn format_query_params<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: ToString,
{
    let query = params
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value?.to_string();
            if value.is_empty() {
                return None;
            }
            Some(format!(
                "{}={}",
                urlencoding::encode(key.as_ref()),
                urlencoding::encode(&value)
            ))
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    }
}

/// Filters accepted by `GET pessoas/aberto/filtro`.
///
/// Every field is optional; unset fields are left out of the query string and
/// the remote applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleFilter {
    pub nome: Option<String>,
    pub faixa_idade_inicial: Option<u32>,
    pub faixa_idade_final: Option<u32>,
    pub sexo: Option<Sex>,
    pub status: Option<PersonStatus>,
    /// Zero-based page index.
    pub pagina: Option<u32>,
    pub por_pagina: Option<u32>,
}

impl PeopleFilter {
    pub fn page(pagina: u32, por_pagina: u32) -> Self {
        Self {
            pagina: Some(pagina),
            por_pagina: Some(por_pagina),
            ..Self::default()
        }
    }

    /// Pairs in the order the remote documents them, using its parameter names.
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("nome", self.nome.clone()),
            ("faixaIdadeInicial", self.faixa_idade_inicial.map(|v| v.to_string())),
            ("faixaIdadeFinal", self.faixa_idade_final.map(|v| v.to_string())),
            ("sexo", self.sexo.map(|v| v.as_str().to_string())),
            ("status", self.status.map(|v| v.as_str().to_string())),
            ("pagina", self.pagina.map(|v| v.to_string())),
            ("porPagina", self.por_pagina.map(|v| v.to_string())),
        ]
    }

    pub fn to_query_string(&self) -> String {
        format_query_params(self.query_pairs())
    }
}
