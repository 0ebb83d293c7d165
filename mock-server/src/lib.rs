//! In-memory stand-in for the Abitus API and the imgBB upload endpoint.
//!
//! Routes mirror the remote paths (`/v1/...` for Abitus, `/1/upload` for
//! imgBB) so a client only needs its base URLs pointed here. Error bodies
//! follow each service's envelope: `{"message"}` for Abitus,
//! `{"error":{"message"}}` for imgBB.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// The only API key the mock imgBB endpoint accepts.
pub const MOCK_IMGBB_KEY: &str = "mock-imgbb-key";

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub nome: String,
    pub idade: u32,
    pub sexo: String,
    pub vivo: bool,
    pub url_foto: Option<String>,
    pub ultima_ocorrencia: Occurrence,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub oco_id: i64,
    pub dt_desaparecimento: String,
    pub data_localizacao: Option<String>,
    pub encontrado_vivo: bool,
    pub local_desaparecimento_concat: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub id: i64,
    pub oco_id: i64,
    pub informacao: String,
    pub descricao: Option<String>,
    pub data: String,
    pub anexos: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MockDb {
    pub people: Vec<Person>,
    pub reports: Vec<ReportInfo>,
    pub uploads: u64,
}

impl MockDb {
    /// A handful of records covering both sexes and both statuses.
    pub fn seeded() -> Self {
        let person = |id: i64, nome: &str, idade: u32, sexo: &str, found: Option<&str>| Person {
            id,
            nome: nome.to_string(),
            idade,
            sexo: sexo.to_string(),
            vivo: true,
            url_foto: Some(format!("https://mock.abitus/fotos/{id}.jpg")),
            ultima_ocorrencia: Occurrence {
                oco_id: 100 + id,
                dt_desaparecimento: format!("2024-01-0{id}T09:03:00"),
                data_localizacao: found.map(str::to_string),
                encontrado_vivo: found.is_some(),
                local_desaparecimento_concat: "Cuiabá/MT".to_string(),
            },
        };
        Self {
            people: vec![
                person(1, "MARIA DAS GRACAS", 34, "FEMININO", None),
                person(2, "JOAO PEDRO SILVA", 17, "MASCULINO", Some("2024-02-10")),
                person(3, "ANA CLARA SOUZA", 9, "FEMININO", None),
                person(4, "CARLOS EDUARDO LIMA", 52, "MASCULINO", None),
            ],
            reports: vec![ReportInfo {
                id: 1,
                oco_id: 101,
                informacao: "Vista perto do terminal".to_string(),
                descricao: None,
                data: "2024-01-06".to_string(),
                anexos: Vec::new(),
            }],
            uploads: 0,
        }
    }
}

pub type Db = Arc<RwLock<MockDb>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with(MockDb::seeded())
}

pub fn app_with(db: MockDb) -> Router {
    let db: Db = Arc::new(RwLock::new(db));
    Router::new()
        .route("/v1/pessoas/aberto/filtro", get(list_people))
        .route("/v1/pessoas/aberto/estatistico", get(statistics))
        .route("/v1/pessoas/{id}", get(get_person))
        .route(
            "/v1/ocorrencias/informacoes-desaparecido",
            get(report_info).post(submit_report),
        )
        .route("/1/upload", post(upload_image))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn abitus_error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "status": status.as_u16(), "message": message })))
}

fn imgbb_error(status: StatusCode, message: &str, code: u32) -> Reply {
    (
        status,
        Json(json!({
            "status_code": status.as_u16(),
            "error": { "message": message, "code": code },
            "status_txt": status.canonical_reason().unwrap_or_default(),
        })),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub nome: Option<String>,
    pub faixa_idade_inicial: Option<u32>,
    pub faixa_idade_final: Option<u32>,
    pub sexo: Option<String>,
    pub status: Option<String>,
    pub pagina: Option<u32>,
    pub por_pagina: Option<u32>,
}

impl ListParams {
    fn matches(&self, person: &Person) -> bool {
        let name_ok = self.nome.as_deref().is_none_or(|n| {
            person.nome.to_lowercase().contains(&n.to_lowercase())
        });
        let sex_ok = self.sexo.as_deref().is_none_or(|s| person.sexo == s);
        let min_ok = self.faixa_idade_inicial.is_none_or(|min| person.idade >= min);
        let max_ok = self.faixa_idade_final.is_none_or(|max| person.idade <= max);
        let status_ok = match self.status.as_deref() {
            Some("DESAPARECIDO") => person.ultima_ocorrencia.data_localizacao.is_none(),
            Some("LOCALIZADO") => person.ultima_ocorrencia.data_localizacao.is_some(),
            _ => true,
        };
        name_ok && sex_ok && min_ok && max_ok && status_ok
    }
}

async fn list_people(State(db): State<Db>, Query(params): Query<ListParams>) -> Reply {
    let per_page = params.por_pagina.unwrap_or(DEFAULT_PAGE_SIZE);
    if per_page == 0 {
        return abitus_error(StatusCode::BAD_REQUEST, "porPagina deve ser maior que zero");
    }
    let page = params.pagina.unwrap_or(0);

    let db = db.read().await;
    let matching: Vec<&Person> = db.people.iter().filter(|p| params.matches(p)).collect();
    let total = matching.len() as u32;
    let content: Vec<&Person> = matching
        .into_iter()
        .skip((page as usize).saturating_mul(per_page as usize))
        .take(per_page as usize)
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "content": content,
            "totalElements": total,
            "totalPages": total.div_ceil(per_page),
            "number": page,
            "size": per_page,
        })),
    )
}

async fn statistics(State(db): State<Db>) -> Reply {
    let db = db.read().await;
    let found = db
        .people
        .iter()
        .filter(|p| p.ultima_ocorrencia.data_localizacao.is_some())
        .count();
    (
        StatusCode::OK,
        Json(json!({
            "quantPessoasDesaparecidas": db.people.len() - found,
            "quantPessoasEncontradas": found,
        })),
    )
}

async fn get_person(State(db): State<Db>, Path(id): Path<i64>) -> Reply {
    let db = db.read().await;
    match db.people.iter().find(|p| p.id == id) {
        Some(person) => (StatusCode::OK, Json(json!(person))),
        None => abitus_error(StatusCode::NOT_FOUND, "Pessoa não encontrada"),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfoParams {
    pub ocorrencia_id: Option<i64>,
}

async fn report_info(State(db): State<Db>, Query(params): Query<ReportInfoParams>) -> Reply {
    let Some(oco_id) = params.ocorrencia_id else {
        return abitus_error(StatusCode::BAD_REQUEST, "ocorrenciaId é obrigatório");
    };
    let db = db.read().await;
    let reports: Vec<&ReportInfo> = db.reports.iter().filter(|r| r.oco_id == oco_id).collect();
    (StatusCode::OK, Json(json!(reports)))
}

async fn submit_report(State(db): State<Db>, mut multipart: Multipart) -> Reply {
    let mut oco_id = None;
    let mut informacao = None;
    let mut descricao = None;
    let mut data = None;
    let mut anexos = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return abitus_error(StatusCode::BAD_REQUEST, &e.body_text()),
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "files" {
            let file_name = field.file_name().unwrap_or("anexo").to_string();
            anexos.push(format!("https://mock.abitus/anexos/{}/{file_name}", Uuid::new_v4()));
            continue;
        }
        let value = match field.text().await {
            Ok(value) => value,
            Err(e) => return abitus_error(StatusCode::BAD_REQUEST, &e.body_text()),
        };
        match name.as_str() {
            "ocoId" => oco_id = value.parse::<i64>().ok(),
            "informacao" => informacao = Some(value),
            "descricao" => descricao = Some(value),
            "data" => data = Some(value),
            _ => {}
        }
    }

    let Some(oco_id) = oco_id else {
        return abitus_error(StatusCode::BAD_REQUEST, "ocoId é obrigatório");
    };
    let Some(informacao) = informacao.filter(|i| !i.trim().is_empty()) else {
        return abitus_error(StatusCode::BAD_REQUEST, "informacao é obrigatória");
    };

    let mut db = db.write().await;
    let report = ReportInfo {
        id: db.reports.len() as i64 + 1,
        oco_id,
        informacao,
        descricao,
        data: data.unwrap_or_default(),
        anexos,
    };
    db.reports.push(report.clone());
    (StatusCode::CREATED, Json(json!(report)))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub key: Option<String>,
}

async fn upload_image(
    State(db): State<Db>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Reply {
    if params.key.as_deref() != Some(MOCK_IMGBB_KEY) {
        return imgbb_error(StatusCode::BAD_REQUEST, "Invalid API v1 key.", 100);
    }

    let mut image = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return imgbb_error(StatusCode::BAD_REQUEST, &e.body_text(), 400),
        };
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        match field.bytes().await {
            Ok(bytes) if !bytes.is_empty() => image = Some((file_name, bytes.len())),
            Ok(_) => {}
            Err(e) => return imgbb_error(StatusCode::BAD_REQUEST, &e.body_text(), 400),
        }
    }

    let Some((file_name, size)) = image else {
        return imgbb_error(StatusCode::BAD_REQUEST, "Empty upload source.", 130);
    };

    let mut db = db.write().await;
    db.uploads += 1;
    let id = Uuid::new_v4().simple().to_string();
    let url = format!("https://i.ibb.co/{id}/{file_name}");
    (
        StatusCode::OK,
        Json(json!({
            "data": {
                "id": id,
                "url": url,
                "display_url": url,
                "size": size,
            },
            "success": true,
            "status": 200,
        })),
    )
}
