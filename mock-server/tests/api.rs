use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockDb, MOCK_IMGBB_KEY};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

/// Hand-rolled multipart body; the server must not care who encoded it.
fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<String> {
    let boundary = "TESTBOUNDARY";
    let mut body = String::new();
    for (name, file_name, value) in parts {
        body.push_str(&format!("--{boundary}\r\n"));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap()
}

// --- listing ---

#[tokio::test]
async fn list_people_default_page() {
    let resp = app().oneshot(get("/v1/pessoas/aberto/filtro")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 4);
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn list_people_paginates() {
    let resp = app()
        .oneshot(get("/v1/pessoas/aberto/filtro?pagina=1&porPagina=3"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 1);
    assert_eq!(body["content"][0]["id"], 4);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn list_people_page_past_the_end_is_empty() {
    let resp = app()
        .oneshot(get("/v1/pessoas/aberto/filtro?pagina=4294967295&porPagina=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["content"].as_array().unwrap().is_empty());
    assert_eq!(body["totalElements"], 4);
}

#[tokio::test]
async fn list_people_filters_by_encoded_name() {
    let resp = app()
        .oneshot(get("/v1/pessoas/aberto/filtro?nome=ana%20clara&sexo=FEMININO"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["content"][0]["nome"], "ANA CLARA SOUZA");
}

#[tokio::test]
async fn list_people_zero_page_size_is_rejected() {
    let resp = app()
        .oneshot(get("/v1/pessoas/aberto/filtro?porPagina=0"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("porPagina"));
}

// --- single record / statistics ---

#[tokio::test]
async fn get_person_found_and_missing() {
    let resp = app().oneshot(get("/v1/pessoas/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["nome"], "JOAO PEDRO SILVA");

    let resp = app().oneshot(get("/v1/pessoas/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Pessoa não encontrada");
}

#[tokio::test]
async fn statistics_count_missing_and_found() {
    let resp = app().oneshot(get("/v1/pessoas/aberto/estatistico")).await.unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["quantPessoasDesaparecidas"], 3);
    assert_eq!(body["quantPessoasEncontradas"], 1);
}

#[tokio::test]
async fn empty_database_has_zero_statistics() {
    let resp = app_with(MockDb::default())
        .oneshot(get("/v1/pessoas/aberto/estatistico"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["quantPessoasDesaparecidas"], 0);
    assert_eq!(body["quantPessoasEncontradas"], 0);
}

// --- reports ---

#[tokio::test]
async fn report_info_requires_occurrence_id() {
    let resp = app()
        .oneshot(get("/v1/ocorrencias/informacoes-desaparecido"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_then_read_report() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            "/v1/ocorrencias/informacoes-desaparecido",
            &[
                ("ocoId", None, "103"),
                ("informacao", None, "Vista na praça"),
                ("data", None, "2024-05-01"),
                ("files", Some("foto.png"), "PNGDATA"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["ocoId"], 103);
    assert_eq!(created["anexos"].as_array().unwrap().len(), 1);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/v1/ocorrencias/informacoes-desaparecido?ocorrenciaId=103"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let reports = body_json(resp).await;
    assert_eq!(reports.as_array().unwrap().len(), 1);
    assert_eq!(reports[0]["informacao"], "Vista na praça");
}

#[tokio::test]
async fn submit_report_without_information_is_rejected() {
    let resp = app()
        .oneshot(multipart_request(
            "/v1/ocorrencias/informacoes-desaparecido",
            &[("ocoId", None, "101")],
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "informacao é obrigatória");
}

// --- imgbb ---

#[tokio::test]
async fn upload_with_valid_key_returns_url() {
    let resp = app()
        .oneshot(multipart_request(
            &format!("/1/upload?key={MOCK_IMGBB_KEY}"),
            &[("image", Some("cat.png"), "PNGDATA")],
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://i.ibb.co/"));
    assert!(url.ends_with("/cat.png"));
}

#[tokio::test]
async fn upload_with_bad_key_uses_imgbb_error_envelope() {
    let resp = app()
        .oneshot(multipart_request(
            "/1/upload?key=wrong",
            &[("image", Some("cat.png"), "PNGDATA")],
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Invalid API v1 key.");
}

#[tokio::test]
async fn upload_without_image_is_rejected() {
    let resp = app()
        .oneshot(multipart_request(
            &format!("/1/upload?key={MOCK_IMGBB_KEY}"),
            &[("other", None, "x")],
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Empty upload source.");
}
