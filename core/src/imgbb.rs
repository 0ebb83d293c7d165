//! Request builder and response parser for the imgBB upload API.
//!
//! Same split as `AbitusClient`: `build_upload` produces the request,
//! `parse_upload` turns the response into the delivered URL or an
//! `UploadError` carrying one displayable message.

use serde_json::Value;

use crate::error::UploadError;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::FileUpload;

pub const DEFAULT_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

#[derive(Clone)]
pub struct ImgbbClient {
    upload_url: String,
    api_key: String,
}

impl std::fmt::Debug for ImgbbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgbbClient")
            .field("upload_url", &self.upload_url)
            .finish_non_exhaustive()
    }
}

impl ImgbbClient {
    pub fn new(upload_url: &str, api_key: &str) -> Self {
        Self {
            upload_url: upload_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn build_upload(&self, file: &FileUpload) -> HttpRequest {
        let separator = if self.upload_url.contains('?') { '&' } else { '?' };
        HttpRequest::post_form(
            format!(
                "{}{separator}key={}",
                self.upload_url,
                urlencoding::encode(&self.api_key)
            ),
            MultipartForm::new().file("image", file.clone()),
        )
    }

    /// Extract `data.url` from a successful envelope. Failures map to the
    /// remote's `error.message`, or to the generic upload message when the
    /// envelope carries none.
    pub fn parse_upload(&self, response: HttpResponse) -> Result<String, UploadError> {
        let envelope: Option<Value> = serde_json::from_str(&response.body).ok();
        if !response.is_success() {
            return Err(envelope
                .as_ref()
                .and_then(|v| v.pointer("/error/message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(UploadError::new)
                .unwrap_or_else(UploadError::generic));
        }
        envelope
            .as_ref()
            .and_then(|v| v.pointer("/data/url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(UploadError::generic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::multipart::PartValue;
    use crate::error::UPLOAD_FAILED;

    fn client() -> ImgbbClient {
        ImgbbClient::new(DEFAULT_UPLOAD_URL, "secret key")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn build_upload_puts_key_in_query_and_file_under_image() {
        let req = client().build_upload(&FileUpload::new("cat.png", "image/png", b"PNG".to_vec()));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.imgbb.com/1/upload?key=secret%20key");
        let parts = req.form.unwrap().into_parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "image");
        assert_eq!(
            parts[0].value,
            PartValue::File(FileUpload::new("cat.png", "image/png", b"PNG".to_vec()))
        );
    }

    #[test]
    fn build_upload_appends_to_existing_query() {
        let client = ImgbbClient::new("http://localhost:9/1/upload?expiration=600", "k");
        let req = client.build_upload(&FileUpload::new("a", "image/png", Vec::new()));
        assert_eq!(req.url, "http://localhost:9/1/upload?expiration=600&key=k");
    }

    #[test]
    fn parse_upload_returns_url() {
        let url = client()
            .parse_upload(response(200, r#"{"data":{"url":"https://i.ibb.co/x/cat.png"},"success":true}"#))
            .unwrap();
        assert_eq!(url, "https://i.ibb.co/x/cat.png");
    }

    #[test]
    fn parse_upload_uses_remote_error_message() {
        let err = client()
            .parse_upload(response(400, r#"{"status_code":400,"error":{"message":"Invalid API v1 key.","code":100}}"#))
            .unwrap_err();
        assert_eq!(err.message, "Invalid API v1 key.");
    }

    #[test]
    fn parse_upload_malformed_error_is_generic() {
        let err = client().parse_upload(response(500, "<html>oops</html>")).unwrap_err();
        assert_eq!(err.message, UPLOAD_FAILED);

        let err = client().parse_upload(response(400, r#"{"error":{}}"#)).unwrap_err();
        assert_eq!(err.message, UPLOAD_FAILED);
    }

    #[test]
    fn parse_upload_success_without_url_is_generic() {
        let err = client().parse_upload(response(200, r#"{"data":{}}"#)).unwrap_err();
        assert_eq!(err, UploadError::generic());
    }

    #[test]
    fn debug_hides_api_key() {
        assert!(!format!("{:?}", client()).contains("secret"));
    }
}
